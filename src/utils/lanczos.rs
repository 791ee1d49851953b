//! Lowest-eigenvalue estimate for symmetric operators.
//!
//! Runs a bounded Lanczos process with full reorthogonalization, then locates the smallest
//! eigenvalue of the Lanczos tridiagonal by Sturm-sequence bisection. The smallest Ritz
//! value is an upper bound on λ_min(A) and is exact (up to rounding) once the Krylov space
//! is invariant, which always happens within `n` steps.
//!
//! Only the operator action is needed, so the routine works for CSR and dense matrices alike.
//!
//! # References
//! - Golub & Van Loan, Matrix Computations, §10.1 and §8.4

use crate::core::traits::{Indexing, InnerProduct, MatVec};
use crate::core::wrappers::axpy;
use num_traits::Float;

/// Symmetric tridiagonal produced by the Lanczos process.
#[derive(Clone, Debug)]
pub struct Tridiagonal<T> {
    /// Diagonal α₀..α_{m−1}.
    pub alpha: Vec<T>,
    /// Off-diagonal β₀..β_{m−2}.
    pub beta: Vec<T>,
}

impl<T: Float> Tridiagonal<T> {
    /// Number of eigenvalues strictly below `shift` (Sturm count of T − shift·I).
    pub fn count_below(&self, shift: T) -> usize {
        let tiny = T::min_positive_value().sqrt();
        let mut count = 0;
        let mut d = T::one();
        for (i, &a) in self.alpha.iter().enumerate() {
            d = if i == 0 {
                a - shift
            } else {
                let b = self.beta[i - 1];
                a - shift - b * b / d
            };
            if d == T::zero() {
                // a zero pivot means `shift` is an eigenvalue; nudge it below
                d = -tiny;
            }
            if d < T::zero() {
                count += 1;
            }
        }
        count
    }

    /// Gershgorin interval containing every eigenvalue.
    pub fn gershgorin(&self) -> (T, T) {
        let m = self.alpha.len();
        let off = |i: usize| -> T {
            let left = if i > 0 { self.beta[i - 1].abs() } else { T::zero() };
            let right = if i + 1 < m { self.beta[i].abs() } else { T::zero() };
            left + right
        };
        let mut lo = T::infinity();
        let mut hi = T::neg_infinity();
        for i in 0..m {
            lo = lo.min(self.alpha[i] - off(i));
            hi = hi.max(self.alpha[i] + off(i));
        }
        (lo, hi)
    }

    /// Smallest eigenvalue by bisection on the Gershgorin interval.
    pub fn lowest(&self) -> T {
        if self.alpha.is_empty() {
            return T::infinity();
        }
        let (mut lo, mut hi) = self.gershgorin();
        let two = T::one() + T::one();
        let pad = (hi - lo).abs() * T::epsilon() + T::epsilon();
        lo = lo - pad;
        hi = hi + pad;
        for _ in 0..200 {
            let mid = (lo + hi) / two;
            if mid <= lo || mid >= hi {
                break;
            }
            if self.count_below(mid) >= 1 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        (lo + hi) / two
    }
}

/// Reproducible start vector with components in every eigendirection of a generic matrix.
fn start_vector<T: Float>(n: usize) -> Vec<T> {
    let half = T::one() / (T::one() + T::one());
    (0..n)
        .map(|i| {
            let h = (i as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40;
            let u = T::from(h).unwrap_or_else(T::zero) / T::from(1u64 << 24).unwrap_or_else(T::one);
            u + half
        })
        .collect()
}

/// Build the Lanczos tridiagonal of `a` with at most `max_steps` steps.
pub fn lanczos<M, T>(a: &M, max_steps: usize) -> Tridiagonal<T>
where
    M: MatVec<Vec<T>> + Indexing,
    T: Float,
{
    let n = a.nrows();
    let steps = max_steps.min(n);
    let ip = ();
    let mut alpha = Vec::with_capacity(steps);
    let mut beta: Vec<T> = Vec::with_capacity(steps);
    if steps == 0 {
        return Tridiagonal { alpha, beta };
    }

    let mut v = start_vector::<T>(n);
    let nv = ip.norm(&v);
    v.iter_mut().for_each(|vi| *vi = *vi / nv);
    let mut basis = vec![v];
    let mut scale = T::zero();
    let breakdown = T::epsilon() * T::from(1000.0).unwrap_or_else(T::one);

    for j in 0..steps {
        let mut w = vec![T::zero(); n];
        a.matvec(&basis[j], &mut w);
        let a_j = ip.dot(&basis[j], &w);
        alpha.push(a_j);
        axpy(-a_j, &basis[j], &mut w);
        if j > 0 {
            axpy(-beta[j - 1], &basis[j - 1], &mut w);
        }
        // two passes of Gram-Schmidt against the whole basis
        for _ in 0..2 {
            for q in &basis {
                let c = ip.dot(q, &w);
                axpy(-c, q, &mut w);
            }
        }
        let b_j = ip.norm(&w);
        scale = scale.max(a_j.abs() + b_j);
        if j + 1 == steps || b_j <= breakdown * scale {
            break;
        }
        w.iter_mut().for_each(|wi| *wi = *wi / b_j);
        beta.push(b_j);
        basis.push(w);
    }
    Tridiagonal { alpha, beta }
}

/// Estimate λ_min of a symmetric operator with at most `max_steps` Lanczos steps.
pub fn lowest_eigenvalue<M, T>(a: &M, max_steps: usize) -> T
where
    M: MatVec<Vec<T>> + Indexing,
    T: Float,
{
    lanczos(a, max_steps).lowest()
}
