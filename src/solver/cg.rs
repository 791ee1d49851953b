//! Conjugate Gradient (unpreconditioned).
//!
//! ```text
//! d₀ = r₀
//! den = dᵗ A d,  α = rᵗr / den
//! x ← x + α d,   r ← b − A x
//! β = (A d)ᵗ r / den,  d ← r − β d
//! ```
//! The residual is recomputed from b − A x every step, as for the other methods, rather
//! than updated recursively.

use crate::core::traits::InnerProduct;
use crate::core::wrappers::axpy;
use crate::error::KError;
use crate::matrix::sparse::{CsrMatrix, SparseMatrix};
use crate::solver::{IterationState, IterativeMethod};
use num_traits::Float;

pub struct ConjugateGradient<T> {
    d: Vec<T>,
    ad: Vec<T>,
    den: T,
}

impl<T: Float> ConjugateGradient<T> {
    pub fn new() -> Self {
        Self { d: Vec::new(), ad: Vec::new(), den: T::one() }
    }

    /// Current search direction.
    pub fn direction(&self) -> &[T] {
        &self.d
    }
}

impl<T: Float> Default for ConjugateGradient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> IterativeMethod<T> for ConjugateGradient<T> {
    fn start(&mut self, _a: &CsrMatrix<T>, state: &IterationState<T>) {
        self.d = state.r.clone();
        self.ad = vec![T::zero(); state.r.len()];
    }

    fn update(&mut self, a: &CsrMatrix<T>, state: &mut IterationState<T>) -> Result<(), KError> {
        let ip = ();
        a.spmv(&self.d, &mut self.ad);
        let den = ip.dot(&self.d, &self.ad);
        if den <= T::zero() {
            return Err(KError::IndefiniteMatrix);
        }
        let alpha = ip.dot(&state.r, &state.r) / den;
        axpy(alpha, &self.d, &mut state.x_k);
        self.den = den;
        Ok(())
    }

    fn after_residual(&mut self, _a: &CsrMatrix<T>, state: &IterationState<T>) {
        let ip = ();
        let beta = ip.dot(&self.ad, &state.r) / self.den;
        for (di, &ri) in self.d.iter_mut().zip(&state.r) {
            *di = ri - beta * *di;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::convergence::residual;

    #[test]
    fn consecutive_directions_are_a_conjugate() {
        let a = CsrMatrix::from_rows(&[
            vec![4.0, 1.0, 0.0],
            vec![1.0, 3.0, 1.0],
            vec![0.0, 1.0, 2.0],
        ])
        .unwrap();
        let b = [6.0, 8.0, 8.0];
        let (r, rel) = residual(&a, &b, &[0.0; 3]);
        let mut state = IterationState { x_k: vec![0.0; 3], r, rel, iterations: 0 };
        let mut cg = ConjugateGradient::new();
        cg.start(&a, &state);
        let d0 = cg.direction().to_vec();
        cg.update(&a, &mut state).unwrap();
        let (r, rel) = residual(&a, &b, &state.x_k);
        state.r = r;
        state.rel = rel;
        cg.after_residual(&a, &state);
        let d1 = cg.direction().to_vec();
        let ad1 = a.mul_vec(&d1);
        let conj: f64 = d0.iter().zip(&ad1).map(|(p, q)| p * q).sum();
        assert!(conj.abs() < 1e-12, "d0ᵗ A d1 = {conj}");
    }
}
