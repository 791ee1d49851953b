//! Lower-triangular solves used by the Gauss-Seidel sweep.
//!
//! Two interchangeable backends implement [`LowerSolve`]:
//! - [`ForwardSubstitution`]: row-oriented forward substitution directly on the CSR
//!   lower triangle, O(nnz) per solve.
//! - [`LibraryTriangular`]: the same system handed to faer's triangular solver. The lower
//!   triangle is densified once at construction, so this backend is meant as a reference
//!   path for moderate sizes rather than as the fast one.
//!
//! Both reject a zero pivot up front and must agree to rounding on identical input.

use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use faer::linalg::triangular_solve::solve_lower_triangular_in_place;
use faer::{Mat, Par};
use num_traits::Float;

/// Solver for `L z = rhs` with a fixed lower-triangular `L`.
pub trait LowerSolve<T> {
    /// Order of `L`.
    fn order(&self) -> usize;
    /// Solve `L z = rhs`.
    fn solve_lower(&self, rhs: &[T]) -> Result<Vec<T>, KError>;
}

/// Forward substitution on a sparse lower-triangular matrix.
///
/// `z[0] = rhs[0] / l[0,0]`, then for every later row
/// `z[i] = (rhs[i] − Σ_{j<i} l[i,j] z[j]) / l[i,i]`, where the sum only visits stored
/// entries left of the diagonal.
pub fn solve_lower_triangular<T: Float>(l: &CsrMatrix<T>, rhs: &[T]) -> Result<Vec<T>, KError> {
    let n = l.nrows();
    if !l.is_square() || rhs.len() != n {
        return Err(KError::Dimension(format!(
            "cannot solve a {}x{} triangular system with a right-hand side of length {}",
            n,
            l.ncols(),
            rhs.len()
        )));
    }
    let mut z = vec![T::zero(); n];
    for i in 0..n {
        let pivot = l.diag(i);
        if pivot == T::zero() {
            return Err(KError::ZeroPivot(i));
        }
        let sum = l
            .row(i)
            .filter(|&(j, _)| j < i)
            .fold(T::zero(), |acc, (j, v)| acc + v * z[j]);
        z[i] = (rhs[i] - sum) / pivot;
    }
    Ok(z)
}

/// Sparse forward substitution backend.
#[derive(Clone, Debug)]
pub struct ForwardSubstitution<T> {
    l: CsrMatrix<T>,
}

impl<T: Float> ForwardSubstitution<T> {
    /// Take ownership of a lower triangle; fails on the first zero pivot.
    pub fn new(l: CsrMatrix<T>) -> Result<Self, KError> {
        check_pivots(&l)?;
        Ok(Self { l })
    }

    pub fn lower(&self) -> &CsrMatrix<T> {
        &self.l
    }
}

impl<T: Float> LowerSolve<T> for ForwardSubstitution<T> {
    fn order(&self) -> usize {
        self.l.nrows()
    }

    fn solve_lower(&self, rhs: &[T]) -> Result<Vec<T>, KError> {
        solve_lower_triangular(&self.l, rhs)
    }
}

/// faer triangular-solve backend.
pub struct LibraryTriangular {
    l: Mat<f64>,
}

impl LibraryTriangular {
    /// Densify `l`; fails on the first zero pivot.
    pub fn new(l: &CsrMatrix<f64>) -> Result<Self, KError> {
        check_pivots(l)?;
        Ok(Self { l: l.to_dense() })
    }
}

impl LowerSolve<f64> for LibraryTriangular {
    fn order(&self) -> usize {
        self.l.nrows()
    }

    fn solve_lower(&self, rhs: &[f64]) -> Result<Vec<f64>, KError> {
        let n = self.l.nrows();
        if rhs.len() != n {
            return Err(KError::Dimension(format!(
                "right-hand side has length {}, expected {}",
                rhs.len(),
                n
            )));
        }
        let mut z = Mat::<f64>::from_fn(n, 1, |i, _| rhs[i]);
        solve_lower_triangular_in_place(self.l.as_ref(), z.as_mut(), Par::Seq);
        Ok((0..n).map(|i| z[(i, 0)]).collect())
    }
}

fn check_pivots<T: Float>(l: &CsrMatrix<T>) -> Result<(), KError> {
    if !l.is_square() {
        return Err(KError::Dimension(format!(
            "triangular factor is {}x{}, not square",
            l.nrows(),
            l.ncols()
        )));
    }
    match (0..l.nrows()).find(|&i| l.diag(i) == T::zero()) {
        Some(i) => Err(KError::ZeroPivot(i)),
        None => Ok(()),
    }
}
