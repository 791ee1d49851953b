//! Jacobi iteration: x ← x + D⁻¹ r.

use crate::core::wrappers::axpy;
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::solver::{IterationState, IterativeMethod};
use num_traits::Float;

/// Jacobi update with D⁻¹ computed once per solve.
pub struct Jacobi<T> {
    pub(crate) inv_diag: Vec<T>,
}

impl<T: Float> Jacobi<T> {
    /// Invert the diagonal of `a`; fails with `ZeroPivot` on a zero diagonal entry.
    pub fn new(a: &CsrMatrix<T>) -> Result<Self, KError> {
        Ok(Self { inv_diag: a.inverse_diagonal()? })
    }

    pub fn inverse_diagonal(&self) -> &[T] {
        &self.inv_diag
    }
}

impl<T: Float> IterativeMethod<T> for Jacobi<T> {
    fn update(&mut self, _a: &CsrMatrix<T>, state: &mut IterationState<T>) -> Result<(), KError> {
        let step: Vec<T> = self
            .inv_diag
            .iter()
            .zip(&state.r)
            .map(|(&d, &ri)| d * ri)
            .collect();
        axpy(T::one(), &step, &mut state.x_k);
        Ok(())
    }
}
