//! Steepest descent for symmetric positive definite systems.

use crate::core::traits::InnerProduct;
use crate::core::wrappers::axpy;
use crate::error::KError;
use crate::matrix::sparse::{CsrMatrix, SparseMatrix};
use crate::solver::{IterationState, IterativeMethod};
use num_traits::Float;

/// x ← x + α r with the exact line-search step α = rᵗr / rᵗAr.
#[derive(Default)]
pub struct SteepestDescent;

impl SteepestDescent {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Float> IterativeMethod<T> for SteepestDescent {
    fn update(&mut self, a: &CsrMatrix<T>, state: &mut IterationState<T>) -> Result<(), KError> {
        let ip = ();
        let mut ar = vec![T::zero(); state.r.len()];
        a.spmv(&state.r, &mut ar);
        let denom = ip.dot(&state.r, &ar);
        if denom <= T::zero() {
            return Err(KError::IndefiniteMatrix);
        }
        let alpha = ip.dot(&state.r, &state.r) / denom;
        axpy(alpha, &state.r, &mut state.x_k);
        Ok(())
    }
}
