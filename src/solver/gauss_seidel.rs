//! Gauss-Seidel iteration: x ← x + L⁻¹ r with L = tril(A).
//!
//! The triangular solve is pluggable so the sparse forward substitution and faer's
//! triangular solver can be run side by side on the same system.

use crate::core::wrappers::axpy;
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::solver::triangular::{ForwardSubstitution, LibraryTriangular, LowerSolve};
use crate::solver::{IterationState, IterativeMethod};
use num_traits::Float;

/// Gauss-Seidel update over a lower-triangular solver `S`.
pub struct GaussSeidel<S> {
    lower: S,
}

impl<S> GaussSeidel<S> {
    pub fn new(lower: S) -> Self {
        Self { lower }
    }

    pub fn solver(&self) -> &S {
        &self.lower
    }
}

impl<T: Float> GaussSeidel<ForwardSubstitution<T>> {
    /// Gauss-Seidel with the sparse forward substitution on tril(A).
    pub fn forward(a: &CsrMatrix<T>) -> Result<Self, KError> {
        Ok(Self::new(ForwardSubstitution::new(a.lower_triangular())?))
    }
}

impl GaussSeidel<LibraryTriangular> {
    /// Gauss-Seidel with faer's triangular solve on tril(A).
    pub fn library(a: &CsrMatrix<f64>) -> Result<Self, KError> {
        Ok(Self::new(LibraryTriangular::new(&a.lower_triangular())?))
    }
}

impl<T, S> IterativeMethod<T> for GaussSeidel<S>
where
    T: Float,
    S: LowerSolve<T>,
{
    fn update(&mut self, _a: &CsrMatrix<T>, state: &mut IterationState<T>) -> Result<(), KError> {
        let step = self.lower.solve_lower(&state.r)?;
        axpy(T::one(), &step, &mut state.x_k);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::convergence::residual;
    use approx::assert_abs_diff_eq;

    fn state_for(a: &CsrMatrix<f64>, b: &[f64]) -> IterationState<f64> {
        let (r, rel) = residual(a, b, &[0.0, 0.0]);
        IterationState { x_k: vec![0.0, 0.0], r, rel, iterations: 0 }
    }

    #[test]
    fn first_sweep_uses_updated_components() {
        // x1 = 1/4, x2 = (2 - 1 * 1/4) / 2
        let a = CsrMatrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let mut gs = GaussSeidel::forward(&a).unwrap();
        let mut state = state_for(&a, &[1.0, 2.0]);
        gs.update(&a, &mut state).unwrap();
        assert_abs_diff_eq!(state.x_k[0], 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(state.x_k[1], 0.875, epsilon = 1e-15);
    }

    #[test]
    fn library_backend_takes_the_same_step() {
        let a = CsrMatrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let mut ours = GaussSeidel::forward(&a).unwrap();
        let mut lib = GaussSeidel::library(&a).unwrap();
        let mut s1 = state_for(&a, &[1.0, 2.0]);
        let mut s2 = s1.clone();
        ours.update(&a, &mut s1).unwrap();
        lib.update(&a, &mut s2).unwrap();
        for (p, q) in s1.x_k.iter().zip(&s2.x_k) {
            assert_abs_diff_eq!(*p, *q, epsilon = 1e-14);
        }
    }
}
