//! Convergence tracking & tolerance checks for the iterative methods.

use crate::core::wrappers::{norm2, sub};
use crate::error::KError;
use crate::matrix::sparse::{CsrMatrix, SparseMatrix};
use num_traits::Float;
use std::time::Duration;

/// Default iteration cap shared by every method.
pub const MAXITE: usize = 200_000;

/// Stopping criteria.
#[derive(Clone, Copy, Debug)]
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

/// Outcome of one convergence test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Relative residual already below tolerance.
    Converged,
    /// Another update is allowed.
    Continue,
    /// Budget spent while still above tolerance.
    LimitReached,
}

impl<T: Float> Convergence<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { tol, max_iters }
    }

    /// Decide what the loop does next given the relative residual and the
    /// number of updates performed so far. The loop continues while `rel >= tol`.
    pub fn check(&self, rel: T, iterations: usize) -> Step {
        if rel < self.tol {
            Step::Converged
        } else if iterations < self.max_iters {
            Step::Continue
        } else {
            Step::LimitReached
        }
    }
}

/// Result of a converged solve.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// ‖x − x_k‖₂ / ‖x‖₂ against the reference solution.
    pub rel_error: f64,
    /// Number of updates performed.
    pub iterations: usize,
    /// Wall-clock time spent in the iteration loop.
    pub elapsed: Duration,
    /// Final relative residual ‖b − A x_k‖₂ / ‖b‖₂.
    pub residual: f64,
}

impl SolveReport {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Residual `r = b − A x` and relative residual `‖r‖₂ / ‖b‖₂`.
///
/// A zero right-hand side gives a relative residual of `‖r‖₂`.
pub fn residual<T: Float>(a: &CsrMatrix<T>, b: &[T], x: &[T]) -> (Vec<T>, T) {
    scaled_residual(a, b, norm2(b), x)
}

/// [`residual`] with ‖b‖₂ supplied by the caller, for loops where b is fixed.
pub fn scaled_residual<T: Float>(a: &CsrMatrix<T>, b: &[T], b_norm: T, x: &[T]) -> (Vec<T>, T) {
    let mut ax = vec![T::zero(); a.nrows()];
    a.spmv(x, &mut ax);
    let r = sub(b, &ax);
    let r_norm = norm2(&r);
    let rel = if b_norm > T::zero() { r_norm / b_norm } else { r_norm };
    (r, rel)
}

/// `‖x − x_k‖₂ / ‖x‖₂`, falling back to the absolute error for a zero reference.
pub fn relative_error<T: Float>(x: &[T], x_k: &[T]) -> T {
    let diff = norm2(&sub(x, x_k));
    let x_norm = norm2(x);
    if x_norm > T::zero() { diff / x_norm } else { diff }
}

/// Validate a stopping tolerance.
pub fn check_tolerance(tol: f64) -> Result<(), KError> {
    if tol.is_finite() && tol > 0.0 {
        Ok(())
    } else {
        Err(KError::InvalidTolerance(tol))
    }
}
