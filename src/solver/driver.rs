//! The iteration skeleton shared by all methods.
//!
//! ```text
//! x₀ = 0, (r, errR) = residual(A, b, x₀)
//! while errR >= tol:
//!     if k == max_iters: fail with IterationLimitExceeded
//!     update x_k; (r, errR) = residual(A, b, x_k); k += 1
//! report ‖x − x_k‖ / ‖x‖, k, elapsed
//! ```
//!
//! Only the loop is timed; validation and the method's setup happen before the clock starts.

use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::solver::{IterationState, IterativeMethod};
use crate::utils::as_f64;
use crate::core::wrappers::norm2;
use crate::utils::convergence::{Convergence, SolveReport, Step, relative_error, scaled_residual};
use log::{info, trace, warn};
use num_traits::Float;
use std::time::Instant;

/// Run `method` from x₀ = 0 until the relative residual drops below `conv.tol`.
///
/// `x` is the reference solution, used only for the reported error. A non-finite residual
/// ends the loop early and is reported like an exhausted iteration budget.
pub fn iterate<T, M>(
    method: &mut M,
    a: &CsrMatrix<T>,
    b: &[T],
    x: &[T],
    conv: &Convergence<T>,
    report_interval: usize,
) -> Result<SolveReport, KError>
where
    T: Float,
    M: IterativeMethod<T>,
{
    let b_norm = norm2(b);
    let x_k = vec![T::zero(); a.nrows()];
    let (r, rel) = scaled_residual(a, b, b_norm, &x_k);
    let mut state = IterationState { x_k, r, rel, iterations: 0 };
    method.start(a, &state);

    let start = Instant::now();
    loop {
        let step = if state.rel.is_finite() {
            conv.check(state.rel, state.iterations)
        } else {
            Step::LimitReached
        };
        match step {
            Step::Converged => break,
            Step::Continue => {
                method.update(a, &mut state)?;
                let (r, rel) = scaled_residual(a, b, b_norm, &state.x_k);
                state.r = r;
                state.rel = rel;
                method.after_residual(a, &state);
                state.iterations += 1;
                if report_interval > 0 && state.iterations % report_interval == 0 {
                    info!(
                        "iteration {}: relative residual = {:.6e}",
                        state.iterations,
                        as_f64(state.rel)
                    );
                } else {
                    trace!("iteration {}: relative residual = {:.6e}", state.iterations, as_f64(state.rel));
                }
            }
            Step::LimitReached => {
                let rel_error = as_f64(relative_error(x, &state.x_k));
                warn!(
                    "no convergence after {} iterations (relative residual {:.3e})",
                    state.iterations,
                    as_f64(state.rel)
                );
                return Err(KError::IterationLimitExceeded {
                    iterations: state.iterations,
                    residual: as_f64(state.rel),
                    rel_error,
                });
            }
        }
    }
    let elapsed = start.elapsed();

    Ok(SolveReport {
        rel_error: as_f64(relative_error(x, &state.x_k)),
        iterations: state.iterations,
        elapsed,
        residual: as_f64(state.rel),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x ← x + r, i.e. Richardson with unit step.
    struct Richardson;

    impl IterativeMethod<f64> for Richardson {
        fn update(&mut self, _a: &CsrMatrix<f64>, state: &mut IterationState<f64>) -> Result<(), KError> {
            for (xi, ri) in state.x_k.iter_mut().zip(&state.r) {
                *xi += ri;
            }
            Ok(())
        }
    }

    #[test]
    fn already_converged_system_takes_no_step() {
        let a = CsrMatrix::<f64>::identity(3);
        let conv = Convergence::new(1e-8, 10);
        let report = iterate(&mut Richardson, &a, &[0.0; 3], &[0.0; 3], &conv, 0).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(report.rel_error, 0.0);
    }

    #[test]
    fn identity_converges_in_one_step() {
        let a = CsrMatrix::<f64>::identity(2);
        let conv = Convergence::new(1e-12, 10);
        let report = iterate(&mut Richardson, &a, &[1.0, 2.0], &[1.0, 2.0], &conv, 1).unwrap();
        assert_eq!(report.iterations, 1);
        assert!(report.rel_error < 1e-15);
    }

    #[test]
    fn divergence_hits_the_limit() {
        // spectral radius of I - 3I is 2
        let a = CsrMatrix::from_rows(&[vec![3.0, 0.0], vec![0.0, 3.0]]).unwrap();
        let conv = Convergence::new(1e-8, 25);
        match iterate(&mut Richardson, &a, &[1.0, 1.0], &[1.0 / 3.0, 1.0 / 3.0], &conv, 0) {
            Err(KError::IterationLimitExceeded { iterations, residual, .. }) => {
                assert_eq!(iterations, 25);
                assert!(residual > 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_iteration_budget_fails_unless_converged() {
        let a = CsrMatrix::<f64>::identity(2);
        let conv = Convergence::new(1e-8, 0);
        assert!(iterate(&mut Richardson, &a, &[1.0, 0.0], &[1.0, 0.0], &conv, 0).is_err());
    }
}
