//! Residual bookkeeping, stopping tests and the definiteness tools used by the checks.

pub mod convergence;
pub mod lanczos;
pub mod ldl;

pub use convergence::{
    Convergence, MAXITE, SolveReport, Step, relative_error, residual, scaled_residual,
};
pub use lanczos::{Tridiagonal, lowest_eigenvalue};
pub use ldl::first_nonpositive_pivot;

use num_traits::{Float, ToPrimitive};

/// Lossy conversion used when a generic scalar ends up in a report or an error.
pub(crate) fn as_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
