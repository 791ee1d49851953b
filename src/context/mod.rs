//! Entry points: validation, method construction and the shared loop wired together.
//!
//! Modules:
//! - [`solve_context`]: `solve` dispatched on a [`Method`](crate::solver::Method), plus one
//!   entry point per method taking `(A, b, x, tol)`.
//! - [`compare`]: runs every method on the same system and collects the outcomes.
//!
//! # Example
//! ```rust
//! use itersolve::{CsrMatrix, solve_conjugate_gradient};
//! let a = CsrMatrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
//! let report = solve_conjugate_gradient(&a, &[1.0, 2.0], &[1.0 / 11.0, 7.0 / 11.0], 1e-10).unwrap();
//! assert!(report.rel_error < 1e-8);
//! ```

pub mod compare;
pub mod solve_context;

pub use compare::{MethodOutcome, run_all, run_methods};
pub use solve_context::{
    solve, solve_conjugate_gradient, solve_gauss_seidel, solve_gauss_seidel_library, solve_gradient,
    solve_jacobi,
};
