//! itersolve: stationary and descent iterative solvers for sparse linear systems
//!
//! This crate solves square systems `A x = b` stored in CSR form with Jacobi, Gauss-Seidel
//! (sparse forward substitution or faer's triangular solve), steepest descent and conjugate
//! gradient. All methods share one loop, one relative-residual stopping rule and one
//! iteration cap, so their iteration counts and timings are directly comparable.

pub mod check;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod matrix;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use check::*;
pub use config::*;
pub use context::*;
pub use self::core::*;
pub use error::*;
pub use matrix::*;
pub use solver::*;
pub use utils::*;

// Re-export SolveReport at the crate root for convenience
pub use utils::convergence::SolveReport;
