//! Solver configuration.

pub mod options;
pub use options::{PD_STEPS, SolverOptions};
