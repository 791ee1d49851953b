//! Run options shared by every method.
//!
//! `SolverOptions` carries the stopping tolerance, the iteration cap, the progress
//! logging interval and the Lanczos budget of the positive-definiteness gate. The
//! per-method entry points build one from a bare tolerance; the dispatcher and the
//! comparison routine take it explicitly.

use crate::utils::convergence::MAXITE;

/// Default number of Lanczos steps spent on the positive-definiteness gate.
pub const PD_STEPS: usize = 80;

/// Solver parameters.
#[derive(Clone, Debug)]
pub struct SolverOptions {
    /// Relative-residual tolerance; iteration stops once ‖r‖/‖b‖ < tol.
    pub tol: f64,

    /// Iteration cap; reaching it is a hard failure.
    pub max_iters: usize,

    /// Log progress every this many iterations (0 = silent)
    pub report_interval: usize,

    /// Lanczos steps for the positive-definiteness gate
    pub pd_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iters: MAXITE,
            report_interval: 0,
            pd_steps: PD_STEPS,
        }
    }
}

impl SolverOptions {
    pub fn new(tol: f64) -> Self {
        Self { tol, ..Self::default() }
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_report_interval(mut self, every: usize) -> Self {
        self.report_interval = every;
        self
    }

    pub fn with_pd_steps(mut self, steps: usize) -> Self {
        self.pd_steps = steps;
        self
    }
}
