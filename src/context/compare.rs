//! Side-by-side comparison of every method on one system.

use crate::config::options::SolverOptions;
use crate::context::solve_context::solve;
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::solver::Method;
use crate::utils::convergence::SolveReport;

/// One method's result within a comparison run.
#[derive(Debug)]
pub struct MethodOutcome {
    pub method: Method,
    pub result: Result<SolveReport, KError>,
}

impl MethodOutcome {
    pub fn converged(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `methods` one after another on the same (A, b, x). A failing method does not stop
/// the others.
pub fn run_methods(
    methods: &[Method],
    a: &CsrMatrix<f64>,
    b: &[f64],
    x: &[f64],
    opts: &SolverOptions,
) -> Vec<MethodOutcome> {
    methods
        .iter()
        .map(|&method| MethodOutcome { method, result: solve(method, a, b, x, opts) })
        .collect()
}

/// Run every method in [`Method::ALL`] order.
pub fn run_all(a: &CsrMatrix<f64>, b: &[f64], x: &[f64], opts: &SolverOptions) -> Vec<MethodOutcome> {
    run_methods(&Method::ALL, a, b, x, opts)
}
