//! Method dispatch.
//!
//! `solve` validates the input for the chosen method, derives the method's artifacts from
//! A, and runs the shared loop. Each call owns its artifacts; nothing is cached between
//! calls even when A repeats.

use crate::check::validate;
use crate::config::options::SolverOptions;
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::solver::{ConjugateGradient, GaussSeidel, Jacobi, Method, SteepestDescent, iterate};
use crate::utils::convergence::{Convergence, SolveReport, check_tolerance};
use log::{debug, info};

/// Solve `A x = b` with `method`, reporting the error against the reference `x`.
///
/// # Errors
/// Input violations (`Dimension`, `SingularDiagonal`, `NotSymmetric`,
/// `NotPositiveDefinite`, `InvalidTolerance`) are raised before any iteration;
/// `IterationLimitExceeded` when the budget in `opts` runs out.
pub fn solve(
    method: Method,
    a: &CsrMatrix<f64>,
    b: &[f64],
    x: &[f64],
    opts: &SolverOptions,
) -> Result<SolveReport, KError> {
    check_tolerance(opts.tol)?;
    validate(a, b, x, method.requirements(), opts.pd_steps)?;
    debug!(
        "{method}: n = {}, nnz = {}, tol = {:e}, max_iters = {}",
        a.nrows(),
        a.nnz(),
        opts.tol,
        opts.max_iters
    );

    let conv = Convergence::new(opts.tol, opts.max_iters);
    let every = opts.report_interval;
    let report = match method {
        Method::Jacobi => iterate(&mut Jacobi::new(a)?, a, b, x, &conv, every),
        Method::GaussSeidel => iterate(&mut GaussSeidel::forward(a)?, a, b, x, &conv, every),
        Method::GaussSeidelLibrary => iterate(&mut GaussSeidel::library(a)?, a, b, x, &conv, every),
        Method::Gradient => iterate(&mut SteepestDescent::new(), a, b, x, &conv, every),
        Method::ConjugateGradient => {
            iterate(&mut ConjugateGradient::new(), a, b, x, &conv, every)
        }
    }?;

    info!(
        "{method}: converged in {} iterations, residual {:.3e}, error {:.3e}, {:.6} s",
        report.iterations,
        report.residual,
        report.rel_error,
        report.elapsed_secs()
    );
    Ok(report)
}

/// Jacobi with the default iteration cap.
pub fn solve_jacobi(a: &CsrMatrix<f64>, b: &[f64], x: &[f64], tol: f64) -> Result<SolveReport, KError> {
    solve(Method::Jacobi, a, b, x, &SolverOptions::new(tol))
}

/// Gauss-Seidel with the sparse forward substitution.
pub fn solve_gauss_seidel(a: &CsrMatrix<f64>, b: &[f64], x: &[f64], tol: f64) -> Result<SolveReport, KError> {
    solve(Method::GaussSeidel, a, b, x, &SolverOptions::new(tol))
}

/// Gauss-Seidel with faer's triangular solve.
pub fn solve_gauss_seidel_library(
    a: &CsrMatrix<f64>,
    b: &[f64],
    x: &[f64],
    tol: f64,
) -> Result<SolveReport, KError> {
    solve(Method::GaussSeidelLibrary, a, b, x, &SolverOptions::new(tol))
}

/// Steepest descent; A must be symmetric positive definite.
pub fn solve_gradient(a: &CsrMatrix<f64>, b: &[f64], x: &[f64], tol: f64) -> Result<SolveReport, KError> {
    solve(Method::Gradient, a, b, x, &SolverOptions::new(tol))
}

/// Conjugate gradient; A must be symmetric positive definite.
pub fn solve_conjugate_gradient(
    a: &CsrMatrix<f64>,
    b: &[f64],
    x: &[f64],
    tol: f64,
) -> Result<SolveReport, KError> {
    solve(Method::ConjugateGradient, a, b, x, &SolverOptions::new(tol))
}
