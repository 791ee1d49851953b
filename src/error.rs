use thiserror::Error;

// Unified error type for itersolve

#[derive(Error, Debug)]
pub enum KError {
    #[error("dimension error: {0}")]
    Dimension(String),
    #[error("singular diagonal: |a[{index},{index}]| = {value:e} is not above 1e-16")]
    SingularDiagonal { index: usize, value: f64 },
    #[error("matrix is not symmetric: a[{row},{col}] != a[{col},{row}]")]
    NotSymmetric { row: usize, col: usize },
    #[error("matrix is not positive definite (eigenvalue or pivot estimate {estimate:e})")]
    NotPositiveDefinite { estimate: f64 },
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error(
        "method did not converge within {iterations} iterations \
         (relative residual {residual:e}, relative error {rel_error:e})"
    )]
    IterationLimitExceeded {
        iterations: usize,
        residual: f64,
        rel_error: f64,
    },
    #[error("indefinite matrix detected (d^T A d <= 0)")]
    IndefiniteMatrix,
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("tolerance must be finite and strictly positive, got {0}")]
    InvalidTolerance(f64),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

impl KError {
    /// True for the non-convergence outcome, as opposed to a rejected input.
    pub fn is_divergence(&self) -> bool {
        matches!(self, KError::IterationLimitExceeded { .. })
    }
}
