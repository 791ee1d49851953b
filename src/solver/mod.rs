//! Iterative method interfaces.
//!
//! Every method plugs into the shared loop in [`driver`] through [`IterativeMethod`]: the
//! loop owns the iterate and the residual, a method owns only the artifacts it derived
//! from A (inverse diagonal, lower triangle, search direction).

use crate::check::Requirements;
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use std::fmt;
use std::str::FromStr;

/// Per-call iteration state, owned by the driver.
#[derive(Clone, Debug)]
pub struct IterationState<T> {
    /// Current iterate x_k.
    pub x_k: Vec<T>,
    /// Residual b − A x_k.
    pub r: Vec<T>,
    /// ‖r‖₂ / ‖b‖₂.
    pub rel: T,
    /// Updates performed so far.
    pub iterations: usize,
}

/// One update rule of a stationary or descent method.
pub trait IterativeMethod<T> {
    /// Called once with the initial state (x₀ = 0, r₀ = b).
    fn start(&mut self, _a: &CsrMatrix<T>, _state: &IterationState<T>) {}

    /// Advance `state.x_k`. The driver refreshes the residual afterwards.
    fn update(&mut self, a: &CsrMatrix<T>, state: &mut IterationState<T>) -> Result<(), KError>;

    /// Called after the residual of the new iterate is known.
    fn after_residual(&mut self, _a: &CsrMatrix<T>, _state: &IterationState<T>) {}
}

/// Method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// x ← x + D⁻¹ r
    Jacobi,
    /// x ← x + L⁻¹ r with the sparse forward substitution
    GaussSeidel,
    /// x ← x + L⁻¹ r with faer's triangular solve
    GaussSeidelLibrary,
    /// Steepest descent, α = rᵗr / rᵗAr
    Gradient,
    /// Conjugate gradient
    ConjugateGradient,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Jacobi,
        Method::GaussSeidel,
        Method::GaussSeidelLibrary,
        Method::Gradient,
        Method::ConjugateGradient,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Jacobi => "jacobi",
            Method::GaussSeidel => "gauss-seidel",
            Method::GaussSeidelLibrary => "gauss-seidel-library",
            Method::Gradient => "gradient",
            Method::ConjugateGradient => "conjugate-gradient",
        }
    }

    /// Checks that must pass before this method may run.
    pub fn requirements(&self) -> Requirements {
        match self {
            Method::Jacobi | Method::GaussSeidel | Method::GaussSeidelLibrary => {
                Requirements::STATIONARY
            }
            Method::Gradient | Method::ConjugateGradient => Requirements::DESCENT,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = KError;

    /// Accepts the method names, common abbreviations and the numeric selectors
    /// 1 (Jacobi), 2 (Gauss-Seidel), 3 (gradient), 4 (conjugate gradient).
    fn from_str(s: &str) -> Result<Self, KError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "jacobi" | "jac" => Ok(Method::Jacobi),
            "2" | "gauss-seidel" | "gauss_seidel" | "gs" => Ok(Method::GaussSeidel),
            "gauss-seidel-library" | "gs-library" | "gs-lib" => Ok(Method::GaussSeidelLibrary),
            "3" | "gradient" | "steepest-descent" | "sd" => Ok(Method::Gradient),
            "4" | "conjugate-gradient" | "cg" => Ok(Method::ConjugateGradient),
            _ => Err(KError::MethodNotFound(s.to_string())),
        }
    }
}

pub mod driver;
pub use driver::iterate;

pub mod triangular;
pub use triangular::{ForwardSubstitution, LibraryTriangular, LowerSolve, solve_lower_triangular};

pub mod jacobi;
pub use jacobi::Jacobi;

pub mod gauss_seidel;
pub use gauss_seidel::GaussSeidel;

pub mod gradient;
pub use gradient::SteepestDescent;

pub mod cg;
pub use cg::ConjugateGradient;
