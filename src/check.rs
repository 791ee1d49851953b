//! Input validation run before any iteration.
//!
//! Every method needs a square matrix with a usable diagonal and vectors of matching
//! length. Steepest descent and conjugate gradient additionally need a symmetric positive
//! definite matrix. All checks are read-only, so a rejected input leaves nothing behind.

use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::utils::as_f64;
use crate::utils::lanczos::lanczos;
use crate::utils::ldl::first_nonpositive_pivot;
use bitflags::bitflags;
use log::debug;
use num_traits::Float;

/// Diagonal entries must be strictly larger than this in magnitude.
pub const DIAGONAL_EPS: f64 = 1e-16;

bitflags! {
    /// Checks a method requires before it may run.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Requirements: u32 {
        const DIMENSIONS         = 0b0001;
        const NONZERO_DIAGONAL   = 0b0010;
        const SYMMETRIC          = 0b0100;
        const POSITIVE_DEFINITE  = 0b1000;
        const STATIONARY         = Self::DIMENSIONS.bits() | Self::NONZERO_DIAGONAL.bits();
        const DESCENT            = Self::STATIONARY.bits() | Self::SYMMETRIC.bits() | Self::POSITIVE_DEFINITE.bits();
    }
}

/// A must be square, `x` must have A's row count, and every |a[i,i]| must exceed 1e-16.
pub fn check_dimensions<T: Float>(a: &CsrMatrix<T>, x: &[T]) -> Result<(), KError> {
    check_shape(a, x.len(), "x")?;
    check_diagonal(a)
}

fn check_shape<T: Float>(a: &CsrMatrix<T>, len: usize, what: &str) -> Result<(), KError> {
    if !a.is_square() {
        return Err(KError::Dimension(format!(
            "matrix is {}x{}, not square",
            a.nrows(),
            a.ncols()
        )));
    }
    if len != a.nrows() {
        return Err(KError::Dimension(format!(
            "{what} has length {len}, matrix has {} rows",
            a.nrows()
        )));
    }
    Ok(())
}

fn check_diagonal<T: Float>(a: &CsrMatrix<T>) -> Result<(), KError> {
    let eps = T::from(DIAGONAL_EPS).unwrap_or_else(T::epsilon);
    match a.diagonal().into_iter().enumerate().find(|&(_, d)| d.abs() <= eps) {
        Some((index, d)) => Err(KError::SingularDiagonal { index, value: as_f64(d) }),
        None => Ok(()),
    }
}

/// A must equal Aᵗ exactly: A − Aᵗ has no nonzero entry.
pub fn is_symmetric<T: Float>(a: &CsrMatrix<T>) -> Result<(), KError> {
    if !a.is_square() {
        return Err(KError::Dimension(format!(
            "matrix is {}x{}, not square",
            a.nrows(),
            a.ncols()
        )));
    }
    for i in 0..a.nrows() {
        // entries are unique and nonzero, so matching every stored (i, j) against (j, i)
        // also catches entries that exist on one side only
        if let Some((j, _)) = a.row(i).find(|&(j, v)| a.get(j, i) != v) {
            return Err(KError::NotSymmetric { row: i, col: j });
        }
    }
    Ok(())
}

/// Gate on the sign of λ_min(A), assuming A symmetric.
///
/// A non-positive diagonal entry is a Rayleigh quotient ≤ 0 and rejects A outright. A
/// Lanczos run of at most `steps` steps follows; its lowest Ritz value bounds λ_min from
/// above, so a non-positive estimate rejects A. A positive estimate is only accepted once
/// every LDLᵀ pivot of A is positive. Values within rounding distance of zero (relative
/// to ‖A‖∞) count as singular.
pub fn is_positive_definite<T: Float>(a: &CsrMatrix<T>, steps: usize) -> Result<(), KError> {
    if let Some(&d) = a.diagonal().iter().find(|&&d| d <= T::zero()) {
        return Err(KError::NotPositiveDefinite { estimate: as_f64(d) });
    }
    let n = T::from(a.nrows().max(1)).unwrap_or_else(T::one);
    let ten = T::from(10.0).unwrap_or_else(T::one);
    let floor = ten * n * T::epsilon() * row_sum_norm(a);

    let lowest = lanczos(a, steps).lowest();
    if lowest.is_nan() || lowest <= floor {
        return Err(KError::NotPositiveDefinite { estimate: as_f64(lowest) });
    }
    match first_nonpositive_pivot(a, floor) {
        Some((k, pivot)) => {
            debug!(
                "Lanczos estimate {:.3e} is positive but LDLᵀ pivot {k} is {:.3e}",
                as_f64(lowest),
                as_f64(pivot)
            );
            Err(KError::NotPositiveDefinite { estimate: as_f64(pivot) })
        }
        None => Ok(()),
    }
}

/// max_i Σ_j |a[i,j]|, an upper bound on the spectral radius.
fn row_sum_norm<T: Float>(a: &CsrMatrix<T>) -> T {
    (0..a.nrows())
        .map(|i| a.row(i).fold(T::zero(), |acc, (_, v)| acc + v.abs()))
        .fold(T::zero(), T::max)
}

/// Symmetry, then positive definiteness. Required by steepest descent and conjugate gradient.
pub fn check_gradient_feasible<T: Float>(a: &CsrMatrix<T>, steps: usize) -> Result<(), KError> {
    is_symmetric(a)?;
    is_positive_definite(a, steps)
}

/// Run every check in `req` on (A, b, x).
pub fn validate<T: Float>(
    a: &CsrMatrix<T>,
    b: &[T],
    x: &[T],
    req: Requirements,
    pd_steps: usize,
) -> Result<(), KError> {
    if req.contains(Requirements::DIMENSIONS) {
        check_shape(a, x.len(), "x")?;
        check_shape(a, b.len(), "b")?;
    }
    if req.contains(Requirements::NONZERO_DIAGONAL) {
        check_diagonal(a)?;
    }
    if req.contains(Requirements::SYMMETRIC) {
        is_symmetric(a)?;
    }
    if req.contains(Requirements::POSITIVE_DEFINITE) {
        is_positive_definite(a, pd_steps)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[Vec<f64>]) -> CsrMatrix<f64> {
        CsrMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn rejects_non_square() {
        let a = m(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(matches!(check_dimensions(&a, &[0.0, 0.0]), Err(KError::Dimension(_))));
    }

    #[test]
    fn rejects_length_mismatch() {
        let a = m(&[vec![4.0, 1.0], vec![1.0, 3.0]]);
        assert!(matches!(check_dimensions(&a, &[0.0; 3]), Err(KError::Dimension(_))));
        let err = validate(&a, &[1.0], &[0.0, 0.0], Requirements::STATIONARY, 10).unwrap_err();
        assert!(matches!(err, KError::Dimension(msg) if msg.starts_with('b')));
    }

    #[test]
    fn rejects_tiny_diagonal() {
        let a = m(&[vec![1.0, 1.0], vec![1.0, 1e-17]]);
        match check_dimensions(&a, &[0.0, 0.0]) {
            Err(KError::SingularDiagonal { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn symmetry_is_exact() {
        assert!(is_symmetric(&m(&[vec![2.0, 1.0], vec![1.0, 2.0]])).is_ok());
        let err = is_symmetric(&m(&[vec![2.0, 1.0], vec![0.0, 2.0]])).unwrap_err();
        assert!(matches!(err, KError::NotSymmetric { row: 0, col: 1 }));
        assert!(is_symmetric(&m(&[vec![2.0, 1.0], vec![1.0 + 1e-15, 2.0]])).is_err());
    }

    #[test]
    fn symmetry_catches_one_sided_lower_entry() {
        let err = is_symmetric(&m(&[vec![2.0, 0.0], vec![3.0, 2.0]])).unwrap_err();
        assert!(matches!(err, KError::NotSymmetric { row: 1, col: 0 }));
    }

    #[test]
    fn positive_definite_gate() {
        assert!(is_positive_definite(&m(&[vec![4.0, 1.0], vec![1.0, 3.0]]), 10).is_ok());
        // eigenvalues -1, 3 with a positive diagonal
        let err = is_positive_definite(&m(&[vec![1.0, 2.0], vec![2.0, 1.0]]), 10).unwrap_err();
        match err {
            KError::NotPositiveDefinite { estimate } => assert!((estimate + 1.0).abs() < 1e-8),
            other => panic!("unexpected {other:?}"),
        }
        assert!(is_positive_definite(&m(&[vec![-1.0, 0.0], vec![0.0, 1.0]]), 10).is_err());
    }

    #[test]
    fn singular_spd_candidate_is_rejected() {
        // [[1,1],[1,1]] has eigenvalues 0 and 2
        assert!(is_positive_definite(&m(&[vec![1.0, 1.0], vec![1.0, 1.0]]), 10).is_err());
    }

    /// tridiag(-1, 2 + shift, -1) of order n.
    fn shifted_laplacian(n: usize, shift: f64) -> CsrMatrix<f64> {
        let mut triplets = Vec::new();
        for i in 0..n {
            triplets.push((i, i, 2.0 + shift));
            if i + 1 < n {
                triplets.push((i, i + 1, -1.0));
                triplets.push((i + 1, i, -1.0));
            }
        }
        CsrMatrix::from_triplets(n, n, &triplets).unwrap()
    }

    #[test]
    fn short_lanczos_run_does_not_accept_indefinite_matrix() {
        // λ_min of the unshifted Laplacian is λ₁ = 2 - 2cos(π/(n+1)); shifting by -2λ₁
        // leaves one eigenvalue at -λ₁ ≈ -2.5e-6 behind a positive diagonal
        let n = 2000;
        let lambda_1 = 2.0 - 2.0 * (std::f64::consts::PI / (n as f64 + 1.0)).cos();
        let a = shifted_laplacian(n, -2.0 * lambda_1);
        let lowest = lanczos(&a, 80).lowest();
        assert!(lowest > 0.0, "80 Lanczos steps already resolve λ_min ({lowest:e})");
        match is_positive_definite(&a, 80) {
            Err(KError::NotPositiveDefinite { estimate }) => assert!(estimate < 0.0),
            other => panic!("unexpected {other:?}"),
        }
        assert!(is_positive_definite(&shifted_laplacian(n, 0.0), 80).is_ok());
    }

    #[test]
    fn zero_lanczos_budget_still_decides() {
        assert!(is_positive_definite(&shifted_laplacian(50, 0.0), 0).is_ok());
        assert!(is_positive_definite(&m(&[vec![1.0, 2.0], vec![2.0, 1.0]]), 0).is_err());
    }

    #[test]
    fn gradient_feasibility_checks_symmetry_first() {
        let err = check_gradient_feasible(&m(&[vec![2.0, 1.0], vec![0.0, 2.0]]), 10).unwrap_err();
        assert!(matches!(err, KError::NotSymmetric { .. }));
    }

    #[test]
    fn requirements_compose() {
        assert!(Requirements::DESCENT.contains(Requirements::STATIONARY));
        assert!(!Requirements::STATIONARY.contains(Requirements::SYMMETRIC));
    }
}
