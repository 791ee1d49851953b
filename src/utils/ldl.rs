//! Pivot signs of a sparse LDLᵀ factorization.
//!
//! Symmetric elimination without pivoting on the upper triangle of A. By Sylvester's law of
//! inertia a symmetric A is positive definite exactly when every pivot dₖ is positive, so
//! the sweep certifies definiteness independently of any eigenvalue estimate. Fill is
//! kept in per-row ordered maps; the factor itself is discarded.

use crate::matrix::sparse::CsrMatrix;
use num_traits::Float;
use std::collections::BTreeMap;

/// First pivot of the LDLᵀ of symmetric `a` that is not above `floor`, as `(row, pivot)`.
///
/// Only the upper triangle of `a` is read. `None` means every pivot exceeds `floor`.
pub fn first_nonpositive_pivot<T: Float>(a: &CsrMatrix<T>, floor: T) -> Option<(usize, T)> {
    let n = a.nrows();
    let mut rows: Vec<BTreeMap<usize, T>> = (0..n)
        .map(|i| a.row(i).filter(|&(j, _)| j >= i).collect())
        .collect();

    for k in 0..n {
        let row_k = std::mem::take(&mut rows[k]);
        let d = row_k.get(&k).copied().unwrap_or_else(T::zero);
        if d.is_nan() || d <= floor {
            return Some((k, d));
        }
        let off: Vec<(usize, T)> = row_k.range(k + 1..).map(|(&j, &v)| (j, v)).collect();
        for (p, &(j, u_kj)) in off.iter().enumerate() {
            let l = u_kj / d;
            let row_j = &mut rows[j];
            for &(i, u_ki) in &off[p..] {
                let entry = row_j.entry(i).or_insert_with(T::zero);
                *entry = *entry - l * u_ki;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(n: usize, diag: f64) -> CsrMatrix<f64> {
        let mut triplets = Vec::new();
        for i in 0..n {
            triplets.push((i, i, diag));
            if i + 1 < n {
                triplets.push((i, i + 1, -1.0));
                triplets.push((i + 1, i, -1.0));
            }
        }
        CsrMatrix::from_triplets(n, n, &triplets).unwrap()
    }

    #[test]
    fn spd_has_positive_pivots() {
        assert_eq!(first_nonpositive_pivot(&tridiagonal(50, 2.0), 0.0), None);
        let a = CsrMatrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
        assert_eq!(first_nonpositive_pivot(&a, 0.0), None);
    }

    #[test]
    fn indefinite_two_by_two() {
        // d0 = 1, d1 = 1 - 2·2 = -3
        let a = CsrMatrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        assert_eq!(first_nonpositive_pivot(&a, 0.0), Some((1, -3.0)));
    }

    #[test]
    fn fill_in_is_tracked() {
        // arrow matrix: eliminating row 0 fills the trailing block
        let a = CsrMatrix::from_rows(&[
            vec![1.0, 1.0, 1.0],
            vec![1.0, 2.0, 0.0],
            vec![1.0, 0.0, 2.0],
        ])
        .unwrap();
        // pivots 1, 1, then 1 - (-1)·(-1) = 0 through the filled (1,2) entry
        match first_nonpositive_pivot(&a, 1e-12) {
            Some((2, d)) => assert!(d.abs() < 1e-12),
            other => panic!("unexpected {other:?}"),
        }
    }
}
