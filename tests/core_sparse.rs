//! Tests for the CSR operator, the vector kernels and the two lower-triangular backends.

use approx::assert_abs_diff_eq;
use faer::Mat;
use itersolve::core::traits::{InnerProduct, MatVec};
use itersolve::{CsrMatrix, ForwardSubstitution, LibraryTriangular, LowerSolve, axpy, solve_lower_triangular};
use rand::Rng;

fn random_sparse(n: usize, density: f64) -> CsrMatrix<f64> {
    let mut rng = rand::thread_rng();
    let mut triplets = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i == j || rng.r#gen::<f64>() < density {
                triplets.push((i, j, rng.gen_range(-1.0..1.0) + if i == j { 3.0 } else { 0.0 }));
            }
        }
    }
    CsrMatrix::from_triplets(n, n, &triplets).unwrap()
}

/// Sparse and dense products agree on a random pattern.
#[test]
fn spmv_matches_dense_matvec() {
    let n = 20;
    let a = random_sparse(n, 0.2);
    let dense: Mat<f64> = a.to_dense();
    let mut rng = rand::thread_rng();
    let x: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();

    let mut y_sparse = vec![0.0; n];
    a.matvec(&x, &mut y_sparse);
    let mut y_dense = vec![0.0; n];
    dense.matvec(&x, &mut y_dense);
    for i in 0..n {
        assert_abs_diff_eq!(y_sparse[i], y_dense[i], epsilon = 1e-12);
    }
    assert_eq!(a.mul_vec(&x), y_sparse);
}

#[test]
fn dense_round_trip_keeps_pattern() {
    let a = random_sparse(12, 0.3);
    let back = CsrMatrix::from_dense(&a.to_dense());
    assert_eq!(back, a);
}

#[test]
fn dot_norm_and_axpy() {
    let x = vec![1.0, 2.0, 3.0];
    let y = vec![4.0, -5.0, 6.0];
    let ip = ();
    assert_abs_diff_eq!(ip.dot(&x, &y), 12.0, epsilon = 1e-12);
    assert_abs_diff_eq!(ip.norm(&x), 14.0_f64.sqrt(), epsilon = 1e-12);

    let mut z = y.clone();
    axpy(2.0, &x, &mut z);
    assert_eq!(z, vec![6.0, -1.0, 12.0]);
}

/// Sparse forward substitution and faer's triangular solve agree within 1e-10.
#[test]
fn triangular_backends_agree_on_random_factor() {
    let n = 30;
    let l = random_sparse(n, 0.25).lower_triangular();
    let mut rng = rand::thread_rng();
    let rhs: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let direct = solve_lower_triangular(&l, &rhs).unwrap();
    let forward = ForwardSubstitution::new(l.clone()).unwrap().solve_lower(&rhs).unwrap();
    let library = LibraryTriangular::new(&l).unwrap();
    assert_eq!(library.order(), n);
    let via_faer = library.solve_lower(&rhs).unwrap();
    for i in 0..n {
        assert_eq!(direct[i], forward[i]);
        assert_abs_diff_eq!(direct[i], via_faer[i], epsilon = 1e-10);
    }

    // L z reproduces the right-hand side
    let lz = l.mul_vec(&direct);
    for i in 0..n {
        assert_abs_diff_eq!(lz[i], rhs[i], epsilon = 1e-10);
    }
}
