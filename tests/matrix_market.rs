//! Reading Matrix Market files from disk and solving the loaded system.

use itersolve::{KError, SolverOptions, read_matrix_market, run_all};
use std::fs;
use std::path::PathBuf;

struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("itersolve-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        TempFile(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

const SYMMETRIC_TRIDIAG: &str = "\
%%MatrixMarket matrix coordinate real symmetric
% 4x4 tridiagonal, lower triangle only
4 4 7
1 1 4.0
2 1 -1.0
2 2 4.0
3 2 -1.0
3 3 4.0
4 3 -1.0
4 4 4.0
";

#[test]
fn symmetric_file_loads_mirrored() {
    let file = TempFile::new("tridiag.mtx", SYMMETRIC_TRIDIAG);
    let a = read_matrix_market(&file.0).unwrap();
    assert_eq!((a.nrows(), a.ncols(), a.nnz()), (4, 4, 10));
    assert_eq!(a.get(0, 1), -1.0);
    assert_eq!(a.get(1, 0), -1.0);
    assert_eq!(a.get(3, 3), 4.0);
    assert_eq!(a.get(0, 3), 0.0);
}

#[test]
fn loaded_system_solves_with_every_method() {
    let file = TempFile::new("solve.mtx", SYMMETRIC_TRIDIAG);
    let a = read_matrix_market(&file.0).unwrap();
    let x = vec![1.0; a.ncols()];
    let b = a.mul_vec(&x);
    for outcome in run_all(&a, &b, &x, &SolverOptions::new(1e-10)) {
        let report = outcome.result.unwrap();
        assert!(report.rel_error < 1e-8, "{}", outcome.method);
    }
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("itersolve-does-not-exist.mtx");
    assert!(matches!(read_matrix_market(path), Err(KError::Io(_))));
}

#[test]
fn truncated_file_is_parse_error() {
    let file = TempFile::new(
        "short.mtx",
        "%%MatrixMarket matrix coordinate real general\n2 2 3\n1 1 1.0\n2 2 1.0\n",
    );
    assert!(matches!(read_matrix_market(&file.0), Err(KError::Parse { .. })));
}
