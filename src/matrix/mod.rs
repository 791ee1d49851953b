//! Matrix module: the CSR matrix type and Matrix Market input.

pub mod market;
pub mod sparse;

pub use market::{parse_matrix_market, read_matrix_market};
pub use sparse::{CsrMatrix, SparseMatrix};
