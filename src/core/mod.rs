//! Linear-algebra traits and their implementations for vectors and faer matrices.

pub mod traits;
pub mod wrappers;

pub use traits::{Indexing, InnerProduct, MatVec};
pub use wrappers::{axpy, norm2, sub};
