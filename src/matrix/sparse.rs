// SparseMatrix trait and the CSR implementation

use crate::core::traits::{Indexing, MatVec};
use crate::error::KError;
use faer::Mat;
use num_traits::Float;

/// A read‐only sparse matrix supporting y = A * x.
pub trait SparseMatrix<T> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Compute y = A * x.  `x.len() == ncols()`, `y.len() == nrows()`.
    fn spmv(&self, x: &[T], y: &mut [T]);
}

/// Compressed sparse row matrix.
///
/// Column indices are strictly increasing inside each row and no explicit zeros are
/// stored. The position of each diagonal entry is cached at construction, so
/// [`CsrMatrix::diag`] is O(1).
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
    diag_pos: Vec<Option<usize>>,
}

impl<T: Float> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    ///
    /// Rows may be unsorted and may contain duplicates (summed); explicit zeros are dropped.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, KError> {
        if row_ptr.len() != nrows + 1 {
            return Err(KError::Dimension(format!(
                "row_ptr has length {}, expected {}",
                row_ptr.len(),
                nrows + 1
            )));
        }
        if col_idx.len() != values.len() || row_ptr[nrows] != col_idx.len() || row_ptr[0] != 0 {
            return Err(KError::Dimension(format!(
                "inconsistent CSR arrays: row_ptr[{}] = {}, {} column indices, {} values",
                nrows,
                row_ptr[nrows],
                col_idx.len(),
                values.len()
            )));
        }
        if let Some(i) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(KError::Dimension(format!("row_ptr decreases at row {i}")));
        }
        let mut triplets = Vec::with_capacity(values.len());
        for i in 0..nrows {
            for k in row_ptr[i]..row_ptr[i + 1] {
                triplets.push((i, col_idx[k], values[k]));
            }
        }
        Self::from_triplets(nrows, ncols, &triplets)
    }

    /// Build a CSR from (row, col, value) triplets. Duplicates are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self, KError> {
        let mut entries = triplets.to_vec();
        if let Some(&(i, j, _)) = entries.iter().find(|&&(i, j, _)| i >= nrows || j >= ncols) {
            return Err(KError::Dimension(format!(
                "entry ({i}, {j}) outside a {nrows}x{ncols} matrix"
            )));
        }
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut merged: Vec<(usize, usize, T)> = Vec::with_capacity(entries.len());
        for (i, j, v) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == i && last.1 == j => last.2 = last.2 + v,
                _ => merged.push((i, j, v)),
            }
        }
        // entries that are (or summed to) exact zeros are not stored
        merged.retain(|&(_, _, v)| v != T::zero());

        let mut row_ptr = vec![0; nrows + 1];
        for &(i, _, _) in &merged {
            row_ptr[i + 1] += 1;
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        let col_idx = merged.iter().map(|&(_, j, _)| j).collect();
        let values = merged.iter().map(|&(_, _, v)| v).collect();
        Ok(Self::from_sorted_parts(nrows, ncols, row_ptr, col_idx, values))
    }

    /// Assemble from parts that already satisfy the CSR invariants.
    fn from_sorted_parts(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        let diag_pos = (0..nrows)
            .map(|i| {
                let (start, end) = (row_ptr[i], row_ptr[i + 1]);
                col_idx[start..end]
                    .binary_search(&i)
                    .ok()
                    .map(|off| start + off)
            })
            .collect();
        Self { nrows, ncols, row_ptr, col_idx, values, diag_pos }
    }

    /// Copy the nonzeros of a dense faer matrix.
    pub fn from_dense(a: &Mat<T>) -> Self {
        let (nrows, ncols) = (a.nrows(), a.ncols());
        let mut row_ptr = vec![0; nrows + 1];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        for i in 0..nrows {
            for j in 0..ncols {
                let v = a[(i, j)];
                if v != T::zero() {
                    col_idx.push(j);
                    values.push(v);
                }
            }
            row_ptr[i + 1] = col_idx.len();
        }
        Self::from_sorted_parts(nrows, ncols, row_ptr, col_idx, values)
    }

    /// Build from row-major nested rows, e.g. `&[vec![4.0, 1.0], vec![1.0, 3.0]]`.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, KError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(i) = rows.iter().position(|r| r.len() != ncols) {
            return Err(KError::Dimension(format!(
                "row {i} has length {}, expected {ncols}",
                rows[i].len()
            )));
        }
        Ok(Self::from_dense(&Mat::from_fn(nrows, ncols, |i, j| rows[i][j])))
    }

    /// n×n identity.
    pub fn identity(n: usize) -> Self {
        Self::from_sorted_parts(n, n, (0..=n).collect(), (0..n).collect(), vec![T::one(); n])
    }

    pub fn to_dense(&self) -> Mat<T> {
        let mut dense = Mat::<T>::from_fn(self.nrows, self.ncols, |_, _| T::zero());
        for i in 0..self.nrows {
            for (j, v) in self.row(i) {
                dense[(i, j)] = v;
            }
        }
        dense
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Stored entries `(col, value)` of row `i`, in increasing column order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Entry `(i, j)`, zero when not stored.
    pub fn get(&self, i: usize, j: usize) -> T {
        if i == j {
            return self.diag(i);
        }
        let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
        match self.col_idx[start..end].binary_search(&j) {
            Ok(off) => self.values[start + off],
            Err(_) => T::zero(),
        }
    }

    /// Diagonal entry `a[i, i]` in O(1).
    pub fn diag(&self, i: usize) -> T {
        self.diag_pos[i].map_or(T::zero(), |k| self.values[k])
    }

    /// Main diagonal, of length `min(nrows, ncols)`.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.nrows.min(self.ncols)).map(|i| self.diag(i)).collect()
    }

    /// Entries of D⁻¹, i.e. `1 / a[i, i]`.
    ///
    /// Fails with `ZeroPivot` on the first zero (or missing) diagonal entry.
    pub fn inverse_diagonal(&self) -> Result<Vec<T>, KError> {
        self.diagonal()
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                if d == T::zero() {
                    Err(KError::ZeroPivot(i))
                } else {
                    Ok(T::one() / d)
                }
            })
            .collect()
    }

    /// tril(A): the entries with column ≤ row, in the same CSR layout.
    pub fn lower_triangular(&self) -> Self {
        let mut row_ptr = vec![0; self.nrows + 1];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        for i in 0..self.nrows {
            for (j, v) in self.row(i).take_while(|&(j, _)| j <= i) {
                col_idx.push(j);
                values.push(v);
            }
            row_ptr[i + 1] = col_idx.len();
        }
        Self::from_sorted_parts(self.nrows, self.ncols, row_ptr, col_idx, values)
    }

    pub fn transpose(&self) -> Self {
        let mut row_ptr = vec![0; self.ncols + 1];
        for &j in &self.col_idx {
            row_ptr[j + 1] += 1;
        }
        for j in 0..self.ncols {
            row_ptr[j + 1] += row_ptr[j];
        }
        let mut next = row_ptr.clone();
        let mut col_idx = vec![0; self.nnz()];
        let mut values = vec![T::zero(); self.nnz()];
        // rows are visited in order, so each transposed row comes out sorted
        for i in 0..self.nrows {
            for (j, v) in self.row(i) {
                let k = next[j];
                col_idx[k] = i;
                values[k] = v;
                next[j] += 1;
            }
        }
        Self::from_sorted_parts(self.ncols, self.nrows, row_ptr, col_idx, values)
    }

    /// Allocating y = A x.
    pub fn mul_vec(&self, x: &[T]) -> Vec<T> {
        let mut y = vec![T::zero(); self.nrows];
        self.spmv(x, &mut y);
        y
    }
}

impl<T: Float> SparseMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
    fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols);
        assert_eq!(y.len(), self.nrows);
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = self.row(i).fold(T::zero(), |acc, (j, v)| acc + v * x[j]);
        }
    }
}

impl<T: Float> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        self.spmv(x, y);
    }
}

impl<T> Indexing for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
}
