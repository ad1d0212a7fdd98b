pub(crate) mod norm;
mod ops;
mod util;
pub(crate) mod vector;

pub use vector::Vector;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::linalg::LinalgError;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Heap-allocated matrix handle with a fixed capacity and a logical shape.
///
/// Row-major storage sized `max_rows × max_cols`; row `i` starts at offset
/// `i * max_cols`. The logical shape `nrows × ncols` never exceeds the
/// capacity. Shrinking the logical shape keeps the buffer; growing past the
/// capacity reallocates and re-lays-out the existing rows. Elements exposed
/// by growing are always zero.
///
/// Handles are normally checked out of an [`Arena`](crate::Arena) and handed
/// back to it when no longer needed.
///
/// # Examples
///
/// ```
/// use reduct::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b = Matrix::<f64>::identity(3);
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
    max_rows: usize,
    max_cols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Create an `nrows x ncols` zero matrix whose capacity equals its shape.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.capacity(), (2, 3));
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
            max_rows: nrows,
            max_cols: ncols,
        }
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        m.set_identity();
        m
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self {
            data: row_major.to_vec(),
            nrows,
            ncols,
            max_rows: nrows,
            max_cols: ncols,
        }
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let m = Matrix::from_fn(3, 3, |i, j| if i == j { 1.0_f64 } else { 0.0 });
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self {
            data,
            nrows,
            ncols,
            max_rows: nrows,
            max_cols: ncols,
        }
    }

    /// Zero every element of the logical region in place.
    pub fn clear(&mut self) {
        for i in 0..self.nrows {
            self.row_mut(i).fill(T::zero());
        }
    }

    /// Overwrite the logical region with the identity (ones on the main
    /// diagonal, also for rectangular shapes).
    pub fn set_identity(&mut self) {
        self.clear();
        for i in 0..self.nrows.min(self.ncols) {
            self[(i, i)] = T::one();
        }
    }

    /// Change the logical shape.
    ///
    /// Within capacity the buffer is kept; beyond it the buffer is
    /// reallocated to `max(old, new)` in each dimension and the surviving
    /// elements are copied over. Elements that become visible are zero.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let mut m = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// m.resize(1, 1);
    /// assert_eq!(m.capacity(), (2, 2));
    /// m.resize(3, 2);
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// assert_eq!(m[(2, 1)], 0.0);
    /// ```
    pub fn resize(&mut self, nrows: usize, ncols: usize) {
        if nrows <= self.max_rows && ncols <= self.max_cols {
            // Zero the strip to the right of the old columns, then new rows.
            let keep_rows = self.nrows.min(nrows);
            if ncols > self.ncols {
                for i in 0..keep_rows {
                    let start = i * self.max_cols;
                    self.data[start + self.ncols..start + ncols].fill(T::zero());
                }
            }
            for i in keep_rows..nrows {
                let start = i * self.max_cols;
                self.data[start..start + ncols].fill(T::zero());
            }
        } else {
            let max_rows = self.max_rows.max(nrows);
            let max_cols = self.max_cols.max(ncols);
            let mut data = vec![T::zero(); max_rows * max_cols];
            let keep_cols = self.ncols.min(ncols);
            for i in 0..self.nrows.min(nrows) {
                let src = i * self.max_cols;
                let dst = i * max_cols;
                data[dst..dst + keep_cols].copy_from_slice(&self.data[src..src + keep_cols]);
            }
            log::trace!(
                target: "reduct::arena",
                "matrix capacity grown {}x{} -> {}x{}",
                self.max_rows,
                self.max_cols,
                max_rows,
                max_cols
            );
            self.data = data;
            self.max_rows = max_rows;
            self.max_cols = max_cols;
        }
        self.nrows = nrows;
        self.ncols = ncols;
    }

    /// Copy shape and contents from `src`, growing capacity if needed.
    pub fn copy_from(&mut self, src: &Matrix<T>) {
        self.resize(src.nrows, src.ncols);
        for i in 0..src.nrows {
            self.row_mut(i).copy_from_slice(src.row(i));
        }
    }

    /// Remove one row and/or one column, shifting the remaining rows up and
    /// columns left. `None` leaves that dimension alone.
    ///
    /// Returns `Ok(None)` when the result has no elements, handing the
    /// storage back to the allocator.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let m = Matrix::<f64>::identity(3);
    /// let m = m.delete_row_col(Some(1), None).unwrap().unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 2)], 1.0);
    /// ```
    pub fn delete_row_col(
        mut self,
        row: Option<usize>,
        col: Option<usize>,
    ) -> Result<Option<Self>, LinalgError> {
        if let Some(r) = row {
            if r >= self.nrows {
                return Err(LinalgError::IndexOutOfBounds {
                    index: r,
                    len: self.nrows,
                });
            }
        }
        if let Some(c) = col {
            if c >= self.ncols {
                return Err(LinalgError::IndexOutOfBounds {
                    index: c,
                    len: self.ncols,
                });
            }
        }

        if let Some(c) = col {
            for i in 0..self.nrows {
                self.row_mut(i)[c..].rotate_left(1);
            }
            self.ncols -= 1;
        }
        if let Some(r) = row {
            for i in r..self.nrows - 1 {
                let src = (i + 1) * self.max_cols;
                let dst = i * self.max_cols;
                self.data.copy_within(src..src + self.ncols, dst);
            }
            self.nrows -= 1;
        }

        if self.nrows == 0 || self.ncols == 0 {
            Ok(None)
        } else {
            Ok(Some(self))
        }
    }
}

impl<T> Matrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Logical `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Allocated `(max_rows, max_cols)`.
    #[inline]
    pub fn capacity(&self) -> (usize, usize) {
        (self.max_rows, self.max_cols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Size of the backing buffer in bytes.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.data.len() * core::mem::size_of::<T>()
    }

    /// Row `i` of the logical region.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        let start = i * self.max_cols;
        &self.data[start..start + self.ncols]
    }

    /// Mutable row `i` of the logical region.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        let start = i * self.max_cols;
        &mut self.data[start..start + self.ncols]
    }

    /// Reset the logical shape to the full capacity without touching data.
    /// Used by the arena on checkout.
    pub(crate) fn reset_shape(&mut self) {
        self.nrows = self.max_rows;
        self.ncols = self.max_cols;
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        row * self.max_cols + col
    }
}

// ── Equality (logical region only) ──────────────────────────────────

impl<T: PartialEq> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && (0..self.nrows).all(|i| self.row(i) == other.row(i))
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.offset(row, col)]
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        &self.row(row)[col_start..]
    }
}

impl<T> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let idx = self.offset(row, col);
        &mut self.data[idx]
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        &mut self.row_mut(row)[col_start..]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let idx = self.offset(row, col);
        &mut self.data[idx]
    }
}
