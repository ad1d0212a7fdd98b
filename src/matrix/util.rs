use core::fmt::{self, Write as _};

use crate::traits::Scalar;

use super::{Matrix, Vector};

// ── Row / column swaps ──────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Swap two rows in place.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let mut m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.swap_rows(0, 1);
    /// assert_eq!(m[(0, 0)], 3.0);
    /// assert_eq!(m[(1, 0)], 1.0);
    /// ```
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a != b {
            for j in 0..self.ncols() {
                let tmp = self[(a, j)];
                self[(a, j)] = self[(b, j)];
                self[(b, j)] = tmp;
            }
        }
    }

    /// Swap two columns in place.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let mut m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.swap_cols(0, 1);
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(0, 1)], 1.0);
    /// ```
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            for i in 0..self.nrows() {
                self.row_mut(i).swap(a, b);
            }
        }
    }

    /// Negate row `i` in place.
    pub fn negate_row(&mut self, i: usize) {
        for x in self.row_mut(i) {
            *x = T::zero() - *x;
        }
    }
}

// ── Row / Column access ─────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Copy column `j` into `out`, resizing it to `nrows`.
    pub fn copy_col_into(&self, j: usize, out: &mut Vector<T>) {
        out.resize(self.nrows());
        for i in 0..self.nrows() {
            out[i] = self[(i, j)];
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, n) = self.shape();
        // Max width per column for alignment
        let mut widths = alloc::vec![0usize; n];
        for i in 0..m {
            for (j, x) in self.row(i).iter().enumerate() {
                let w = WriteCounting::count(|wc| write!(wc, "{}", x));
                if w > widths[j] {
                    widths[j] = w;
                }
            }
        }

        for i in 0..m {
            write!(f, "│")?;
            for (j, x) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", x, width = widths[j])?;
            }
            write!(f, "│")?;
            if i + 1 < m {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Helper to count characters written, without allocating.
struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.len();
        Ok(())
    }
}
