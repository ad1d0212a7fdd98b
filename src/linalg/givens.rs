use crate::traits::{FloatScalar, MatrixMut};

/// Givens rotation: compute `(c, s)` such that `[c, s; -s, c] * [x; y] = [r; 0]`
/// with `r = hypot(x, y)`.
///
/// Returns `(1, 0)` when both inputs are zero.
///
/// ```
/// use reduct::linalg::givens;
///
/// let (c, s) = givens(3.0_f64, 4.0);
/// assert!((c - 0.6).abs() < 1e-12);
/// assert!((s - 0.8).abs() < 1e-12);
/// ```
#[inline]
pub fn givens<T: FloatScalar>(x: T, y: T) -> (T, T) {
    let r = x.hypot(y);
    if r == T::zero() {
        (T::one(), T::zero())
    } else {
        (x / r, y / r)
    }
}

/// Rotate rows `i` and `k` of `m`:
/// `row_i ← c·row_i + s·row_k`, `row_k ← -s·row_i + c·row_k`.
pub fn rotate_rows<T: FloatScalar>(m: &mut impl MatrixMut<T>, i: usize, k: usize, c: T, s: T) {
    for j in 0..m.ncols() {
        let a = *m.get(i, j);
        let b = *m.get(k, j);
        *m.get_mut(i, j) = c * a + s * b;
        *m.get_mut(k, j) = c * b - s * a;
    }
}

/// Rotate columns `i` and `k` of `m`:
/// `col_i ← c·col_i + s·col_k`, `col_k ← -s·col_i + c·col_k`.
pub fn rotate_cols<T: FloatScalar>(m: &mut impl MatrixMut<T>, i: usize, k: usize, c: T, s: T) {
    for r in 0..m.nrows() {
        let row = m.row_as_mut_slice(r, 0);
        let a = row[i];
        let b = row[k];
        row[i] = c * a + s * b;
        row[k] = c * b - s * a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matrix;

    const TOL: f64 = 1e-12;

    #[test]
    fn zeroes_second_component() {
        for &(x, y) in &[(1.0_f64, 1.0), (-2.0, 5.0), (0.0, -3.0), (4.0, 0.0)] {
            let (c, s) = givens(x, y);
            assert!((c * c + s * s - 1.0).abs() < TOL);
            assert!((-s * x + c * y).abs() < TOL, "({}, {})", x, y);
            assert!((c * x + s * y - x.hypot(y)).abs() < TOL);
        }
    }

    #[test]
    fn zero_input_is_identity() {
        assert_eq!(givens(0.0_f64, 0.0), (1.0, 0.0));
    }

    #[test]
    fn rows_then_cols_are_transposes() {
        let (c, s) = givens(1.0_f64, 2.0);
        let mut a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut at = a.transpose();
        rotate_rows(&mut a, 0, 1, c, s);
        rotate_cols(&mut at, 0, 1, c, s);
        assert_eq!(a.transpose(), at);
    }

    #[test]
    fn rotation_preserves_column_norms() {
        let (c, s) = givens(3.0_f64, -1.0);
        let mut a = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let before: f64 = a.norm_frobenius();
        rotate_rows(&mut a, 0, 2, c, s);
        assert!((a.norm_frobenius() - before).abs() < TOL);
        // untouched row
        assert_eq!(a.row(1), &[3.0, 4.0]);
    }
}
