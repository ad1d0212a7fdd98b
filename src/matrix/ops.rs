use core::ops::{DivAssign, Mul, MulAssign};

use crate::traits::Scalar;

use super::vector::dot;
use super::{Matrix, Vector};

// ── Scalar scaling ──────────────────────────────────────────────────

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for i in 0..self.nrows() {
            for x in self.row_mut(i) {
                *x = *x * rhs;
            }
        }
    }
}

impl<T: Scalar> DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, rhs: T) {
        for i in 0..self.nrows() {
            for x in self.row_mut(i) {
                *x = *x / rhs;
            }
        }
    }
}

impl<T: Scalar> MulAssign<T> for Vector<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.as_mut_slice() {
            *x = *x * rhs;
        }
    }
}

// ── Matrix multiply ─────────────────────────────────────────────────

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols(),
        );
        let mut out = Matrix::zeros(self.nrows(), rhs.ncols());
        for i in 0..self.nrows() {
            let lhs_row = self.row(i);
            let out_row = out.row_mut(i);
            for (k, &a_ik) in lhs_row.iter().enumerate() {
                for (o, &b_kj) in out_row.iter_mut().zip(rhs.row(k)) {
                    *o = *o + a_ik * b_kj;
                }
            }
        }
        out
    }
}

// ── Matrix-vector multiply ──────────────────────────────────────────

impl<T: Scalar> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    /// `A · x`.
    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        let mut out = Vector::zeros(self.nrows());
        self.mul_vec_into(rhs, &mut out);
        out
    }
}

impl<T: Scalar> Matrix<T> {
    /// `out = A · x`, resizing `out` to `nrows`.
    pub fn mul_vec_into(&self, x: &Vector<T>, out: &mut Vector<T>) {
        assert_eq!(self.ncols(), x.len(), "dimension mismatch in A*x");
        out.resize(self.nrows());
        for i in 0..self.nrows() {
            out[i] = dot(self.row(i), x.as_slice());
        }
    }

    /// `out = Aᵗ · x`, resizing `out` to `ncols`.
    pub fn tr_mul_vec_into(&self, x: &Vector<T>, out: &mut Vector<T>) {
        assert_eq!(self.nrows(), x.len(), "dimension mismatch in A^T*x");
        out.resize(self.ncols());
        out.clear();
        for i in 0..self.nrows() {
            let xi = x[i];
            for (o, &a) in out.as_mut_slice().iter_mut().zip(self.row(i)) {
                *o = *o + a * xi;
            }
        }
    }

    /// Transpose.
    ///
    /// ```
    /// use reduct::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = m.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Matrix<T> {
        Matrix::from_fn(self.ncols(), self.nrows(), |i, j| self[(j, i)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_multiply() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_rows(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        let c = &a * &b;
        assert_eq!(c, Matrix::from_rows(2, 2, &[19.0, 22.0, 43.0, 50.0]));
    }

    #[test]
    fn matrix_multiply_non_square() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c, Matrix::from_rows(2, 2, &[58.0, 64.0, 139.0, 154.0]));
    }

    #[test]
    fn multiply_after_shrink() {
        let mut a = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
        a.resize(2, 2);
        let id = Matrix::identity(2);
        assert_eq!(&a * &id, Matrix::from_rows(2, 2, &[0.0, 1.0, 3.0, 4.0]));
    }

    #[test]
    fn matrix_vector() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = Vector::from_slice(&[1.0, 0.0, -1.0]);
        let y = &a * &x;
        assert_eq!(y.as_slice(), &[-2.0, -2.0]);

        let mut z = Vector::zeros(1);
        a.tr_mul_vec_into(&Vector::from_slice(&[1.0, 1.0]), &mut z);
        assert_eq!(z.as_slice(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn scalar_scaling_touches_logical_region() {
        let mut a = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
        a.resize(2, 2);
        a /= 4.0;
        assert_eq!(a, Matrix::from_rows(2, 2, &[0.0, 0.25, 0.75, 1.0]));
        a *= 8.0;
        assert_eq!(a, Matrix::from_rows(2, 2, &[0.0, 2.0, 6.0, 8.0]));

        let mut v = Vector::from_slice(&[1.0, -2.0]);
        v *= 3.0;
        assert_eq!(v.as_slice(), &[3.0, -6.0]);
    }

    #[test]
    fn transpose() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = m.transpose();
        assert_eq!(t, Matrix::from_rows(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]));
    }
}
