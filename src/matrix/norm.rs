use crate::traits::FloatScalar;

use super::{Matrix, Vector};

// ── Vector norms ────────────────────────────────────────────────────

impl<T: FloatScalar> Vector<T> {
    /// L2 (Euclidean) norm.
    ///
    /// ```
    /// use reduct::Vector;
    /// let v = Vector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Infinity norm (largest absolute element).
    pub fn norm_inf(&self) -> T {
        norm_inf(self.as_slice())
    }
}

#[inline]
pub(crate) fn norm_inf<T: FloatScalar>(xs: &[T]) -> T {
    xs.iter().fold(T::zero(), |m, &x| m.max(x.abs()))
}

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Frobenius norm (square root of sum of squared elements).
    pub fn norm_frobenius(&self) -> T {
        let mut sum = T::zero();
        for i in 0..self.nrows() {
            for &x in self.row(i) {
                sum = sum + x * x;
            }
        }
        sum.sqrt()
    }

    /// Largest absolute element.
    pub fn norm_max(&self) -> T {
        (0..self.nrows()).fold(T::zero(), |m, i| m.max(norm_inf(self.row(i))))
    }
}
