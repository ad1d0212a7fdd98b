use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::linalg::LinalgError;
use crate::traits::Scalar;

/// Heap-allocated vector handle with a fixed capacity and a logical length.
///
/// Same grow/shrink rule as [`Matrix`](super::Matrix): shrinking keeps the
/// buffer, growing zero-fills and reallocates only past `max_dim`.
///
/// # Examples
///
/// ```
/// use reduct::Vector;
///
/// let v = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Vector<T> {
    data: Vec<T>,
    dim: usize,
}

impl<T: Scalar> Vector<T> {
    /// Create a zero vector of length `n` (capacity `n`).
    ///
    /// ```
    /// use reduct::Vector;
    /// let v = Vector::<f64>::zeros(4);
    /// assert_eq!(v.len(), 4);
    /// assert_eq!(v[3], 0.0);
    /// ```
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
            dim: n,
        }
    }

    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
            dim: data.len(),
        }
    }

    /// Create a vector from an owned `Vec`.
    ///
    /// ```
    /// use reduct::Vector;
    /// let v = Vector::from_vec(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v[2], 3.0);
    /// ```
    pub fn from_vec(data: Vec<T>) -> Self {
        let dim = data.len();
        Self { data, dim }
    }

    /// Zero the logical elements in place.
    pub fn clear(&mut self) {
        self.as_mut_slice().fill(T::zero());
    }

    /// Change the logical length, zero-filling any newly visible element.
    pub fn resize(&mut self, dim: usize) {
        if dim > self.data.len() {
            self.data.resize(dim, T::zero());
        }
        if dim > self.dim {
            self.data[self.dim..dim].fill(T::zero());
        }
        self.dim = dim;
    }

    /// Copy length and contents from `src`.
    pub fn copy_from(&mut self, src: &Vector<T>) {
        self.resize(src.len());
        self.as_mut_slice().copy_from_slice(src.as_slice());
    }

    /// Remove element `index`, shifting later elements down. `None` is a
    /// no-op. Returns `Ok(None)` when the vector becomes empty.
    ///
    /// ```
    /// use reduct::Vector;
    /// let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
    /// let v = v.delete_element(Some(0)).unwrap().unwrap();
    /// assert_eq!(v.as_slice(), &[2.0, 3.0]);
    /// ```
    pub fn delete_element(mut self, index: Option<usize>) -> Result<Option<Self>, LinalgError> {
        if let Some(i) = index {
            if i >= self.dim {
                return Err(LinalgError::IndexOutOfBounds {
                    index: i,
                    len: self.dim,
                });
            }
            self.as_mut_slice()[i..].rotate_left(1);
            self.dim -= 1;
        }
        if self.dim == 0 {
            Ok(None)
        } else {
            Ok(Some(self))
        }
    }

    /// Dot product.
    ///
    /// ```
    /// use reduct::Vector;
    /// let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        dot(self.as_slice(), rhs.as_slice())
    }
}

impl<T> Vector<T> {
    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.dim
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Allocated length.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Size of the backing buffer in bytes.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.data.len() * core::mem::size_of::<T>()
    }

    /// View the logical elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.dim]
    }

    /// View the logical elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.dim]
    }

    pub(crate) fn reset_len(&mut self) {
        self.dim = self.data.len();
    }
}

#[inline]
pub(crate) fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.as_mut_slice()[i]
    }
}
