use crate::matrix::norm::norm_inf;
use crate::matrix::vector::dot;
use crate::traits::{FloatScalar, MatrixMut};

/// Scalars describing a Householder reflection `H = I - β·h·hᵗ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Householder<T> {
    /// Scale factor; zero means `H = I`.
    pub beta: T,
    /// The value `H·x` leaves at the pivot index.
    pub new_value: T,
}

/// Compute the Householder vector for `x` pivoting at `i0`.
///
/// Writes `h` (same length as `x`) so that `H = I - β·h·hᵗ` maps `x` to a
/// vector that agrees with `x` before `i0`, holds `new_value` at `i0` and is
/// zero after it. `h` is zero before `i0` and equals `x` after it.
///
/// `new_value = ∓‖x[i0..]‖`, with the sign opposite to `x[i0]` so the pivot
/// update never cancels. A zero tail gives `β = 0`.
///
/// ```
/// use reduct::linalg::householder_vector;
///
/// let x = [0.0_f64, 3.0, 4.0];
/// let mut h = [0.0; 3];
/// let hh = householder_vector(&x, 1, &mut h);
/// assert!((hh.new_value + 5.0).abs() < 1e-12);
/// assert_eq!(h[0], 0.0);
/// assert!((h[1] - 8.0).abs() < 1e-12);
/// ```
pub fn householder_vector<T: FloatScalar>(x: &[T], i0: usize, h: &mut [T]) -> Householder<T> {
    let n = x.len();
    assert_eq!(h.len(), n, "householder vector length mismatch");
    assert!(i0 < n, "pivot {} out of bounds for length {}", i0, n);

    h[..i0].fill(T::zero());
    h[i0..].copy_from_slice(&x[i0..]);

    // Accumulate against the largest entry so the sum of squares stays finite.
    let scale = norm_inf(&h[i0..]);
    if scale == T::zero() {
        return Householder {
            beta: T::zero(),
            new_value: x[i0],
        };
    }
    let sum = h[i0..].iter().fold(T::zero(), |acc, &hi| {
        let r = hi / scale;
        acc + r * r
    });
    let norm = scale * sum.sqrt();

    let beta = T::one() / (norm * (norm + h[i0].abs()));
    let new_value = if h[i0] > T::zero() { -norm } else { norm };
    h[i0] = h[i0] - new_value;

    Householder { beta, new_value }
}

/// `x[i0..] -= β·(h·x)·h`, applying the reflection to a vector in place.
pub fn reflect_vector<T: FloatScalar>(h: &[T], beta: T, i0: usize, x: &mut [T]) {
    if beta == T::zero() {
        return;
    }
    let s = beta * dot(&h[i0..], &x[i0..]);
    for (xi, &hi) in x[i0..].iter_mut().zip(&h[i0..]) {
        *xi = *xi - s * hi;
    }
}

/// Right-multiply rows `i0..` of `m` by the reflection, touching columns `j0..`.
///
/// Each affected row becomes `row[j0..] -= β·(row·h)·h`.
pub fn reflect_rows<T: FloatScalar>(
    m: &mut impl MatrixMut<T>,
    i0: usize,
    j0: usize,
    h: &[T],
    beta: T,
) {
    if beta == T::zero() || j0 >= m.ncols() {
        return;
    }
    let hv = &h[j0..m.ncols()];
    for i in i0..m.nrows() {
        let row = m.row_as_mut_slice(i, j0);
        let s = beta * dot(row, hv);
        for (r, &hj) in row.iter_mut().zip(hv) {
            *r = *r - s * hj;
        }
    }
}

/// Left-multiply columns `j0..` of `m` by the reflection, touching rows `i0..`.
///
/// Each affected column becomes `col[i0..] -= β·(h·col)·h`.
pub fn reflect_cols<T: FloatScalar>(
    m: &mut impl MatrixMut<T>,
    i0: usize,
    j0: usize,
    h: &[T],
    beta: T,
) {
    if beta == T::zero() {
        return;
    }
    let nrows = m.nrows();
    for j in j0..m.ncols() {
        let mut s = T::zero();
        for i in i0..nrows {
            s = s + h[i] * *m.get(i, j);
        }
        s = s * beta;
        for i in i0..nrows {
            let mij = m.get_mut(i, j);
            *mij = *mij - s * h[i];
        }
    }
}
