use crate::arena::Arena;
use crate::linalg::householder::{householder_vector, reflect_cols, reflect_rows};
use crate::linalg::{check_factor, LinalgError};
use crate::traits::FloatScalar;
use crate::{Matrix, Vector};

/// Reduce a square matrix to upper Hessenberg form via Householder
/// similarity transforms, `Hᵢ·A·Hᵢ` for `i = 0..n-1`.
///
/// On return:
/// - the upper Hessenberg part of `a` (`i <= j + 1`) holds the reduced
///   matrix
/// - the strictly lower part below the sub-diagonal holds the tails of
///   the Householder vectors, column `k` for reflection `k`
/// - `diag[k]` is the leading entry of vector `k` and `beta[k]` its scale
///
/// `diag` and `beta` are resized to `n - 1`. Pass all three to
/// [`make_hq`] to recover `Q` with `Qᵗ·A₀·Q = H`.
///
/// A symmetric input gives a symmetric tridiagonal `H`.
pub fn hfactor<T: FloatScalar>(
    arena: &mut Arena<T>,
    a: &mut Matrix<T>,
    diag: &mut Vector<T>,
    beta: &mut Vector<T>,
) -> Result<(), LinalgError> {
    if !a.is_square() {
        return Err(LinalgError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    let n = a.nrows();
    let steps = n.saturating_sub(1);
    diag.resize(steps);
    beta.resize(steps);

    let mut x = arena.vector(n);
    let mut h = arena.vector(n);
    for k in 0..steps {
        a.copy_col_into(k, &mut x);
        let hh = householder_vector(x.as_slice(), k + 1, h.as_mut_slice());
        beta[k] = hh.beta;
        diag[k] = h[k + 1];

        // Rows below k+1 of column k keep the vector tail.
        a[(k + 1, k)] = hh.new_value;
        reflect_cols(a, k + 1, k + 1, h.as_slice(), hh.beta);
        reflect_rows(a, 0, k + 1, h.as_slice(), hh.beta);
    }
    arena.recycle_vector(x);
    arena.recycle_vector(h);
    Ok(())
}

/// Build the orthogonal factor `Q = H₀·H₁·…·Hₙ₋₂` from the reflections
/// stored by [`hfactor`].
///
/// The reflections are applied to the identity last-to-first, so `Q` is
/// never formed as a running product during reduction.
pub fn make_hq<T: FloatScalar>(
    arena: &mut Arena<T>,
    h: &Matrix<T>,
    diag: &Vector<T>,
    beta: &Vector<T>,
    q: &mut Matrix<T>,
) -> Result<(), LinalgError> {
    let n = h.nrows();
    check_factor(q, n)?;
    let steps = n.saturating_sub(1);
    if diag.len() != steps || beta.len() != steps {
        return Err(LinalgError::ShapeMismatch {
            expected: (steps, 1),
            got: (diag.len().min(beta.len()), 1),
        });
    }

    q.set_identity();
    let mut v = arena.vector(n);
    for j in (0..steps).rev() {
        v.clear();
        v[j + 1] = diag[j];
        for i in (j + 2)..n {
            v[i] = h[(i, j)];
        }
        reflect_cols(q, j + 1, 0, v.as_slice(), beta[j]);
    }
    arena.recycle_vector(v);
    Ok(())
}
