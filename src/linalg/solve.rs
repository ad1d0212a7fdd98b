//! Back-substitution, inversion and covariance from computed factors.
//!
//! None of these routines floor small singular values or eigenvalues.
//! Exact zeros are skipped by the back-substitutions and the covariance;
//! everything else is divided through as given. The `invert` routines take
//! values that the caller has already inverted (and clamped, if wanted).

use crate::arena::Arena;
use crate::linalg::{check_factor, LinalgError};
use crate::traits::FloatScalar;
use crate::{Matrix, Vector};

// ── SVD ─────────────────────────────────────────────────────────────

/// Solve `A·x = b` (least squares for tall `A`) from `Uᵗ·diag(d)·V = A`:
/// `x = Vᵗ·diag(1/d)·(U·b)`. Terms with `d[k] = 0` contribute nothing.
///
/// ```
/// use reduct::{Arena, Matrix, Vector};
/// use reduct::linalg::{svd, svd_back_substitute};
///
/// let mut arena = Arena::<f64>::new();
/// let mut u = arena.matrix(2, 2);
/// let mut v = arena.matrix(2, 2);
/// let a = Matrix::from_rows(2, 2, &[2.0, 0.0, 0.0, 4.0]);
/// let d = svd(&mut arena, a, Some(&mut u), Some(&mut v)).unwrap().into_value();
///
/// let x = svd_back_substitute(&mut arena, &u, &v, &d, &Vector::from_slice(&[4.0, 8.0])).unwrap();
/// assert!((x[0] - 2.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn svd_back_substitute<T: FloatScalar>(
    arena: &mut Arena<T>,
    u: &Matrix<T>,
    v: &Matrix<T>,
    d: &Vector<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    check_factor(u, u.ncols())?;
    check_factor(v, v.ncols())?;
    if b.len() != u.ncols() {
        return Err(LinalgError::ShapeMismatch {
            expected: (u.ncols(), 1),
            got: (b.len(), 1),
        });
    }
    check_values(d, u.nrows().min(v.nrows()))?;

    let mut ub = arena.vector(u.nrows());
    u.mul_vec_into(b, &mut ub);
    for k in 0..d.len() {
        ub[k] = if d[k] == T::zero() { T::zero() } else { ub[k] / d[k] };
    }

    let n = v.ncols();
    let mut x = arena.zeroed_vector(n);
    for k in 0..d.len() {
        let w = ub[k];
        if w == T::zero() {
            continue;
        }
        for (xj, &vkj) in x.as_mut_slice().iter_mut().zip(v.row(k)) {
            *xj = *xj + vkj * w;
        }
    }
    arena.recycle_vector(ub);
    Ok(x)
}

/// `covar[i][j] = Σₖ V[i][k]·V[j][k] / d[k]²`, skipping `d[k] = 0`.
///
/// The sum runs over the columns of `V` as stored. With the row-vector
/// convention of [`svd`](crate::linalg::svd) this is `(AᵗA)⁻¹` when `V`
/// is passed transposed; passing `V` itself gives `V·diag(1/d²)·Vᵗ`.
/// `covar` is resized to `n x n`.
pub fn svd_covariance<T: FloatScalar>(
    covar: &mut Matrix<T>,
    v: &Matrix<T>,
    d: &Vector<T>,
) -> Result<(), LinalgError> {
    check_factor(v, v.ncols())?;
    check_values(d, v.ncols())?;
    covariance(covar, v, d);
    Ok(())
}

/// Pseudo-inverse from pre-inverted singular values:
/// `inv = Vᵗ·diag(iw)·U`.
///
/// `inv` is reused (and resized) when supplied, otherwise checked out of
/// `arena`. Only square factorizations are accepted.
pub fn svd_invert<T: FloatScalar>(
    arena: &mut Arena<T>,
    inv: Option<Matrix<T>>,
    u: &Matrix<T>,
    v: &Matrix<T>,
    iw: &Vector<T>,
) -> Result<Matrix<T>, LinalgError> {
    let n = u.nrows();
    check_factor(u, n)?;
    check_factor(v, n)?;
    if iw.len() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, 1),
            got: (iw.len(), 1),
        });
    }

    let mut out = take_output(arena, inv, n);
    for i in 0..n {
        let row = out.row_mut(i);
        row.fill(T::zero());
        for k in 0..n {
            let w = v[(k, i)] * iw[k];
            if w == T::zero() {
                continue;
            }
            for (o, &ukj) in row.iter_mut().zip(u.row(k)) {
                *o = *o + w * ukj;
            }
        }
    }
    Ok(out)
}

// ── Symmetric eigen ─────────────────────────────────────────────────

/// Solve `A·x = b` from `Qᵗ·A·Q = diag(λ)`:
/// `x = Q·diag(1/λ)·(Qᵗ·b)`. Terms with `λ[k] = 0` contribute nothing.
pub fn eigen_back_substitute<T: FloatScalar>(
    arena: &mut Arena<T>,
    q: &Matrix<T>,
    values: &Vector<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let n = q.nrows();
    check_factor(q, n)?;
    if b.len() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, 1),
            got: (b.len(), 1),
        });
    }
    check_values(values, n)?;

    let mut qtb = arena.vector(n);
    q.tr_mul_vec_into(b, &mut qtb);
    for k in 0..n {
        qtb[k] = if k < values.len() && values[k] != T::zero() {
            qtb[k] / values[k]
        } else {
            T::zero()
        };
    }

    let mut x = arena.vector(n);
    q.mul_vec_into(&qtb, &mut x);
    arena.recycle_vector(qtb);
    Ok(x)
}

/// `covar[i][j] = Σₖ Q[i][k]·Q[j][k] / λ[k]²`, skipping `λ[k] = 0`.
///
/// Eigenvectors are the columns of `Q`, so for symmetric `A` this is
/// `A⁻² = (AᵗA)⁻¹`. Same arithmetic as [`svd_covariance`].
pub fn eigen_covariance<T: FloatScalar>(
    covar: &mut Matrix<T>,
    q: &Matrix<T>,
    values: &Vector<T>,
) -> Result<(), LinalgError> {
    svd_covariance(covar, q, values)
}

/// Inverse from pre-inverted eigenvalues: `inv = Q·diag(iλ)·Qᵗ`.
pub fn eigen_invert<T: FloatScalar>(
    arena: &mut Arena<T>,
    inv: Option<Matrix<T>>,
    q: &Matrix<T>,
    inv_values: &Vector<T>,
) -> Result<Matrix<T>, LinalgError> {
    let n = q.nrows();
    check_factor(q, n)?;
    if inv_values.len() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, 1),
            got: (inv_values.len(), 1),
        });
    }

    let mut out = take_output(arena, inv, n);
    for i in 0..n {
        for j in 0..n {
            let mut sum = T::zero();
            for ((&qik, &qjk), &w) in q.row(i).iter().zip(q.row(j)).zip(inv_values.as_slice()) {
                sum = sum + qik * w * qjk;
            }
            out[(i, j)] = sum;
        }
    }
    Ok(out)
}

// ── Shared ──────────────────────────────────────────────────────────

fn check_values<T>(values: &Vector<T>, max: usize) -> Result<(), LinalgError> {
    if values.len() > max {
        return Err(LinalgError::ShapeMismatch {
            expected: (max, 1),
            got: (values.len(), 1),
        });
    }
    Ok(())
}

fn covariance<T: FloatScalar>(covar: &mut Matrix<T>, v: &Matrix<T>, d: &Vector<T>) {
    let n = v.nrows();
    covar.resize(n, n);
    for i in 0..n {
        for j in 0..=i {
            let mut sum = T::zero();
            for k in 0..d.len() {
                if d[k] != T::zero() {
                    sum = sum + v[(i, k)] * v[(j, k)] / (d[k] * d[k]);
                }
            }
            covar[(i, j)] = sum;
            covar[(j, i)] = sum;
        }
    }
}

fn take_output<T: FloatScalar>(arena: &mut Arena<T>, inv: Option<Matrix<T>>, n: usize) -> Matrix<T> {
    match inv {
        Some(mut m) => {
            m.resize(n, n);
            m
        }
        None => arena.matrix(n, n),
    }
}
