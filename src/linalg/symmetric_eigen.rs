use crate::arena::Arena;
use crate::linalg::givens::{givens, rotate_cols};
use crate::linalg::hessenberg::{hfactor, make_hq};
use crate::linalg::sort::sort_descending;
use crate::linalg::{
    check_factor, check_offdiag_len, range_scale, Convergence, LinalgError, QrOptions,
};
use crate::matrix::norm::norm_inf;
use crate::traits::FloatScalar;
use crate::{Matrix, Vector};

/// Implicit QR iteration with Wilkinson shift on a symmetric tridiagonal
/// matrix.
///
/// - `diag[0..n]`: diagonal entries, overwritten with the eigenvalues (unsorted)
/// - `off_diag[0..n-1]`: off-diagonal entries, destroyed
/// - `q`: rotations are accumulated as `Q ← Q·Gᵗ` on its columns
///
/// Sweeps are counted across all blocks; once `options` runs out the
/// current diagonal is returned as [`Convergence::DidNotConverge`].
/// A pair far from unit scale is iterated at unit scale and scaled back.
pub fn trieig<T: FloatScalar>(
    diag: &mut [T],
    off_diag: &mut [T],
    q: Option<&mut Matrix<T>>,
    options: &QrOptions,
) -> Result<Convergence<()>, LinalgError> {
    check_offdiag_len(diag.len(), off_diag.len())?;

    let scale = range_scale(norm_inf(diag).max(norm_inf(off_diag)));
    if let Some(s) = scale {
        for x in diag.iter_mut().chain(off_diag.iter_mut()) {
            *x = *x / s;
        }
    }
    let outcome = tridiagonal_qr(diag, off_diag, q, options);
    if let Some(s) = scale {
        for x in diag.iter_mut().chain(off_diag.iter_mut()) {
            *x = *x * s;
        }
    }
    Ok(outcome)
}

fn tridiagonal_qr<T: FloatScalar>(
    diag: &mut [T],
    off_diag: &mut [T],
    mut q: Option<&mut Matrix<T>>,
    options: &QrOptions,
) -> Convergence<()> {
    let n = diag.len();
    let limit = options.sweep_limit(n);
    let eps = T::epsilon();
    let two = T::two();
    let mut sweeps = 0usize;
    let mut hi = n.saturating_sub(1);

    while hi > 0 {
        let mut lo = hi;
        while lo > 0 {
            let threshold = eps * (diag[lo - 1].abs() + diag[lo].abs());
            if off_diag[lo - 1].abs() <= threshold {
                off_diag[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            continue;
        }

        sweeps += 1;
        if sweeps > limit {
            log::warn!(
                target: "reduct::eigen",
                "tridiagonal QR stopped after {} sweeps, block {}..={} unreduced",
                limit,
                lo,
                hi
            );
            return Convergence::DidNotConverge {
                partial: (),
                iterations: limit,
            };
        }

        // Wilkinson shift
        let d = (diag[hi - 1] - diag[hi]) / two;
        let e = off_diag[hi - 1];
        let denom = d + d.signum() * d.hypot(e);
        let shift = if denom == T::zero() {
            diag[hi]
        } else {
            diag[hi] - e * (e / denom)
        };

        let mut x = diag[lo] - shift;
        let mut z = off_diag[lo];

        for k in lo..hi {
            let (c, s) = givens(x, z);
            if k > lo {
                off_diag[k - 1] = c * x + s * z;
            }

            // T ← G·T·Gᵗ on rows/columns k, k+1
            let d_k = diag[k];
            let d_k1 = diag[k + 1];
            let e_k = off_diag[k];
            let (c2, s2, cs) = (c * c, s * s, c * s);

            diag[k] = c2 * d_k + two * cs * e_k + s2 * d_k1;
            diag[k + 1] = s2 * d_k - two * cs * e_k + c2 * d_k1;
            off_diag[k] = cs * (d_k1 - d_k) + (c2 - s2) * e_k;

            if k + 1 < hi {
                // Bulge at (k, k+2)
                let e_next = off_diag[k + 1];
                x = off_diag[k];
                z = s * e_next;
                off_diag[k + 1] = c * e_next;
            }

            if let Some(q) = q.as_deref_mut() {
                rotate_cols(q, k, k + 1, c, s);
            }
        }
    }

    log::trace!(target: "reduct::eigen", "tridiagonal QR converged in {} sweeps", sweeps);
    Convergence::Converged(())
}

/// Sort eigenvalues descending, swapping the matching columns of `q`.
///
/// Signs are left alone.
pub fn fixeigen<T: FloatScalar>(values: &mut [T], mut q: Option<&mut Matrix<T>>) {
    sort_descending(values, |i, j| {
        if let Some(q) = q.as_deref_mut() {
            q.swap_cols(i, j);
        }
    });
}

/// Symmetric eigendecomposition `Qᵗ·A·Q = diag(λ)` with the default sweep
/// budget.
///
/// `a` is only read; the reduction runs on a copy checked out of `arena`.
/// Both triangles of `a` are used, so it should be exactly symmetric.
/// Eigenvalues come back descending; column `k` of `Q` is the eigenvector
/// for `λ[k]`.
///
/// ```
/// use reduct::{Arena, Matrix};
/// use reduct::linalg::eigen;
///
/// let mut arena = Arena::<f64>::new();
/// let a = Matrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 2.0]);
/// let mut q = arena.matrix(2, 2);
/// let values = eigen(&mut arena, &a, Some(&mut q))
///     .unwrap()
///     .into_result()
///     .unwrap();
/// assert!((values[0] - 3.0).abs() < 1e-12);
/// assert!((values[1] - 1.0).abs() < 1e-12);
/// assert_eq!(a[(0, 1)], 1.0);
/// ```
pub fn eigen<T: FloatScalar>(
    arena: &mut Arena<T>,
    a: &Matrix<T>,
    q: Option<&mut Matrix<T>>,
) -> Result<Convergence<Vector<T>>, LinalgError> {
    eigen_with_options(arena, a, q, &QrOptions::default())
}

/// [`eigen`] with an explicit sweep budget.
pub fn eigen_with_options<T: FloatScalar>(
    arena: &mut Arena<T>,
    a: &Matrix<T>,
    mut q: Option<&mut Matrix<T>>,
    options: &QrOptions,
) -> Result<Convergence<Vector<T>>, LinalgError> {
    if !a.is_square() {
        return Err(LinalgError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    let n = a.nrows();
    if let Some(q) = q.as_deref() {
        check_factor(q, n)?;
    }

    let mut work = arena.copy_of_matrix(a);
    let scale = range_scale(work.norm_max());
    if let Some(s) = scale {
        work /= s;
    }
    let steps = n.saturating_sub(1);
    let mut diag = arena.vector(steps);
    let mut beta = arena.vector(steps);
    hfactor(arena, &mut work, &mut diag, &mut beta)?;
    if let Some(q) = q.as_deref_mut() {
        make_hq(arena, &work, &diag, &beta, q)?;
    }

    let mut values = arena.vector(n);
    let mut off = arena.vector(steps);
    for i in 0..n {
        values[i] = work[(i, i)];
    }
    for i in 0..steps {
        off[i] = work[(i, i + 1)];
    }
    arena.recycle_matrix(work);
    arena.recycle_vector(diag);
    arena.recycle_vector(beta);

    let outcome = tridiagonal_qr(
        values.as_mut_slice(),
        off.as_mut_slice(),
        q.as_deref_mut(),
        options,
    );
    if let Some(s) = scale {
        values *= s;
    }
    fixeigen(values.as_mut_slice(), q);
    arena.recycle_vector(off);

    log::debug!(
        target: "reduct::eigen",
        "eigen {}x{}: converged={}",
        n,
        n,
        outcome.is_converged()
    );
    Ok(outcome.map(|()| values))
}
