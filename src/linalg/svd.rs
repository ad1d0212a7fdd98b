use crate::arena::Arena;
use crate::linalg::givens::{givens, rotate_rows};
use crate::linalg::householder::{householder_vector, reflect_cols, reflect_rows};
use crate::linalg::sort::sort_descending;
use crate::linalg::{
    check_factor, check_offdiag_len, range_scale, Convergence, LinalgError, QrOptions,
};
use crate::matrix::norm::norm_inf;
use crate::traits::FloatScalar;
use crate::{Matrix, Vector};

// ── Householder bidiagonalization ───────────────────────────────────

/// Householder bidiagonalization in place.
///
/// For `rows >= cols` the result is upper bidiagonal: diagonal `a[i][i]`,
/// super-diagonal `a[i][i+1]`. For `rows < cols` it is lower bidiagonal:
/// diagonal `a[i][i]`, sub-diagonal `a[i+1][i]`. Every other entry is
/// zeroed.
///
/// Each left reflection `H` is accumulated as `U ← H·U` and each right
/// reflection as `V ← H·V`, so that `U·A₀·Vᵗ = B` holds whenever `U` and `V`
/// start as identities. `U` must be `rows x rows`, `V` `cols x cols`;
/// `None` skips accumulation.
pub fn bifactor<T: FloatScalar>(
    arena: &mut Arena<T>,
    a: &mut Matrix<T>,
    mut u: Option<&mut Matrix<T>>,
    mut v: Option<&mut Matrix<T>>,
) {
    let (m, n) = a.shape();
    let mut col = arena.vector(m);
    let mut hc = arena.vector(m);
    let mut hr = arena.vector(n);

    if m >= n {
        for k in 0..n {
            // Left reflection: zero a[k+1.., k]
            if k + 1 < m {
                a.copy_col_into(k, &mut col);
                let hh = householder_vector(col.as_slice(), k, hc.as_mut_slice());
                reflect_cols(a, k, k + 1, hc.as_slice(), hh.beta);
                a[(k, k)] = hh.new_value;
                for i in (k + 1)..m {
                    a[(i, k)] = T::zero();
                }
                if let Some(u) = u.as_deref_mut() {
                    reflect_cols(u, k, 0, hc.as_slice(), hh.beta);
                }
            }

            // Right reflection: zero a[k, k+2..]
            if k + 2 < n {
                let hh = householder_vector(a.row(k), k + 1, hr.as_mut_slice());
                reflect_rows(a, k + 1, k + 1, hr.as_slice(), hh.beta);
                a[(k, k + 1)] = hh.new_value;
                for j in (k + 2)..n {
                    a[(k, j)] = T::zero();
                }
                if let Some(v) = v.as_deref_mut() {
                    reflect_cols(v, k + 1, 0, hr.as_slice(), hh.beta);
                }
            }
        }
    } else {
        for k in 0..m {
            // Right reflection first: zero a[k, k+1..]
            let hh = householder_vector(a.row(k), k, hr.as_mut_slice());
            reflect_rows(a, k + 1, k, hr.as_slice(), hh.beta);
            a[(k, k)] = hh.new_value;
            for j in (k + 1)..n {
                a[(k, j)] = T::zero();
            }
            if let Some(v) = v.as_deref_mut() {
                reflect_cols(v, k, 0, hr.as_slice(), hh.beta);
            }

            // Left reflection: zero a[k+2.., k]
            if k + 2 < m {
                a.copy_col_into(k, &mut col);
                let hh = householder_vector(col.as_slice(), k + 1, hc.as_mut_slice());
                reflect_cols(a, k + 1, k + 1, hc.as_slice(), hh.beta);
                a[(k + 1, k)] = hh.new_value;
                for i in (k + 2)..m {
                    a[(i, k)] = T::zero();
                }
                if let Some(u) = u.as_deref_mut() {
                    reflect_cols(u, k + 1, 0, hc.as_slice(), hh.beta);
                }
            }
        }
    }

    arena.recycle_vector(col);
    arena.recycle_vector(hc);
    arena.recycle_vector(hr);
}

// ── Golub-Kahan bidiagonal QR ───────────────────────────────────────

/// Implicit-shift QR iteration on the upper bidiagonal pair `(d, f)`.
///
/// `d` has length `n`, `f` length `n - 1`. Right rotations are applied to
/// the rows of `v`, left rotations to the rows of `u`, which keeps
/// `U·A·Vᵗ = B` true for the evolving `B`. On return `d` holds the singular
/// values, non-negative and descending (see [`fixsvd`]), and `f` is zero.
///
/// Sweeps are counted across all blocks; once `options` runs out the
/// values are post-processed as usual and returned as
/// [`Convergence::DidNotConverge`].
///
/// A pair whose largest magnitude is outside the range where squares stay
/// finite and normal is iterated at unit scale and scaled back.
pub fn bisvd<T: FloatScalar>(
    d: &mut [T],
    f: &mut [T],
    u: Option<&mut Matrix<T>>,
    v: Option<&mut Matrix<T>>,
    options: &QrOptions,
) -> Result<Convergence<()>, LinalgError> {
    check_offdiag_len(d.len(), f.len())?;

    let scale = range_scale(norm_inf(d).max(norm_inf(f)));
    if let Some(s) = scale {
        for x in d.iter_mut().chain(f.iter_mut()) {
            *x = *x / s;
        }
    }
    let outcome = golub_kahan(d, f, u, v, options);
    if let Some(s) = scale {
        for x in d.iter_mut().chain(f.iter_mut()) {
            *x = *x * s;
        }
    }
    Ok(outcome)
}

fn golub_kahan<T: FloatScalar>(
    d: &mut [T],
    f: &mut [T],
    mut u: Option<&mut Matrix<T>>,
    mut v: Option<&mut Matrix<T>>,
    options: &QrOptions,
) -> Convergence<()> {
    let n = d.len();
    let limit = options.sweep_limit(n);
    let eps = T::epsilon();
    let size = norm_inf(d) + norm_inf(f);
    let mut sweeps = 0usize;
    let mut hi = n.saturating_sub(1);

    while hi > 0 {
        // Deflation: trailing super-diagonal negligible
        if f[hi - 1].abs() <= eps * (d[hi - 1].abs() + d[hi].abs()) {
            f[hi - 1] = T::zero();
            hi -= 1;
            continue;
        }

        // Find lo: start of unreduced block
        let mut lo = hi - 1;
        while lo > 0 {
            if f[lo - 1].abs() <= eps * (d[lo - 1].abs() + d[lo].abs()) {
                f[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        sweeps += 1;
        if sweeps > limit {
            log::warn!(
                target: "reduct::svd",
                "bidiagonal QR stopped after {} sweeps, block {}..={} unreduced",
                limit,
                lo,
                hi
            );
            fixsvd(d, u, v);
            return Convergence::DidNotConverge {
                partial: (),
                iterations: limit,
            };
        }

        // A zero on the diagonal splits the block once f[idx] is chased
        // off to the right with left rotations.
        if let Some(idx) = (lo..hi).find(|&idx| d[idx].abs() <= eps * size) {
            d[idx] = T::zero();
            let mut z = f[idx];
            f[idx] = T::zero();
            for j in (idx + 1)..=hi {
                let (c, s) = givens(d[j], z);
                d[j] = c * d[j] + s * z;
                if j < hi {
                    z = -s * f[j];
                    f[j] = c * f[j];
                }
                if let Some(u) = u.as_deref_mut() {
                    rotate_rows(u, j, idx, c, s);
                }
            }
            continue;
        }

        // Wilkinson shift from trailing 2×2 of BᵗB
        let d_hi = d[hi];
        let d_hi1 = d[hi - 1];
        let f_hi1 = f[hi - 1];
        let f_hi2 = if hi >= lo + 2 { f[hi - 2] } else { T::zero() };

        let t11 = d_hi1 * d_hi1 + f_hi2 * f_hi2;
        let t12 = d_hi1 * f_hi1;
        let t22 = d_hi * d_hi + f_hi1 * f_hi1;

        let delta = (t11 - t22) / T::two();
        let denom = delta + delta.signum() * delta.hypot(t12);
        let mu = if denom == T::zero() {
            t22
        } else {
            t22 - t12 * (t12 / denom)
        };

        // Implicit QR chase
        let mut x = d[lo] * d[lo] - mu;
        let mut z = d[lo] * f[lo];

        for k in lo..hi {
            // Right rotation on columns k, k+1
            let (c, s) = givens(x, z);
            if k > lo {
                f[k - 1] = c * x + s * z;
            }

            let dk = d[k];
            let fk = f[k];
            let dk1 = d[k + 1];
            d[k] = c * dk + s * fk;
            f[k] = c * fk - s * dk;
            let bulge = s * dk1;
            d[k + 1] = c * dk1;

            if let Some(v) = v.as_deref_mut() {
                rotate_rows(v, k, k + 1, c, s);
            }

            // Left rotation on rows k, k+1 to remove the bulge at (k+1, k)
            let (c, s) = givens(d[k], bulge);
            d[k] = c * d[k] + s * bulge;
            let fk = f[k];
            let dk1 = d[k + 1];
            f[k] = c * fk + s * dk1;
            d[k + 1] = c * dk1 - s * fk;

            if k + 1 < hi {
                // New fill-in at (k, k+2) drives the next right rotation
                let fk1 = f[k + 1];
                x = f[k];
                z = s * fk1;
                f[k + 1] = c * fk1;
            }

            if let Some(u) = u.as_deref_mut() {
                rotate_rows(u, k, k + 1, c, s);
            }
        }
    }

    log::trace!(target: "reduct::svd", "bidiagonal QR converged in {} sweeps", sweeps);
    fixsvd(d, u, v);
    Convergence::Converged(())
}

/// Make every singular value non-negative, then sort descending.
///
/// A negated value negates the matching row of `u`. Sorting swaps rows of
/// `u` and `v` in lock-step with `d`.
pub fn fixsvd<T: FloatScalar>(
    d: &mut [T],
    mut u: Option<&mut Matrix<T>>,
    mut v: Option<&mut Matrix<T>>,
) {
    for (i, di) in d.iter_mut().enumerate() {
        if *di < T::zero() {
            *di = -*di;
            if let Some(u) = u.as_deref_mut() {
                u.negate_row(i);
            }
        }
    }

    sort_descending(d, |i, j| {
        if let Some(u) = u.as_deref_mut() {
            u.swap_rows(i, j);
        }
        if let Some(v) = v.as_deref_mut() {
            v.swap_rows(i, j);
        }
    });
}

// ── Entry point ─────────────────────────────────────────────────────

/// Singular value decomposition `Uᵗ·diag(d)·V = A` with the default sweep
/// budget.
///
/// `a` is consumed: its storage is used as the bidiagonal workspace and
/// then handed back to `arena` unless the pool already holds a matrix of
/// the same capacity. `U` (`rows x rows`) and `V` (`cols x cols`)
/// are overwritten when supplied. The returned `d` has
/// `min(rows, cols)` entries, non-negative and descending.
///
/// ```
/// use reduct::{Arena, Matrix};
/// use reduct::linalg::svd;
///
/// let mut arena = Arena::<f64>::new();
/// let a = Matrix::from_rows(2, 2, &[3.0, 0.0, 0.0, -4.0]);
/// let mut u = arena.matrix(2, 2);
/// let d = svd(&mut arena, a, Some(&mut u), None)
///     .unwrap()
///     .into_result()
///     .unwrap();
/// assert!((d[0] - 4.0).abs() < 1e-12);
/// assert!((d[1] - 3.0).abs() < 1e-12);
/// ```
pub fn svd<T: FloatScalar>(
    arena: &mut Arena<T>,
    a: Matrix<T>,
    u: Option<&mut Matrix<T>>,
    v: Option<&mut Matrix<T>>,
) -> Result<Convergence<Vector<T>>, LinalgError> {
    svd_with_options(arena, a, u, v, &QrOptions::default())
}

/// [`svd`] with an explicit sweep budget.
pub fn svd_with_options<T: FloatScalar>(
    arena: &mut Arena<T>,
    mut a: Matrix<T>,
    mut u: Option<&mut Matrix<T>>,
    mut v: Option<&mut Matrix<T>>,
    options: &QrOptions,
) -> Result<Convergence<Vector<T>>, LinalgError> {
    let (m, n) = a.shape();
    if let Some(u) = u.as_deref() {
        check_factor(u, m)?;
    }
    if let Some(v) = v.as_deref() {
        check_factor(v, n)?;
    }

    if let Some(u) = u.as_deref_mut() {
        u.set_identity();
    }
    if let Some(v) = v.as_deref_mut() {
        v.set_identity();
    }

    let scale = range_scale(a.norm_max());
    if let Some(s) = scale {
        a /= s;
    }

    bifactor(arena, &mut a, u.as_deref_mut(), v.as_deref_mut());

    let k = m.min(n);
    let mut d = arena.vector(k);
    let mut f = arena.vector(k.saturating_sub(1));
    for i in 0..k {
        d[i] = a[(i, i)];
    }
    for i in 0..k.saturating_sub(1) {
        f[i] = if m >= n { a[(i, i + 1)] } else { a[(i + 1, i)] };
    }
    arena.recycle_spare_matrix(a);

    // A wide input leaves Lᵗ upper bidiagonal with the factors' roles swapped.
    let outcome = if m >= n {
        golub_kahan(d.as_mut_slice(), f.as_mut_slice(), u, v, options)
    } else {
        golub_kahan(d.as_mut_slice(), f.as_mut_slice(), v, u, options)
    };
    arena.recycle_vector(f);
    if let Some(s) = scale {
        d *= s;
    }

    log::debug!(
        target: "reduct::svd",
        "svd {}x{}: converged={}",
        m,
        n,
        outcome.is_converged()
    );
    Ok(outcome.map(|()| d))
}
