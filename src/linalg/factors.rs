use crate::arena::Arena;
use crate::linalg::solve::{
    eigen_back_substitute, eigen_covariance, eigen_invert, svd_back_substitute, svd_covariance,
    svd_invert,
};
use crate::linalg::{eigen_with_options, svd_with_options, LinalgError, QrOptions};
use crate::traits::FloatScalar;
use crate::{Matrix, Vector};

// ── SvdFactors wrapper ──────────────────────────────────────────────

/// Owned singular value decomposition `Uᵗ·diag(d)·V = A`.
///
/// Bundles the handles returned by [`svd`](crate::linalg::svd) with the
/// operations that read them. All storage comes from, and goes back to,
/// the caller's arena via [`SvdFactors::release`].
///
/// # Example
///
/// ```
/// use reduct::{Arena, Matrix, Vector};
/// use reduct::linalg::SvdFactors;
///
/// let mut arena = Arena::<f64>::new();
/// let a = Matrix::from_rows(3, 2, &[1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
/// let svd = SvdFactors::compute(&mut arena, a).unwrap();
/// assert!((svd.singular_values()[0] - 2.0).abs() < 1e-10);
/// assert_eq!(svd.rank(1e-10), 2);
///
/// let x = svd.back_substitute(&mut arena, &Vector::from_slice(&[1.0, 4.0, 0.0])).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-10);
/// assert!((x[1] - 2.0).abs() < 1e-10);
/// svd.release(&mut arena);
/// ```
#[derive(Debug, Clone)]
pub struct SvdFactors<T> {
    u: Matrix<T>,
    v: Matrix<T>,
    singular_values: Vector<T>,
}

impl<T: FloatScalar> SvdFactors<T> {
    /// Factor `a`, consuming it.
    ///
    /// Returns `Err(ConvergenceFailure)` if the bidiagonal QR does not
    /// converge within the default sweep budget.
    pub fn compute(arena: &mut Arena<T>, a: Matrix<T>) -> Result<Self, LinalgError> {
        Self::compute_with_options(arena, a, &QrOptions::default())
    }

    /// [`SvdFactors::compute`] with an explicit sweep budget.
    pub fn compute_with_options(
        arena: &mut Arena<T>,
        a: Matrix<T>,
        options: &QrOptions,
    ) -> Result<Self, LinalgError> {
        let (m, n) = a.shape();
        let mut u = arena.matrix(m, m);
        let mut v = arena.matrix(n, n);
        let outcome = svd_with_options(arena, a, Some(&mut u), Some(&mut v), options)
            .and_then(|c| c.into_result());
        match outcome {
            Ok(singular_values) => Ok(Self {
                u,
                v,
                singular_values,
            }),
            Err(e) => {
                arena.recycle_matrix(u);
                arena.recycle_matrix(v);
                Err(e)
            }
        }
    }

    /// The singular values, sorted descending.
    #[inline]
    pub fn singular_values(&self) -> &Vector<T> {
        &self.singular_values
    }

    /// Left factor (`rows x rows`); its rows are the left singular vectors.
    #[inline]
    pub fn u(&self) -> &Matrix<T> {
        &self.u
    }

    /// Right factor (`cols x cols`); its rows are the right singular vectors.
    #[inline]
    pub fn v(&self) -> &Matrix<T> {
        &self.v
    }

    /// Least-squares solution of `A·x = b`.
    pub fn back_substitute(&self, arena: &mut Arena<T>, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        svd_back_substitute(arena, &self.u, &self.v, &self.singular_values, b)
    }

    /// Parameter covariance `(AᵗA)⁻¹`, skipping zero singular values.
    pub fn covariance(&self, arena: &mut Arena<T>) -> Result<Matrix<T>, LinalgError> {
        let n = self.v.nrows();
        let mut vt = arena.matrix(n, n);
        for i in 0..n {
            for j in 0..n {
                vt[(i, j)] = self.v[(j, i)];
            }
        }
        let mut covar = arena.matrix(n, n);
        let result = svd_covariance(&mut covar, &vt, &self.singular_values);
        arena.recycle_matrix(vt);
        match result {
            Ok(()) => Ok(covar),
            Err(e) => {
                arena.recycle_matrix(covar);
                Err(e)
            }
        }
    }

    /// Inverse of a square `A`, treating singular values at or below
    /// `rel_floor · σ_max` as zero.
    pub fn invert(&self, arena: &mut Arena<T>, rel_floor: T) -> Result<Matrix<T>, LinalgError> {
        let cutoff = rel_floor * self.largest();
        let mut iw = arena.copy_of_vector(&self.singular_values);
        for w in iw.as_mut_slice() {
            *w = if *w > cutoff { T::one() / *w } else { T::zero() };
        }
        let result = svd_invert(arena, None, &self.u, &self.v, &iw);
        arena.recycle_vector(iw);
        result
    }

    /// Numerical rank: number of singular values above `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.singular_values.as_slice().iter().filter(|&&s| s > tol).count()
    }

    /// Condition number: σ_max / σ_min.
    ///
    /// Returns infinity if the smallest singular value is zero.
    pub fn condition_number(&self) -> T {
        let s = self.singular_values.as_slice();
        match (s.first(), s.last()) {
            (Some(&s_max), Some(&s_min)) => {
                if s_min == T::zero() {
                    T::infinity()
                } else {
                    s_max / s_min
                }
            }
            _ => T::one(),
        }
    }

    /// Hand every handle back to `arena`.
    pub fn release(self, arena: &mut Arena<T>) {
        arena.recycle_matrix(self.u);
        arena.recycle_matrix(self.v);
        arena.recycle_vector(self.singular_values);
    }

    fn largest(&self) -> T {
        self.singular_values
            .as_slice()
            .first()
            .copied()
            .unwrap_or_else(T::zero)
    }
}

// ── EigenFactors wrapper ────────────────────────────────────────────

/// Owned symmetric eigendecomposition `Qᵗ·A·Q = diag(λ)`.
///
/// Eigenvalues are sorted descending and keep their sign; column `k` of
/// `Q` is the eigenvector for `λ[k]`.
///
/// ```
/// use reduct::{Arena, Matrix};
/// use reduct::linalg::EigenFactors;
///
/// let mut arena = Arena::<f64>::new();
/// let a = Matrix::from_rows(2, 2, &[1.0, 3.0, 3.0, 1.0]);
/// let eig = EigenFactors::compute(&mut arena, &a).unwrap();
/// assert!((eig.eigenvalues()[0] - 4.0).abs() < 1e-10);
/// assert!((eig.eigenvalues()[1] + 2.0).abs() < 1e-10);
/// assert!((eig.condition_number() - 2.0).abs() < 1e-10);
/// eig.release(&mut arena);
/// ```
#[derive(Debug, Clone)]
pub struct EigenFactors<T> {
    q: Matrix<T>,
    eigenvalues: Vector<T>,
}

impl<T: FloatScalar> EigenFactors<T> {
    /// Factor a symmetric `a`, leaving it untouched.
    pub fn compute(arena: &mut Arena<T>, a: &Matrix<T>) -> Result<Self, LinalgError> {
        Self::compute_with_options(arena, a, &QrOptions::default())
    }

    /// [`EigenFactors::compute`] with an explicit sweep budget.
    pub fn compute_with_options(
        arena: &mut Arena<T>,
        a: &Matrix<T>,
        options: &QrOptions,
    ) -> Result<Self, LinalgError> {
        if !a.is_square() {
            return Err(LinalgError::NotSquare {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        let mut q = arena.matrix(a.nrows(), a.nrows());
        match eigen_with_options(arena, a, Some(&mut q), options).and_then(|c| c.into_result()) {
            Ok(eigenvalues) => Ok(Self { q, eigenvalues }),
            Err(e) => {
                arena.recycle_matrix(q);
                Err(e)
            }
        }
    }

    /// The eigenvalues, sorted descending.
    #[inline]
    pub fn eigenvalues(&self) -> &Vector<T> {
        &self.eigenvalues
    }

    /// The eigenvector matrix.
    #[inline]
    pub fn eigenvectors(&self) -> &Matrix<T> {
        &self.q
    }

    /// Solve `A·x = b`, skipping zero eigenvalues.
    pub fn back_substitute(&self, arena: &mut Arena<T>, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        eigen_back_substitute(arena, &self.q, &self.eigenvalues, b)
    }

    /// `A⁻²`, which is `(AᵗA)⁻¹` for symmetric `A`.
    pub fn covariance(&self, arena: &mut Arena<T>) -> Result<Matrix<T>, LinalgError> {
        let n = self.q.nrows();
        let mut covar = arena.matrix(n, n);
        match eigen_covariance(&mut covar, &self.q, &self.eigenvalues) {
            Ok(()) => Ok(covar),
            Err(e) => {
                arena.recycle_matrix(covar);
                Err(e)
            }
        }
    }

    /// Inverse of `A`, treating eigenvalues with `|λ| <= rel_floor · max|λ|`
    /// as zero.
    pub fn invert(&self, arena: &mut Arena<T>, rel_floor: T) -> Result<Matrix<T>, LinalgError> {
        let cutoff = rel_floor * self.largest_magnitude();
        let mut il = arena.copy_of_vector(&self.eigenvalues);
        for l in il.as_mut_slice() {
            *l = if l.abs() > cutoff { T::one() / *l } else { T::zero() };
        }
        let result = eigen_invert(arena, None, &self.q, &il);
        arena.recycle_vector(il);
        result
    }

    /// Number of eigenvalues with magnitude above `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.eigenvalues.as_slice().iter().filter(|l| l.abs() > tol).count()
    }

    /// max|λ| / min|λ|; infinity if some eigenvalue is zero.
    pub fn condition_number(&self) -> T {
        let values = self.eigenvalues.as_slice();
        if values.is_empty() {
            return T::one();
        }
        let smallest = values.iter().fold(T::infinity(), |m, l| m.min(l.abs()));
        if smallest == T::zero() {
            T::infinity()
        } else {
            self.largest_magnitude() / smallest
        }
    }

    /// Hand every handle back to `arena`.
    pub fn release(self, arena: &mut Arena<T>) {
        arena.recycle_matrix(self.q);
        arena.recycle_vector(self.eigenvalues);
    }

    fn largest_magnitude(&self) -> T {
        self.eigenvalues
            .as_slice()
            .iter()
            .fold(T::zero(), |m, l| m.max(l.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!(
            (a - b).abs() < tol,
            "{}: {} vs {} (diff {})",
            msg,
            a,
            b,
            (a - b).abs()
        );
    }

    #[test]
    fn svd_rank_and_condition() {
        let mut arena = Arena::new();
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 5.0, 7.0, 9.0]);
        let svd = SvdFactors::compute(&mut arena, a).unwrap();
        assert_eq!(svd.rank(1e-8), 2);
        assert!(svd.condition_number() > 1e12);

        let b = SvdFactors::compute(&mut arena, Matrix::from_rows(2, 2, &[2.0, 0.0, 0.0, 4.0])).unwrap();
        assert_near(b.condition_number(), 2.0, TOL, "cond");
    }

    #[test]
    fn svd_invert_with_floor() {
        let mut arena = Arena::new();
        let a = Matrix::from_rows(2, 2, &[1.0, 0.0, 0.0, 1e-14]);
        let svd = SvdFactors::compute(&mut arena, a).unwrap();
        let inv = svd.invert(&mut arena, 1e-10).unwrap();
        assert_near(inv[(0, 0)], 1.0, TOL, "kept");
        assert_near(inv[(1, 1)], 0.0, TOL, "floored");
    }

    #[test]
    fn svd_covariance_matches_normal_equations() {
        let mut arena = Arena::new();
        let a = Matrix::from_rows(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let svd = SvdFactors::compute(&mut arena, a).unwrap();
        let covar = svd.covariance(&mut arena).unwrap();
        // (AᵗA)⁻¹ = [14 -6; -6 4] / 20
        assert_near(covar[(0, 0)], 0.7, TOL, "c00");
        assert_near(covar[(0, 1)], -0.3, TOL, "c01");
        assert_near(covar[(1, 0)], -0.3, TOL, "c10");
        assert_near(covar[(1, 1)], 0.2, TOL, "c11");
    }

    #[test]
    fn release_returns_handles() {
        let mut arena = Arena::<f64>::new();
        let svd = SvdFactors::compute(&mut arena, Matrix::identity(3)).unwrap();
        svd.release(&mut arena);
        let before = arena.stats().fresh_allocations;
        let svd = SvdFactors::compute(&mut arena, Matrix::identity(3)).unwrap();
        assert_eq!(arena.stats().fresh_allocations, before);
        svd.release(&mut arena);
    }

    #[test]
    fn svd_convergence_failure_is_an_error() {
        let mut arena = Arena::new();
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let options = QrOptions::default().with_max_sweeps(0);
        let err = SvdFactors::compute_with_options(&mut arena, a, &options).unwrap_err();
        assert_eq!(err, LinalgError::ConvergenceFailure { iterations: 0 });
    }

    #[test]
    fn eigen_solve_and_invert() {
        let mut arena = Arena::new();
        let a = Matrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let eig = EigenFactors::compute(&mut arena, &a).unwrap();
        let x = eig.back_substitute(&mut arena, &Vector::from_slice(&[3.0, 3.0])).unwrap();
        assert_near(x[0], 1.0, TOL, "x[0]");
        assert_near(x[1], 1.0, TOL, "x[1]");

        let inv = eig.invert(&mut arena, 0.0).unwrap();
        // [2 1; 1 2]⁻¹ = [2 -1; -1 2] / 3
        assert_near(inv[(0, 0)], 2.0 / 3.0, TOL, "inv00");
        assert_near(inv[(0, 1)], -1.0 / 3.0, TOL, "inv01");
        assert_eq!(eig.rank(1e-12), 2);
    }

    #[test]
    fn eigen_covariance_of_diagonal() {
        let mut arena = Arena::new();
        let a = Matrix::from_rows(2, 2, &[2.0, 0.0, 0.0, -4.0]);
        let eig = EigenFactors::compute(&mut arena, &a).unwrap();
        let covar = eig.covariance(&mut arena).unwrap();
        assert_near(covar[(0, 0)], 0.25, TOL, "c00");
        assert_near(covar[(1, 1)], 1.0 / 16.0, TOL, "c11");
        assert_near(eig.condition_number(), 2.0, TOL, "cond");
    }

    #[test]
    fn eigen_rejects_rectangular() {
        let mut arena = Arena::<f64>::new();
        let err = EigenFactors::compute(&mut arena, &Matrix::zeros(2, 3)).unwrap_err();
        assert_eq!(err, LinalgError::NotSquare { rows: 2, cols: 3 });
    }
}
