pub(crate) mod factors;
pub(crate) mod givens;
pub(crate) mod hessenberg;
pub(crate) mod householder;
pub(crate) mod solve;
mod sort;
pub(crate) mod svd;
pub(crate) mod symmetric_eigen;

pub use factors::{EigenFactors, SvdFactors};
pub use givens::{givens, rotate_cols, rotate_rows};
pub use hessenberg::{hfactor, make_hq};
pub use householder::{householder_vector, reflect_cols, reflect_rows, reflect_vector, Householder};
pub use solve::{
    eigen_back_substitute, eigen_covariance, eigen_invert, svd_back_substitute, svd_covariance,
    svd_invert,
};
pub use svd::{bifactor, bisvd, fixsvd, svd, svd_with_options};
pub use symmetric_eigen::{eigen, eigen_with_options, fixeigen, trieig};

use crate::traits::FloatScalar;
use crate::Matrix;

/// Errors from the factorizations and the routines that consume them.
///
/// Shape problems are reported before any work is done; nothing is
/// partially written when one of these comes back.
///
/// ```
/// use reduct::{Arena, Matrix};
/// use reduct::linalg::{eigen, LinalgError};
///
/// let mut arena = Arena::<f64>::new();
/// let rect = Matrix::<f64>::zeros(2, 3);
/// assert_eq!(
///     eigen(&mut arena, &rect, None).unwrap_err(),
///     LinalgError::NotSquare { rows: 2, cols: 3 }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// A square matrix was required.
    NotSquare { rows: usize, cols: usize },
    /// An operand's shape does not fit the others. Vectors are reported as
    /// `(len, 1)`.
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Row, column or element index past the end.
    IndexOutOfBounds { index: usize, len: usize },
    /// Iterative algorithm did not converge within the sweep budget.
    ConvergenceFailure { iterations: usize },
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::NotSquare { rows, cols } => {
                write!(f, "matrix is not square: {}x{}", rows, cols)
            }
            LinalgError::ShapeMismatch { expected, got } => write!(
                f,
                "shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            LinalgError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
            LinalgError::ConvergenceFailure { iterations } => {
                write!(f, "QR iteration did not converge after {} sweeps", iterations)
            }
        }
    }
}

impl core::error::Error for LinalgError {}

/// Outcome of an iterative factorization.
///
/// When the sweep budget runs out the values are still post-processed
/// (sorted, signs fixed) and handed back as `partial`, so the caller can
/// decide whether they are good enough.
#[derive(Debug, Clone, PartialEq)]
pub enum Convergence<V> {
    /// Every block deflated.
    Converged(V),
    /// The sweep budget was exhausted.
    DidNotConverge { partial: V, iterations: usize },
}

impl<V> Convergence<V> {
    /// Whether iteration finished normally.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged(_))
    }

    /// The values, converged or not.
    pub fn value(&self) -> &V {
        match self {
            Convergence::Converged(v) => v,
            Convergence::DidNotConverge { partial, .. } => partial,
        }
    }

    /// Take the values, converged or not.
    pub fn into_value(self) -> V {
        match self {
            Convergence::Converged(v) => v,
            Convergence::DidNotConverge { partial, .. } => partial,
        }
    }

    /// `Ok` when converged, `Err(ConvergenceFailure)` otherwise.
    pub fn into_result(self) -> Result<V, LinalgError> {
        match self {
            Convergence::Converged(v) => Ok(v),
            Convergence::DidNotConverge { iterations, .. } => {
                Err(LinalgError::ConvergenceFailure { iterations })
            }
        }
    }

    pub fn map<W>(self, f: impl FnOnce(V) -> W) -> Convergence<W> {
        match self {
            Convergence::Converged(v) => Convergence::Converged(f(v)),
            Convergence::DidNotConverge { partial, iterations } => Convergence::DidNotConverge {
                partial: f(partial),
                iterations,
            },
        }
    }
}

/// Tuning for the implicit-shift QR loops in [`bisvd`] and [`trieig`].
///
/// ```
/// use reduct::QrOptions;
///
/// assert_eq!(QrOptions::default().sweep_limit(4), 120);
/// assert_eq!(QrOptions::default().with_max_sweeps(5).sweep_limit(4), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QrOptions {
    /// Total QR sweeps allowed for one factorization. `None` means
    /// `30 * n` (at least 30) for an `n`-value problem.
    pub max_sweeps: Option<usize>,
}

impl QrOptions {
    const SWEEPS_PER_VALUE: usize = 30;

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    /// Sweep budget for a problem with `n` values.
    pub fn sweep_limit(&self, n: usize) -> usize {
        self.max_sweeps
            .unwrap_or_else(|| Self::SWEEPS_PER_VALUE * n.max(1))
    }
}

/// `factor` must be square with `n` rows.
pub(crate) fn check_factor<T>(factor: &Matrix<T>, n: usize) -> Result<(), LinalgError> {
    if !factor.is_square() {
        return Err(LinalgError::NotSquare {
            rows: factor.nrows(),
            cols: factor.ncols(),
        });
    }
    if factor.nrows() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, n),
            got: factor.shape(),
        });
    }
    Ok(())
}

/// Divisor that brings values of largest magnitude `max_abs` to unit
/// scale, or `None` when squares of such values can neither overflow nor
/// underflow.
///
/// The safe band is `[√min_positive / ε, ε / √min_positive]`, roughly
/// `1e±138` for `f64`.
pub(crate) fn range_scale<T: FloatScalar>(max_abs: T) -> Option<T> {
    let small = T::min_positive_value().sqrt() / T::epsilon();
    let big = T::one() / small;
    if max_abs.is_finite() && max_abs > T::zero() && (max_abs < small || max_abs > big) {
        Some(max_abs)
    } else {
        None
    }
}

/// The off-diagonal of an `n`-entry bidiagonal or tridiagonal pair holds
/// `n - 1` values.
pub(crate) fn check_offdiag_len(n: usize, got: usize) -> Result<(), LinalgError> {
    let expected = n.saturating_sub(1);
    if got != expected {
        return Err(LinalgError::ShapeMismatch {
            expected: (expected, 1),
            got: (got, 1),
        });
    }
    Ok(())
}
