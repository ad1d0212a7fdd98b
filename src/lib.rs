//! # reduct
//!
//! Dense factorization kernel for astronomical data reduction. Provides the
//! singular value decomposition and the symmetric eigendecomposition used by
//! curve fitting and calibration-error estimation, plus the back-substitution,
//! pseudo-inverse and covariance operations built on them.
//!
//! ## Quick start
//!
//! ```
//! use reduct::{Arena, Matrix, Vector};
//! use reduct::linalg::{svd, svd_back_substitute};
//!
//! let mut arena = Arena::<f64>::new();
//! let a = Matrix::from_rows(2, 2, &[2.0, 0.0, 0.0, 4.0]);
//! let mut u = arena.matrix(2, 2);
//! let mut v = arena.matrix(2, 2);
//!
//! // `svd` consumes `a`; its storage goes back to the arena.
//! let d = svd(&mut arena, a, Some(&mut u), Some(&mut v))
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//! assert!((d[0] - 4.0).abs() < 1e-12);
//!
//! let b = Vector::from_slice(&[4.0, 8.0]);
//! let x = svd_back_substitute(&mut arena, &u, &v, &d, &b).unwrap();
//! assert!((x[0] - 2.0).abs() < 1e-12);
//! assert!((x[1] - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: Capacity-backed handles: [`Matrix<T>`] (row-major buffer
//!   sized `max_rows × max_cols` with a smaller logical shape) and
//!   [`Vector<T>`]. Shrinking never reallocates; growing zero-fills.
//!
//! - [`arena`]: [`Arena<T>`], a pool that recycles handles by exact
//!   capacity. Every algorithm takes its scratch storage from the caller's
//!   arena and returns it before finishing.
//!
//! - [`linalg`]: Householder reflections and Givens rotations, the
//!   bidiagonal SVD ([`linalg::svd`]), Hessenberg reduction and the symmetric
//!   tridiagonal eigensolver ([`linalg::eigen`]), and the solve / invert /
//!   covariance routines that read the factors.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats, used by every factorization
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Conventions
//!
//! The SVD follows the transposed convention `Uᵗ · diag(d) · V = A`, with `d`
//! non-negative and descending. The eigendecomposition returns `λ` descending
//! with `Qᵗ · A · Q = diag(λ)`; eigenvectors are the columns of `Q`.
//!
//! `svd` takes its input by value and destroys it; `eigen` borrows its input
//! and leaves it untouched.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm |
//! | `libm`  | no      | Pure-Rust software float fallback for `no_std` targets |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod arena;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use arena::{Arena, ArenaStats};
pub use linalg::{Convergence, LinalgError, QrOptions};
pub use matrix::{Matrix, Vector};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
