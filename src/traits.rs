use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by the factorizations, which need `sqrt`, `abs`, `hypot` and
/// machine epsilon.
pub trait FloatScalar: Scalar + Float {
    /// `2` in the element type.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Rows are stored contiguously, so a row tail can be borrowed as a slice.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Row `row` from column `col_start` to the end of the logical row.
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling the in-place
/// reflections and rotations to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable row `row` from column `col_start` to the end of the logical row.
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T];
}
