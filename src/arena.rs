//! Shape-keyed object pool for matrix and vector handles.
//!
//! [`Arena`] keeps two free lists, one for matrices and one for vectors.
//! Checkout searches for a pooled handle whose capacity exactly equals the
//! requested shape; a hit is returned as-is (contents are whatever the
//! previous owner left), a miss allocates a fresh zeroed handle. Handing a
//! handle back pushes it onto its list; memory is released only when the
//! arena is dropped or [`Arena::purge`]d.
//!
//! There is no process-wide pool. Callers that work on several threads give
//! each thread its own arena.

use alloc::vec::Vec;

use crate::matrix::{Matrix, Vector};
use crate::traits::Scalar;

/// Allocation counters, for checking reuse without looking at the math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Bytes of buffer allocated by this arena since creation.
    pub allocated_bytes: usize,
    /// Checkouts that had to allocate.
    pub fresh_allocations: usize,
    /// Checkouts served from a free list.
    pub reuses: usize,
}

/// Pool of recycled [`Matrix`] and [`Vector`] handles.
///
/// ```
/// use reduct::Arena;
///
/// let mut arena = Arena::<f64>::new();
/// let m = arena.matrix(3, 2);
/// arena.recycle_matrix(m);
/// let before = arena.stats().allocated_bytes;
///
/// let m = arena.matrix(3, 2);
/// assert_eq!(m.capacity(), (3, 2));
/// assert_eq!(arena.stats().allocated_bytes, before);
/// assert_eq!(arena.stats().reuses, 1);
/// ```
#[derive(Debug)]
pub struct Arena<T> {
    free_matrices: Vec<Matrix<T>>,
    free_vectors: Vec<Vector<T>>,
    stats: ArenaStats,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            free_matrices: Vec::new(),
            free_vectors: Vec::new(),
            stats: ArenaStats::default(),
        }
    }
}

impl<T: Scalar> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out an `nrows x ncols` matrix.
    ///
    /// Reused handles are not cleared; use [`Arena::zeroed_matrix`] when the
    /// contents matter.
    pub fn matrix(&mut self, nrows: usize, ncols: usize) -> Matrix<T> {
        if let Some(pos) = self
            .free_matrices
            .iter()
            .position(|m| m.capacity() == (nrows, ncols))
        {
            let mut m = self.free_matrices.swap_remove(pos);
            m.reset_shape();
            self.stats.reuses += 1;
            log::trace!(target: "reduct::arena", "reuse matrix {}x{}", nrows, ncols);
            return m;
        }
        let m = Matrix::zeros(nrows, ncols);
        self.stats.fresh_allocations += 1;
        self.stats.allocated_bytes += m.allocated_bytes();
        log::trace!(target: "reduct::arena", "allocate matrix {}x{}", nrows, ncols);
        m
    }

    /// Check out a matrix and zero it.
    pub fn zeroed_matrix(&mut self, nrows: usize, ncols: usize) -> Matrix<T> {
        let mut m = self.matrix(nrows, ncols);
        m.clear();
        m
    }

    /// Check out an `n x n` identity.
    pub fn identity(&mut self, n: usize) -> Matrix<T> {
        let mut m = self.matrix(n, n);
        m.set_identity();
        m
    }

    /// Check out a matrix holding a copy of `src`.
    pub fn copy_of_matrix(&mut self, src: &Matrix<T>) -> Matrix<T> {
        let mut m = self.matrix(src.nrows(), src.ncols());
        m.copy_from(src);
        m
    }

    /// Return a matrix to the pool.
    pub fn recycle_matrix(&mut self, m: Matrix<T>) {
        self.free_matrices.push(m);
    }

    /// Return `m` to the pool only if no pooled matrix shares its
    /// capacity; otherwise drop it.
    ///
    /// Suited to handles that were not checked out of this arena, which
    /// would otherwise pile up one per call.
    pub fn recycle_spare_matrix(&mut self, m: Matrix<T>) {
        let cap = m.capacity();
        if self.free_matrices.iter().any(|p| p.capacity() == cap) {
            log::trace!(target: "reduct::arena", "drop spare matrix {}x{}", cap.0, cap.1);
            return;
        }
        self.free_matrices.push(m);
    }

    /// Check out a vector of length `dim`.
    ///
    /// Reused handles are not cleared.
    pub fn vector(&mut self, dim: usize) -> Vector<T> {
        if let Some(pos) = self.free_vectors.iter().position(|v| v.capacity() == dim) {
            let mut v = self.free_vectors.swap_remove(pos);
            v.reset_len();
            self.stats.reuses += 1;
            log::trace!(target: "reduct::arena", "reuse vector {}", dim);
            return v;
        }
        let v = Vector::zeros(dim);
        self.stats.fresh_allocations += 1;
        self.stats.allocated_bytes += v.allocated_bytes();
        log::trace!(target: "reduct::arena", "allocate vector {}", dim);
        v
    }

    /// Check out a vector and zero it.
    pub fn zeroed_vector(&mut self, dim: usize) -> Vector<T> {
        let mut v = self.vector(dim);
        v.clear();
        v
    }

    /// Check out a vector holding a copy of `src`.
    pub fn copy_of_vector(&mut self, src: &Vector<T>) -> Vector<T> {
        let mut v = self.vector(src.len());
        v.copy_from(src);
        v
    }

    /// Return a vector to the pool.
    pub fn recycle_vector(&mut self, v: Vector<T>) {
        self.free_vectors.push(v);
    }
}

impl<T> Arena<T> {
    /// Allocation counters.
    pub fn stats(&self) -> ArenaStats {
        self.stats
    }

    /// Number of matrices waiting in the pool.
    pub fn pooled_matrices(&self) -> usize {
        self.free_matrices.len()
    }

    /// Number of vectors waiting in the pool.
    pub fn pooled_vectors(&self) -> usize {
        self.free_vectors.len()
    }

    /// Drop every pooled handle, releasing its memory.
    pub fn purge(&mut self) {
        log::debug!(
            target: "reduct::arena",
            "purging {} matrices and {} vectors",
            self.free_matrices.len(),
            self.free_vectors.len()
        );
        self.free_matrices.clear();
        self.free_vectors.clear();
    }
}
