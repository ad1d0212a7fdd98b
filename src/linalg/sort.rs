//! Descending partition sort that reports every swap, so the caller can
//! permute the rows or columns of a factor in lock-step with the values.

use alloc::vec::Vec;

/// Sort `values` into descending order.
///
/// `on_swap(i, j)` is called after `values[i]` and `values[j]` trade places.
/// Partitioning is driven by an explicit stack of pending ranges; the
/// smaller side of each split is handled first, so the stack stays
/// logarithmic in `values.len()`.
pub(crate) fn sort_descending<T: PartialOrd + Copy>(
    values: &mut [T],
    mut on_swap: impl FnMut(usize, usize),
) {
    let mut swap = |values: &mut [T], i: usize, j: usize| {
        if i != j {
            values.swap(i, j);
            on_swap(i, j);
        }
    };

    // Half-open ranges `lo..hi`
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut lo = 0;
    let mut hi = values.len();

    loop {
        if hi - lo < 2 {
            match stack.pop() {
                Some((l, h)) => {
                    lo = l;
                    hi = h;
                    continue;
                }
                None => break,
            }
        }

        let last = hi - 1;
        let pivot = values[last];
        let mut i = lo;
        let mut j = last;
        loop {
            while i < last && values[i] > pivot {
                i += 1;
            }
            while j > i && values[j - 1] <= pivot {
                j -= 1;
            }
            if j <= i {
                break;
            }
            swap(values, i, j - 1);
            i += 1;
            j -= 1;
        }
        // values[lo..i] > pivot, values[i..last] <= pivot
        let split = i;
        swap(values, split, last);

        let left = (lo, split);
        let right = (split + 1, hi);
        let (small, large) = if left.1 - left.0 < right.1 - right.0 {
            (left, right)
        } else {
            (right, left)
        };
        stack.push(large);
        lo = small.0;
        hi = small.1;
    }
}
