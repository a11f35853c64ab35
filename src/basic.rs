//! The basic sort: a dereversal pre-pass feeding a skewed top-down merge
//! sort over the in-place shift merge.
//!
//! Basic sort runs at about half the speed of the workspace engine, but its
//! strict-comparison merges never move an element past an equal one, and the
//! stable front-end leans on that to build its initial working sets.

use crate::inplace::shift_merge_in_place;
use crate::insert::insertion_sort;
use crate::util::{Less, ptr_sub, reverse};

/// Inputs at or below this go straight to insertion sort. Higher than the
/// merge engine's leaf cutoff because the two-stage binary insertion holds
/// up well into the forties while the basic sort carries more per-merge
/// overhead.
pub(crate) const BASIC_INSERT_MAX: usize = 44;

/// Top-down split ratio in percent. The in-place merges run measurably
/// better with the left run a little smaller than the right; 41:59 is the
/// best compromise found.
const BASIC_SKEW: usize = 41;

// Walk forward to the end of the ascending run starting at pa, returning
// the first element that breaks it (or pe).
unsafe fn process_ascending<T, F: Less<T>>(pa: *mut T, pe: *mut T, less: &mut F) -> *mut T {
    unsafe {
        debug_assert!(pa < pe);

        let mut prev = pa;
        let mut curr = pa.add(1);

        while curr != pe {
            if less(&*curr, &*prev) {
                return curr;
            }
            prev = curr;
            curr = curr.add(1);
        }

        curr
    }
}

// Walk forward to the end of the strictly-descending run starting at pa.
unsafe fn process_descending<T, F: Less<T>>(pa: *mut T, pe: *mut T, less: &mut F) -> *mut T {
    unsafe {
        debug_assert!(pa < pe);

        let mut prev = pa;
        let mut curr = pa.add(1);

        while curr != pe && less(&*curr, &*prev) {
            prev = curr;
            curr = curr.add(1);
        }

        curr
    }
}

/// Reverse every maximal strictly-descending run of `pa..pa + n` in place.
///
/// Return the number of reversal steps performed; zero means the input was
/// already non-decreasing, established in exactly `n - 1` comparisons.
///
/// Insertion sort's worst case is reversed input, and the basic sort leans
/// heavily on insertion sort, so this is the one pre-pass the library makes
/// for reversed data. Descending runs are reversed only when strict, which
/// keeps equal elements from ever crossing.
pub(crate) unsafe fn dereverse<T, F: Less<T>>(pa: *mut T, n: usize, less: &mut F) -> usize {
    unsafe {
        let pe = pa.add(n);
        let mut curr = pa;
        let mut reversals = 0;

        while curr != pe {
            curr = process_ascending(curr, pe, less);
            if curr == pe {
                return reversals;
            }

            // The element before the break belongs to the descending run
            let start = curr;
            curr = process_descending(curr, pe, less);
            reversals += ptr_sub(curr, start);
            reverse(start.sub(1), curr);
        }

        reversals
    }
}

unsafe fn basic_top_down<T, F: Less<T>>(pa: *mut T, n: usize, less: &mut F) {
    unsafe {
        if n <= BASIC_INSERT_MAX {
            return insertion_sort(pa, n, less);
        }

        let na = (n * BASIC_SKEW) / 100;
        let nb = n - na;
        let pb = pa.add(na);
        let pe = pa.add(n);

        basic_top_down(pa, na, less);
        basic_top_down(pb, nb, less);

        debug_assert!(nb > 0);
        shift_merge_in_place(pa, pb, pe, less);
    }
}

/// Sort `pa..pa + n`, returning the dereversal count of the pre-pass. A
/// zero return means the input was already sorted and nothing else ran.
pub(crate) unsafe fn basic_sort<T, F: Less<T>>(pa: *mut T, n: usize, less: &mut F) -> usize {
    unsafe {
        let reversals = dereverse(pa, n, less);

        if reversals == 0 {
            return 0;
        }

        basic_top_down(pa, n, less);
        reversals
    }
}
