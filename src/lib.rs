//! # Trisort
//!
//! `trisort` is an adaptive, in-place, comparison-based sorting library. It
//! is a merge sort at heart, built on a block rotation primitive (the
//! "triple shift" rotation) and a family of in-place merges that cooperate
//! through controlled fallbacks, so every entry point runs in O(n log n)
//! time with O(log n) auxiliary space and no hidden allocations.
//!
//! ## Key Features
//!
//! - **In-place**: all three entry points sort within the input slice. The
//!   auxiliary state is a handful of fixed-size work stacks on the call
//!   frame, each under 4 KiB.
//! - **Adaptive**: a dereversal pre-pass turns descending inputs into
//!   ascending runs, sorted inputs are detected in `n - 1` comparisons, and
//!   the merges gallop over presorted stretches TimSort-style.
//! - **Stable variant**: [`stable_sort`] keeps equal elements in their
//!   original order by extracting unique values to serve as scratch space,
//!   at a modest constant-factor cost over [`basic_sort`].
//! - **Caller-controlled scratch**: [`inplace_sort`] accepts an optional
//!   [`Workspace`] and degrades gracefully all the way down to a one-element
//!   buffer, carving scratch out of the input when given none.
//!
//! ## Usage
//!
//! ```rust
//! let mut data = vec![5, 3, 8, 1, 9, 2];
//! trisort::basic_sort(&mut data);
//!
//! assert_eq!(data, vec![1, 2, 3, 5, 8, 9]);
//! ```
//!
//! Stable sorting with a custom comparator:
//!
//! ```rust
//! let mut pairs = vec![("b", 2), ("a", 1), ("b", 1), ("a", 0)];
//! trisort::stable_sort_by(&mut pairs, |x, y| x.0.cmp(y.0));
//!
//! // Equal keys keep their original relative order
//! assert_eq!(pairs, vec![("a", 1), ("a", 0), ("b", 2), ("b", 1)]);
//! ```
//!
//! ## Comparator contract
//!
//! Comparators must be pure and induce a strict weak order, and must not
//! re-enter the library on the same slice. A comparator that lies produces
//! some unspecified permutation of the input; it can never corrupt memory,
//! drop an element twice, or lose one.

use core::cmp::Ordering;
use core::mem::MaybeUninit;
use core::ptr;

mod basic;
mod inplace;
mod insert;
mod rotate;
mod search;
mod stable;
mod uniques;
mod util;
mod workspace;

use util::Less;

/// Scratch space policy for [`inplace_sort`].
pub enum Workspace<'a, T> {
    /// No scratch space: the sort carves a workspace out of the input.
    None,
    /// Allocate an internal buffer of `n / 8` elements for the duration of
    /// the call. If the allocation fails, or the element type carries drop
    /// glue, the sort proceeds as with [`Workspace::None`].
    Internal,
    /// Caller-supplied scratch elements. Any positive length helps; sizes
    /// from an eighth of the input up stop paying for themselves. The
    /// buffer's contents are preserved as a multiset, but their order is
    /// unspecified after the call.
    Buffer(&'a mut [T]),
}

/// Sort `v`. The fastest entry point; not guaranteed stable.
///
/// # Examples
///
/// ```rust
/// let mut data = vec![3, 1, 2];
/// trisort::basic_sort(&mut data);
/// assert_eq!(data, vec![1, 2, 3]);
/// ```
#[inline]
pub fn basic_sort<T: Ord>(v: &mut [T]) {
    basic_common(v, &mut T::lt);
}

/// Sort `v` with a comparator. Not guaranteed stable.
#[inline]
pub fn basic_sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], mut compare: F) {
    basic_common(v, &mut |x, y| compare(x, y) == Ordering::Less);
}

/// Sort `v`, preserving the relative order of equal elements.
///
/// # Examples
///
/// ```rust
/// let mut data = vec![2, 1, 2, 1];
/// trisort::stable_sort(&mut data);
/// assert_eq!(data, vec![1, 1, 2, 2]);
/// ```
#[inline]
pub fn stable_sort<T: Ord>(v: &mut [T]) {
    stable_common(v, &mut T::lt);
}

/// Sort `v` with a comparator, preserving the relative order of elements
/// the comparator reports as equal.
#[inline]
pub fn stable_sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], mut compare: F) {
    stable_common(v, &mut |x, y| compare(x, y) == Ordering::Less);
}

/// Sort `v` through the adaptive workspace engine. Not guaranteed stable.
///
/// The engine merges through whatever scratch space `workspace` yields and
/// falls back to pure in-place merging beyond it; see [`Workspace`].
///
/// # Examples
///
/// ```rust
/// use trisort::Workspace;
///
/// let mut data = vec![4, 2, 7, 1, 8, 8, 0, 3, 6, 5, 11, 9, 10];
/// let mut scratch = vec![0; 4];
/// trisort::inplace_sort(&mut data, Workspace::Buffer(&mut scratch));
///
/// assert_eq!(data, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 8, 9, 10, 11]);
/// ```
#[inline]
pub fn inplace_sort<T: Ord>(v: &mut [T], workspace: Workspace<'_, T>) {
    inplace_common(v, workspace, &mut T::lt);
}

/// Sort `v` through the adaptive workspace engine with a comparator. Not
/// guaranteed stable.
#[inline]
pub fn inplace_sort_by<T, F: FnMut(&T, &T) -> Ordering>(
    v: &mut [T],
    workspace: Workspace<'_, T>,
    mut compare: F,
) {
    inplace_common(v, workspace, &mut |x, y| compare(x, y) == Ordering::Less);
}

#[inline(always)]
fn basic_common<T, F: Less<T>>(v: &mut [T], less: &mut F) {
    // Sorting has no meaningful behavior on zero-sized types
    if size_of::<T>() == 0 {
        return;
    }

    unsafe {
        basic::basic_sort(v.as_mut_ptr(), v.len(), less);
    }
}

#[inline(always)]
fn stable_common<T, F: Less<T>>(v: &mut [T], less: &mut F) {
    if size_of::<T>() == 0 {
        return;
    }

    unsafe {
        stable::stable_sort(v.as_mut_ptr(), v.len(), less);
    }
}

fn inplace_common<T, F: Less<T>>(v: &mut [T], workspace: Workspace<'_, T>, less: &mut F) {
    if size_of::<T>() == 0 {
        return;
    }

    let n = v.len();
    let s = v.as_mut_ptr();

    unsafe {
        match workspace {
            Workspace::None => workspace::merge_sort_in_place(s, n, less),
            Workspace::Buffer(buf) => {
                if buf.is_empty() {
                    workspace::merge_sort_in_place(s, n, less);
                } else if n <= workspace::INSERT_SORT_MAX {
                    insert::small_sort(s, n, less);
                } else {
                    workspace::sort_using_workspace(s, n, buf.as_mut_ptr(), buf.len(), less);
                }
            }
            Workspace::Internal => {
                if n <= workspace::INSERT_SORT_MAX {
                    return insert::small_sort(s, n, less);
                }

                // The scratch is seeded with shallow copies of an input
                // prefix so every slot the engine can observe holds a valid
                // element. The engine only ever swaps, so the array ends
                // the sort with its original multiset and the seeds end
                // back in the scratch. For types with drop glue, though, a
                // comparator panic mid-merge could leave a seed and its
                // original in the array at once, so those fall back to
                // carving the workspace from the input instead.
                if core::mem::needs_drop::<T>() {
                    return workspace::merge_sort_in_place(s, n, less);
                }

                // An eighth of the input sits past the point of diminishing
                // returns for the workspace merges
                let nw = n / 8;

                let mut scratch: Vec<MaybeUninit<T>> = Vec::new();
                if scratch.try_reserve_exact(nw).is_err() {
                    // Allocation failure quietly degrades to no workspace
                    return workspace::merge_sort_in_place(s, n, less);
                }

                let wp = scratch.as_mut_ptr() as *mut T;
                ptr::copy_nonoverlapping(s, wp, nw);

                workspace::sort_using_workspace(s, n, wp, nw, less);
            }
        }
    }
}
