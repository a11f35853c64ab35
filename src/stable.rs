//! The stable sort front-end.
//!
//! The library has no stable in-place merge, so stability comes from the
//! shape of the data instead: unique values extracted from the input form
//! the workspace handed to the unstable engine, and merging pairwise
//! distinct keys is vacuously stable. Duplicates disqualified along the way
//! are deposited, sorted, at the left edge of the array and travel only as
//! whole blocks under the rotation primitive, so equal keys never cross.
//! Certain inputs get fully sorted by the extraction phase alone.

use core::ptr;

use crate::basic::{basic_sort, dereverse};
use crate::inplace::shift_merge_in_place;
use crate::uniques::extract_uniques;
use crate::util::{Less, ptr_sub};
use crate::workspace::{
    WSRATIO, merge_sort_in_place, merge_workspace_constrained, sort_using_workspace,
};

/// Capacity of each duplicate table. The 1:2 tree merge makes a power of
/// three ideal, and with tables this deep an input degenerate enough to
/// fill them sorts trivially fast anyway.
const MAX_DUPS: usize = 27;

/// Divisor of the workspace growth target. Digging out uniques is not free,
/// so the front-end aims for less workspace than [`WSRATIO`] would suggest;
/// 1.5x to 3x of that ratio measures well.
const STABLE_WSRATIO: usize = 24;

/// Below this many items the basic sort alone wins the crossover.
const STABLE_MIN: usize = 75;

// Bookkeeping for one stable sort invocation. All sizes count elements.
struct StableState<T> {
    // Duplicate blocks already merged up, and blocks still awaiting merge.
    // The two-stage scheme tracks MAX_DUPS^2 blocks in 2 * MAX_DUPS slots.
    merged_dups: [*mut T; MAX_DUPS],
    num_merged: usize,
    free_dups: [*mut T; MAX_DUPS],
    num_free: usize,
    work_space: *mut T,
    work_size: usize,
    work_sorted: bool,
    rest: *mut T,
    rest_size: usize,
    pe: *mut T,
}

// Merge a list of adjacent sorted duplicate blocks into one, splitting the
// list 1:2 at each level. `pe` bounds the last block. Small merges go
// through the workspace; ones that dwarf it merge in place.
unsafe fn merge_duplicates<T, F: Less<T>>(
    state: &mut StableState<T>,
    list: &[*mut T],
    pe: *mut T,
    less: &mut F,
) -> *mut T {
    unsafe {
        let n = list.len();

        if n == 1 {
            return list[0];
        }

        let n1 = (n + 1) / 3;

        let m1 = merge_duplicates(state, &list[..n1], list[n1], less);
        let m2 = merge_duplicates(state, &list[n1..], pe, less);

        let nm1 = ptr_sub(m2, m1);
        let nm2 = ptr_sub(pe, m2);

        let ws = state.work_space;
        let nw = state.work_size;

        if nm1 > nw * WSRATIO {
            shift_merge_in_place(m1, m2, pe, less);
        } else {
            merge_workspace_constrained(m1, nm1, m2, nm2, ws, nw, less);
            state.work_sorted = false;
        }

        m1
    }
}

// Record the start of a freshly deposited duplicate block. A full free
// table merges into a single block that graduates to the merged table.
unsafe fn add_duplicate<T, F: Less<T>>(state: &mut StableState<T>, new_dup: *mut T, less: &mut F) {
    unsafe {
        state.free_dups[state.num_free] = new_dup;
        state.num_free += 1;

        if state.num_free < MAX_DUPS {
            return;
        }

        let list = state.free_dups;
        let n = state.num_free;
        let ws = state.work_space;

        let mf = merge_duplicates(state, &list[..n], ws, less);

        state.merged_dups[state.num_merged] = mf;
        state.num_merged += 1;
        state.num_free = 0;
    }
}

// Collapse the duplicate tables, settle the workspace, and merge the three
// sorted sections back into one run.
unsafe fn stable_sort_finisher<T, F: Less<T>>(state: &mut StableState<T>, less: &mut F) {
    unsafe {
        let ws = state.work_space;
        let nw = state.work_size;

        // Merge up the free duplicates. Frees only accumulate while the
        // merged table has room, so the promotion below always fits.
        if state.num_free > 0 {
            let list = state.free_dups;
            let n = state.num_free;
            let mf = merge_duplicates(state, &list[..n], ws, less);

            debug_assert!(state.num_merged < MAX_DUPS);
            state.merged_dups[state.num_merged] = mf;
            state.num_merged += 1;
            state.num_free = 0;
        }

        // Merge up the merged duplicates
        let mut md: Option<*mut T> = None;
        if state.num_merged > 0 {
            let list = state.merged_dups;
            let n = state.num_merged;
            md = Some(merge_duplicates(state, &list[..n], ws, less));
        }

        // Settle the workspace if the constrained merges jumbled it
        if !state.work_sorted {
            merge_sort_in_place(ws, nw, less);
        }

        // Three sorted sections remain: the merged duplicates (possibly
        // large), the workspace of uniques, and the rest
        let pr = state.rest;
        let pe = state.pe;
        let nm = md.map_or(0, |md| ptr_sub(ws, md));

        debug_assert!(ptr_sub(pe, pr) == state.rest_size);

        // Fold the duplicates in whichever order keeps the largest single
        // merge smallest
        if nm > 0 && nm < nw {
            let md = md.unwrap_or(ws);
            shift_merge_in_place(md, ws, pr, less);
            shift_merge_in_place(md, pr, pe, less);
        } else {
            shift_merge_in_place(ws, pr, pe, less);
            if nm > 0 {
                shift_merge_in_place(md.unwrap_or(ws), ws, pe, less);
            }
        }
    }
}

/// Stable-sort `pa..pa + n`: equal-keyed elements keep their original
/// relative order.
pub(crate) unsafe fn stable_sort<T, F: Less<T>>(pa: *mut T, n: usize, less: &mut F) {
    unsafe {
        if n < STABLE_MIN {
            basic_sort(pa, n, less);
            return;
        }

        let pe = pa.add(n);

        // The first workspace candidate is intentionally small, as the
        // slower basic sort has to kick-start the process; the uniques it
        // yields then drive the merge engine to find more uniques faster
        let mut nw = (n >> 7) + STABLE_WSRATIO;
        if nw > n >> 2 {
            nw = n >> 2;
        }
        let mut nr = n - nw;
        let mut pr = pa.add(nw);

        let mut wstarget = nr / STABLE_WSRATIO;

        let reversals = basic_sort(pa, nw, less);

        if nw - reversals <= nw >> 5 {
            // Nearly everything reversed: assume the rest of the input is
            // too and flip it up front
            dereverse(pr, nr, less);
        } else if reversals == 0 {
            // The candidate was already sorted; probe the rest, starting
            // one element early to catch the boundary, and leave now if
            // the whole input was sorted
            if dereverse(pr.sub(1), nr + 1, less) == 0 {
                return;
            }
        }

        // Pull out the first set of unique values
        let mut ws = extract_uniques(pa, nw, None, less);
        nw = ptr_sub(pr, ws);

        let mut state = StableState {
            merged_dups: [ptr::null_mut(); MAX_DUPS],
            num_merged: 0,
            free_dups: [ptr::null_mut(); MAX_DUPS],
            num_free: 0,
            work_space: ws,
            work_size: nw,
            work_sorted: true,
            rest: pr,
            rest_size: nr,
            pe,
        };

        // pa..ws holds sorted duplicates, ws..pr the workspace of uniques,
        // pr..pe everything still unsorted. A first duplicate block bigger
        // than the workspace goes straight to the merged table.
        if ptr_sub(ws, pa) > ptr_sub(pr, ws) {
            state.merged_dups[0] = pa;
            state.num_merged = 1;
        } else if ws > pa {
            state.free_dups[0] = pa;
            state.num_free = 1;
        }

        // Grow the workspace until the target is met or the duplicate
        // tables saturate. Every pass sorts more of the array regardless,
        // so the effort balances out.
        while nw < wstarget && state.num_merged < MAX_DUPS {
            // Estimate the grab from the unique ratio observed so far,
            // padded by an eighth
            let nd = ptr_sub(ws, pa);
            let ratio = nw as f64 / (nw + nd) as f64;
            let mut grab = ((wstarget - nw) as f64 / ratio) as usize;
            grab = (grab * 9) >> 3;

            // At least 1/32 of the rest, to avoid creeping up on the
            // target; at most what the workspace sorts efficiently, and
            // never more than 1/8 of the rest
            grab = grab.max(nr >> 5);
            grab = grab.min(nw * STABLE_WSRATIO);
            grab = grab.min(nr >> 3);

            // Section the candidates off the rest
            let nws = pr;
            nr -= grab;
            pr = pr.add(grab);
            state.rest = pr;
            state.rest_size = nr;

            // Only part of the workspace takes part in the sort, so only
            // that part needs settling afterwards
            let tnw = grab / STABLE_WSRATIO;

            if tnw > 0 {
                sort_using_workspace(nws, grab, ws, tnw, less);
                merge_sort_in_place(ws, tnw, less);
            } else {
                merge_sort_in_place(nws, grab, less);
            }
            state.work_sorted = true;

            // Merge the workspace with the new candidates; only the strict
            // in-place merge keeps equal keys in order here
            shift_merge_in_place(ws, nws, pr, less);

            // The combined block may have picked up duplicates
            let old_ws = ws;
            ws = extract_uniques(ws, nw + grab, None, less);
            nw = ptr_sub(pr, ws);
            state.work_space = ws;
            state.work_size = nw;

            if ws > old_ws {
                add_duplicate(&mut state, old_ws, less);
            }

            // Trivial amounts of unsorted data are better left to the tail
            // sort than pushed through an overly degenerate merge later
            if nr < n >> 4 {
                break;
            }

            wstarget = nr / STABLE_WSRATIO;

            // The workspace merge runs near full speed from 1/128 of the
            // rest, so stop the search once even that much is on hand
            if nr < (n * 3) >> 2 && nw >= nr >> 7 {
                break;
            }
        }

        // Sort the remaining unsorted data. The target was an ideal, not a
        // requirement; below 1/128 of the rest, though, give up and let the
        // basic sort handle what must be a severely degenerate input.
        if nw < wstarget && nw < nr >> 7 {
            basic_sort(pr, nr, less);
        } else {
            sort_using_workspace(pr, nr, ws, nw, less);
            state.work_sorted = false;
        }

        stable_sort_finisher(&mut state, less);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn preserves_insertion_order_of_equal_keys() {
        let mut rng = rand::rng();

        for n in [75usize, 200, 1000, 20_000] {
            for key_space in [1u16, 2, 3, 10, 1000] {
                let mut v: Vec<(u16, u32)> = (0..n as u32)
                    .map(|i| (rng.random_range(0..key_space), i))
                    .collect();

                let mut expect = v.clone();
                expect.sort();

                unsafe {
                    let mut by_key = |a: &(u16, u32), b: &(u16, u32)| a.0 < b.0;
                    stable_sort(v.as_mut_ptr(), n, &mut by_key);
                }

                assert_eq!(v, expect, "n={n} key_space={key_space}");
            }
        }
    }

    #[test]
    fn sorts_the_extraction_heavy_shapes() {
        let mut rng = rand::rng();

        // Saw waves, organ pipes, and near-sorted inputs exercise the
        // reversal heuristics and the workspace growth loop
        for n in [100usize, 1024, 50_000] {
            let patterns: [Vec<i32>; 5] = [
                (0..n).map(|i| (i % 13) as i32).collect(),
                (0..n).map(|i| usize::min(i, n - i) as i32).collect(),
                (0..n as i32).rev().collect(),
                (0..n).map(|i| i as i32 ^ 1).collect(),
                (0..n).map(|_| rng.random_range(0..50)).collect(),
            ];

            for mut v in patterns {
                let mut expect = v.clone();
                expect.sort();

                unsafe {
                    let mut lt = |a: &i32, b: &i32| a < b;
                    stable_sort(v.as_mut_ptr(), n, &mut lt);
                }

                assert_eq!(v, expect, "n={n}");
            }
        }
    }
}
