//! Workspace-driven merging and the adaptive in-place sort engine.
//!
//! The galloping here owes a debt to TimSort: a branchless pairwise loop
//! runs until one side produces [`SPRINT_ACTIVATE`] consecutive wins, then
//! the sprint searches bulk-move whole winning runs, with a small exit
//! penalty that biases back toward the linear loop on mixed signals.
//!
//! Every element movement is a swap, so the workspace ends each merge
//! holding the same multiset of elements it started with, merely permuted.
//! That is what lets [`merge_sort_in_place`] carve its workspace out of the
//! input itself and sort it afterwards.

use core::ptr;

use crate::inplace::rotate_merge_in_place;
use crate::insert::small_sort;
use crate::rotate::rotate_block;
use crate::search::{Leap, search_left, search_right, sprint_left, sprint_right};
use crate::util::{Less, conditional, ptr_sub};

/// Consecutive wins from one side before a merge switches to sprinting.
pub(crate) const SPRINT_ACTIVATE: usize = 7;

/// Demerit applied on leaving sprint mode, so mixed signals re-enter it
/// slightly sooner the longer sprints keep paying off.
const SPRINT_EXIT_PENALTY: usize = 2;

/// Inputs at or below this length go to the leaf sorter.
pub(crate) const INSERT_SORT_MAX: usize = 11;

/// Top-down split ratio of [`sort_using_workspace`], in percent. An even
/// split is mathematically best; cache effects on some machines mildly
/// favor 47:53, but not consistently enough to move off 50.
const MERGE_SKEW: usize = 50;

/// Fraction of the input carved off as a makeshift workspace when none is
/// supplied. Anything from 3 to 20 works; 9 measures best.
pub(crate) const WSRATIO: usize = 9;

// Merge a..a+na with b..b+nb, where everything in the workspace-bound side
// fits: the right run is parked in w.., then merged back downward from the
// high end. The caller guarantees *b < *(b - 1), nb <= nw, and that both
// runs were trimmed so the last of A and the first of B are out of place.
unsafe fn merge_left<T, F: Less<T>>(
    mut a: *mut T,
    na: usize,
    b: *mut T,
    nb: usize,
    mut w: *mut T,
    nw: usize,
    less: &mut F,
) {
    unsafe {
        debug_assert!(na > 0 && nb > 0);
        debug_assert!(nb <= nw);

        let pe = b.add(nb);
        let mut pw = w;
        let mut pb = pe;
        let mut pa = b;

        // Park the right run in the workspace
        let mut tb = b;
        for _ in 0..nb {
            ptr::swap(pw, tb);
            pw = pw.add(1);
            tb = tb.add(1);
        }

        // The result of the first comparison is already known
        pa = pa.sub(1);
        pb = pb.sub(1);
        ptr::swap(pb, pa);

        let mut a_run = 0usize;
        let mut b_run = 0usize;
        let mut sprint = SPRINT_ACTIVATE;

        while pa > a && pw > w {
            if (a_run | b_run) < sprint {
                // Pick the larger of the two fronts without branching
                let res = less(&*pw.sub(1), &*pa.sub(1));
                pb = pb.sub(1);
                ptr::swap(pb, conditional(pw.sub(1), pa.sub(1), res));
                pa = pa.sub(res as usize);
                pw = pw.sub(!res as usize);
                a_run = (a_run + res as usize) * res as usize;
                b_run = (b_run + !res as usize) * !res as usize;
                continue;
            }

            loop {
                sprint -= (sprint > 2) as usize;

                // The left run is sprinting
                if a_run > 0 {
                    let ta = sprint_right(a, pa, pw.sub(1), Leap::Left, less);
                    a_run = ptr_sub(pa, ta);
                    for _ in 0..a_run {
                        pa = pa.sub(1);
                        pb = pb.sub(1);
                        ptr::swap(pa, pb);
                    }
                    if pa == a {
                        break;
                    }
                    b_run += (b_run == 0) as usize;
                }

                // The workspace side is sprinting
                if b_run > 0 {
                    let tw = sprint_left(w, pw, pa.sub(1), Leap::Left, less);
                    b_run = ptr_sub(pw, tw);
                    for _ in 0..b_run {
                        pw = pw.sub(1);
                        pb = pb.sub(1);
                        ptr::swap(pw, pb);
                    }
                    if pw == w {
                        break;
                    }
                    a_run += (a_run == 0) as usize;
                }

                if a_run < SPRINT_ACTIVATE && b_run < SPRINT_ACTIVATE {
                    break;
                }
            }

            sprint += SPRINT_EXIT_PENALTY;
            a_run = 0;
            b_run = 0;
        }

        // Swap back whatever the workspace still holds
        debug_assert!(w <= pw);
        while w != pw {
            ptr::swap(a, w);
            w = w.add(1);
            a = a.add(1);
        }
    }
}

// Mirror of merge_left for the case where the left run is the one that fits
// the workspace: park A in w.., then merge upward from the low end.
unsafe fn merge_right<T, F: Less<T>>(
    mut a: *mut T,
    na: usize,
    mut b: *mut T,
    nb: usize,
    mut w: *mut T,
    nw: usize,
    less: &mut F,
) {
    unsafe {
        debug_assert!(na > 0 && nb > 0);
        debug_assert!(na <= nw);

        let pe = b.add(nb);
        let mut pw = w;

        // Park the left run in the workspace
        let mut ta = a;
        for _ in 0..na {
            ptr::swap(pw, ta);
            pw = pw.add(1);
            ta = ta.add(1);
        }

        // The first element of B is known to be the smaller
        ptr::swap(a, b);
        a = a.add(1);
        b = b.add(1);

        let mut a_run = 0usize;
        let mut b_run = 0usize;
        let mut sprint = SPRINT_ACTIVATE;

        while b < pe && w < pw {
            if (a_run | b_run) < sprint {
                let res = less(&*b, &*w);
                ptr::swap(a, conditional(w, b, res));
                b = b.add(res as usize);
                w = w.add(!res as usize);
                a_run = (a_run + !res as usize) * !res as usize;
                b_run = (b_run + res as usize) * res as usize;
                a = a.add(1);
                continue;
            }

            loop {
                sprint -= (sprint > 2) as usize;

                // The workspace side is sprinting
                let tw = sprint_right(w, pw, b, Leap::Right, less);
                a_run = ptr_sub(tw, w);
                if a_run > 0 {
                    for _ in 0..a_run {
                        ptr::swap(a, w);
                        w = w.add(1);
                        a = a.add(1);
                    }
                    if w >= pw {
                        break;
                    }
                }

                // The right run is sprinting
                let tb = sprint_left(b, pe, w, Leap::Right, less);
                b_run = ptr_sub(tb, b);
                if b_run > 0 {
                    for _ in 0..b_run {
                        ptr::swap(a, b);
                        b = b.add(1);
                        a = a.add(1);
                    }
                    if b >= pe {
                        break;
                    }
                }

                if a_run < SPRINT_ACTIVATE && b_run < SPRINT_ACTIVATE {
                    break;
                }
            }

            sprint += SPRINT_EXIT_PENALTY;
            a_run = 0;
            b_run = 0;
        }

        // Swap back whatever the workspace still holds
        debug_assert!(w <= pw);
        while w != pw {
            ptr::swap(a, w);
            w = w.add(1);
            a = a.add(1);
        }
    }
}

/// Merge the adjacent sorted runs `a..a + na` and `b..b + nb` through the
/// workspace `w..w + nw`, where `nw` is at least `min(na, nb)`. Trims the
/// already-placed prefix of A and suffix of B first, then merges from
/// whichever direction parks the smaller side in the workspace.
pub(crate) unsafe fn merge_using_workspace<T, F: Less<T>>(
    mut a: *mut T,
    mut na: usize,
    b: *mut T,
    mut nb: usize,
    w: *mut T,
    nw: usize,
    less: &mut F,
) {
    unsafe {
        debug_assert!(na > 0 && nb > 0);

        // Check whether there is anything to do at all
        if !less(&*b, &*b.sub(1)) {
            return;
        }

        let pe = b.add(nb);

        // Skip the prefix of A that is already placed below B
        if !less(&*b, &*a) {
            let pos = if na > 10 {
                search_right(a, na, b, less)
            } else {
                let mut pos = 1;
                while pos < na && !less(&*b, &*a.add(pos)) {
                    pos += 1;
                }
                pos
            };
            a = a.add(pos);
            na -= pos;
            debug_assert!(na > 0);
        }

        // Skip the suffix of B that is already placed above A
        if !less(&*pe.sub(1), &*b.sub(1)) {
            if nb > 10 {
                nb = search_left(b, nb, b.sub(1), less);
            } else {
                let mut sp = pe.sub(1);
                loop {
                    sp = sp.sub(1);
                    nb -= 1;
                    if nb == 0 || less(&*sp, &*b.sub(1)) {
                        break;
                    }
                }
            }
            debug_assert!(nb > 0);
        }

        // Both counts stay positive for any strict weak order; an ordering
        // violation may drain one, in which case the merge is already moot
        if na == 0 || nb == 0 {
            return;
        }

        if nb < na {
            merge_left(a, na, b, nb, w, nw, less);
        } else {
            merge_right(a, na, b, nb, w, nw, less);
        }
    }
}

/// Merge two adjacent sorted runs with a workspace of any positive size.
/// While the left run exceeds the workspace, carve off a workspace-sized
/// prefix, rotate the remainder past the B elements that belong below it,
/// and merge the carved piece; the residuals shrink until one direct merge
/// finishes the job.
pub(crate) unsafe fn merge_workspace_constrained<T, F: Less<T>>(
    mut pa: *mut T,
    mut na: usize,
    mut pb: *mut T,
    mut nb: usize,
    ws: *mut T,
    nw: usize,
    less: &mut F,
) {
    unsafe {
        let pe = pb.add(nb);

        while na > nw {
            // rp marks where the rotation window starts; pb moves back to
            // the end of the prefix of A that fits the workspace
            let rp = pb;
            pb = pa.add(nw);

            // Everything in B below the carved prefix's upper bound rotates
            // in between the two pieces of A
            let sp = rp.add(search_left(rp, nb, pb.sub(1), less));

            rotate_block(pb, rp, sp);

            // Four regions now: pa..pb fits the workspace, pb..rp is the B
            // prefix that compares below the cut, rp..sp is the rest of A,
            // sp..pe is the rest of B
            let rp = pb.add(ptr_sub(sp, rp));
            na = nw;
            nb = ptr_sub(rp, pb);

            // The rotation can leave nothing to merge
            if nb > 0 {
                merge_using_workspace(pa, na, pb, nb, ws, nw, less);
            }

            pa = rp;
            pb = sp;
            na = ptr_sub(sp, rp);
            nb = ptr_sub(pe, sp);
        }

        debug_assert!(na > 0);

        if nb > 0 {
            merge_using_workspace(pa, na, pb, nb, ws, nw, less);
        }
    }
}

/// Sort `pa..pa + n` given a workspace of `nw >= 1` elements: an even
/// top-down division over [`merge_workspace_constrained`], with the network
/// and insertion leaf sorter at the bottom.
pub(crate) unsafe fn sort_using_workspace<T, F: Less<T>>(
    pa: *mut T,
    n: usize,
    ws: *mut T,
    nw: usize,
    less: &mut F,
) {
    unsafe {
        if n <= INSERT_SORT_MAX {
            return small_sort(pa, n, less);
        }

        debug_assert!(nw > 0);

        let na = (n * MERGE_SKEW) / 100;
        let nb = n - na;
        let pb = pa.add(na);

        sort_using_workspace(pa, na, ws, nw, less);
        sort_using_workspace(pb, nb, ws, nw, less);

        merge_workspace_constrained(pa, na, pb, nb, ws, nw, less);
    }
}

/// Sort `pa..pa + n` with no external space: carve an `n /` [`WSRATIO`]
/// prefix (at least 4 elements) to act as the workspace, sort the rest
/// through it, recursively sort the workspace itself, and merge the two in
/// place. Handing this routine distinct keys yields a stable result for
/// free, which is what the stable front-end builds on.
pub(crate) unsafe fn merge_sort_in_place<T, F: Less<T>>(pa: *mut T, n: usize, less: &mut F) {
    unsafe {
        if n <= INSERT_SORT_MAX {
            return small_sort(pa, n, less);
        }

        let na = usize::max(n / WSRATIO, 4);
        let nb = n - na;
        let pb = pa.add(na);
        let pe = pa.add(n);

        // Sort B using A as the workspace, then settle A itself
        sort_using_workspace(pb, nb, pa, na, less);
        merge_sort_in_place(pa, na, less);

        rotate_merge_in_place(pa, pb, pe, less);
    }
}
