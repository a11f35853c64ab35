//! Splitting a sorted run into duplicates (left) and unique values (right).
//!
//! The uniques residue is strictly increasing, which is what qualifies it
//! as scratch space for the unstable merge engine: merging pairwise-distinct
//! keys is stable no matter the merge. The divide and conquer below runs in
//! close to linear time, if with a moderately high constant.

use core::ptr;

use crate::rotate::rotate_block;
use crate::util::{Less, ptr_sub};

// Direct sweep for smallish runs: roll every duplicate run leftward, as a
// block rotation for multi-element runs and a bubble for single elements.
// The region from ph - 1 onward is a pre-identified duplicate tail whose
// representative lives beyond pe.
unsafe fn extract_unique_sub<T, F: Less<T>>(
    a: *mut T,
    pe: *mut T,
    ph: *mut T,
    less: &mut F,
) -> *mut T {
    unsafe {
        let mut pu = a;
        let mut pa = a.add(1);

        while pa < ph {
            if less(&*pa.sub(1), &*pa) {
                pa = pa.add(1);
                continue;
            }

            // The item behind this position opens a duplicate run; find the
            // run's end. Sortedness makes "not ascending" mean "equal".
            let mut dp = pa.sub(1);
            pa = pa.add(1);
            while pa < ph && !less(&*pa.sub(1), &*pa) {
                pa = pa.add(1);
            }
            let rend = pa.sub(1);

            // rend is the run's last item and stays behind as the unique
            // representative; everything before it rolls down to pu
            if ptr_sub(rend, dp) > 1 {
                if dp > pu {
                    rotate_block(pu, dp, rend);
                }
                pu = pu.add(ptr_sub(rend, dp));
            } else {
                while dp > pu {
                    ptr::swap(dp, dp.sub(1));
                    dp = dp.sub(1);
                }
                pu = pu.add(1);
            }

            if pa == ph {
                break;
            }

            // The element that closed the run ascends past the
            // representative, so its own pair needs no re-check
            pa = pa.add(1);
        }

        if ph < pe {
            // Everything from ph - 1 through pe - 1 is one duplicate run
            rotate_block(pu, ph.sub(1), pe.sub(1));
            pu = pu.add(ptr_sub(pe, ph));
        }

        pu
    }
}

/// Permute the sorted run `a..a + n` so that every member of an equal run
/// except its last sits sorted at the front, and the strictly-increasing
/// residue of unique values fills the rest. Return the boundary pointer.
///
/// `hint`, when given, marks a tail that the caller already knows to be one
/// duplicate run; the last element of the run is always the kept unique.
pub(crate) unsafe fn extract_uniques<T, F: Less<T>>(
    a: *mut T,
    n: usize,
    hint: Option<*mut T>,
    less: &mut F,
) -> *mut T {
    unsafe {
        debug_assert!(n > 0);

        let pe = a.add(n);

        if n < 40 {
            return extract_unique_sub(a, pe, hint.unwrap_or(pe), less);
        }

        let mut hints = hint.unwrap_or(pe);

        let na = (n + 3) >> 2;
        let mut pb = a.add(na);
        let ps = pb;

        // Push the split point past any duplicate run it landed inside, so
        // both halves part on a unique boundary
        while pb < pe && !less(&*pb.sub(1), &*pb) {
            pb = pb.add(1);
        }

        if pb == pe {
            return extract_unique_sub(a, pe, ps, less);
        }

        let na = ptr_sub(pb, a);
        let nb = n - na;

        if hints < pb {
            hints = pe;
        }

        // Each half always surfaces at least one unique
        let apu = extract_uniques(a, na, Some(ps), less);
        let bpu = extract_uniques(pb, nb, Some(hints), less);

        // Coalesce the two duplicate blocks with a single rotation
        if bpu > pb {
            rotate_block(apu, pb, bpu);
        }

        apu.add(ptr_sub(bpu, pb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn check(mut v: Vec<u32>) {
        v.sort_unstable();
        let n = v.len();
        let original = v.clone();

        let mut distinct = 1;
        for i in 1..n {
            distinct += (v[i] != v[i - 1]) as usize;
        }

        let mut lt = |a: &u32, b: &u32| a < b;
        let split = unsafe {
            let s = v.as_mut_ptr();
            let pu = extract_uniques(s, n, None, &mut lt);
            ptr_sub(pu, s)
        };

        // Duplicates collapsed left, still sorted; uniques strictly ascend
        assert_eq!(split, n - distinct);
        assert!(v[..split].windows(2).all(|w| w[0] <= w[1]), "{v:?}");
        assert!(v[split..].windows(2).all(|w| w[0] < w[1]), "{v:?}");

        // Permutation preserved
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);
    }

    #[test]
    fn splits_small_and_large_sorted_runs() {
        let mut rng = rand::rng();

        check(vec![7]);
        check(vec![7, 7]);
        check(vec![7, 7, 7, 7, 7, 7, 7, 7]);
        check((0..39).collect());
        check((0..500).collect());

        for n in [10usize, 39, 40, 41, 100, 5000] {
            for modulus in [1u32, 2, 5, 100, u32::MAX] {
                check((0..n).map(|_| rng.random_range(0..modulus)).collect());
            }
        }
    }
}
