use core::mem::{ManuallyDrop, MaybeUninit};
use core::ptr;

use crate::util::{Hole, Less, conditional, ptr_sub};

/// Runs at or below this length use the regular insertion pass alone; longer
/// runs switch to binary insertion for the remainder.
pub const BINARY_INSERTION_MIN: usize = 13;

/// Sort `s..s + n` with a two-stage insertion sort: a plain hole-shifting
/// pass for the first [`BINARY_INSERTION_MIN`] items, then binary insertion
/// with a block shift for everything after.
pub unsafe fn insertion_sort<T, F: Less<T>>(s: *mut T, n: usize, less: &mut F) {
    unsafe {
        let rn = usize::min(n, BINARY_INSERTION_MIN);

        for i in 1..rn {
            let a = s.add(i);

            if less(&*a, &*a.sub(1)) {
                let tmp = ManuallyDrop::new(a.read());
                let mut hole = Hole::new(a, &*tmp);

                hole.pos.write(hole.pos.sub(1).read());
                hole.pos = hole.pos.sub(1);

                while hole.pos != s && less(&tmp, &*hole.pos.sub(1)) {
                    hole.pos.write(hole.pos.sub(1).read());
                    hole.pos = hole.pos.sub(1);
                }
                // The hole drops tmp back into its final position
            }
        }

        if n <= BINARY_INSERTION_MIN {
            return;
        }

        for i in rn..n {
            let a = s.add(i);

            if less(&*a, &*a.sub(1)) {
                // Monotone halving search for the insertion point
                let mut max = i - 1;
                let mut tc = s;

                loop {
                    let val = max >> 1;
                    if val == 0 {
                        break;
                    }
                    tc = conditional(tc.add(val), tc, less(&*a, &*tc.add(val)));
                    max -= val;
                }
                tc = tc.add(!less(&*a, &*tc) as usize);

                let tmp = ManuallyDrop::new(a.read());
                ptr::copy(tc, tc.add(1), ptr_sub(a, tc));
                tc.write(ManuallyDrop::into_inner(tmp));
            }
        }
    }
}

/// Branchless compare-exchange of the adjacent pair at `p`.
///
/// Return `true` when the pair was already in order.
#[inline(always)]
unsafe fn exchange<T, F: Less<T>>(p: *mut T, less: &mut F) -> bool {
    unsafe {
        let swap = less(&*p.add(1), &*p);

        let mut tmp = MaybeUninit::<T>::uninit();
        ptr::copy_nonoverlapping(p.add(!swap as usize), tmp.as_mut_ptr(), 1);
        ptr::copy(p.add(swap as usize), p, 1);
        ptr::copy_nonoverlapping(tmp.as_ptr(), p.add(1), 1);

        !swap
    }
}

unsafe fn sort_two<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        exchange(p1, less);
    }
}

unsafe fn sort_three<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        let p2 = p1.add(1);

        exchange(p1, less);

        if exchange(p2, less) {
            return;
        }

        exchange(p1, less);
    }
}

unsafe fn sort_four<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        let p2 = p1.add(1);
        let p3 = p1.add(2);

        exchange(p1, less);
        exchange(p3, less);

        if exchange(p2, less) {
            return;
        }

        exchange(p1, less); // p1 guaranteed in place
        exchange(p3, less); // p4 guaranteed in place
        exchange(p2, less); // p2/p3 guaranteed in place
    }
}

unsafe fn sort_five<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        let p2 = p1.add(1);
        let p3 = p1.add(2);
        let p4 = p1.add(3);

        // Appears to be the best tradeoff for random and near-sorted inputs
        exchange(p1, less);
        exchange(p3, less);

        if !exchange(p2, less) {
            exchange(p1, less);
            exchange(p3, less);
            exchange(p2, less);
        }

        if !exchange(p4, less) {
            exchange(p3, less);
            exchange(p2, less);
            exchange(p1, less);
        }
    }
}

unsafe fn sort_six<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        let p2 = p1.add(1);
        let p3 = p1.add(2);
        let p4 = p1.add(3);
        let p5 = p1.add(4);

        exchange(p1, less);
        exchange(p3, less);
        exchange(p5, less);

        if !exchange(p2, less) {
            exchange(p1, less);
            exchange(p3, less);
            exchange(p2, less);
        }

        // Insert p5 into the sorted 4
        if exchange(p4, less) {
            return;
        }

        exchange(p3, less);
        exchange(p2, less);
        exchange(p1, less);

        // Insert p6 into p2..p5
        if exchange(p5, less) {
            return;
        }

        exchange(p4, less);
        exchange(p3, less);
        exchange(p2, less);
    }
}

unsafe fn sort_seven<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        let p2 = p1.add(1);
        let p3 = p1.add(2);
        let p4 = p1.add(3);
        let p5 = p1.add(4);
        let p6 = p1.add(5);

        // Sort the initial 4, and the last 2
        exchange(p1, less);
        exchange(p3, less);
        exchange(p6, less);

        if !exchange(p2, less) {
            exchange(p1, less);
            exchange(p3, less);
            exchange(p2, less);
        }

        // Insert p5 into the sorted 4
        if !exchange(p4, less) {
            exchange(p3, less);
            exchange(p2, less);
            exchange(p1, less);
        }

        // Conditionally insert p6 and p7, using the knowledge that p6 <= p7
        // to adaptively merge; p7 needs no check when p6 is already in place
        if exchange(p5, less) {
            return;
        }

        // Conditionally insert down to p3 and return early if done
        exchange(p6, less);
        exchange(p4, less);
        exchange(p5, less);
        if exchange(p3, less) {
            return;
        }

        // Final insertion sequence to complete the sort
        exchange(p4, less);
        exchange(p2, less);
        exchange(p1, less);
        exchange(p3, less);
        exchange(p2, less);
    }
}

// An adaptive and (mostly) branchless sorting-network style sort of 8 items.
// This takes at most 25 comparisons, and as few as just 7. For mostly sorted
// inputs the comparison count stays small.
unsafe fn sort_eight<T, F: Less<T>>(p1: *mut T, less: &mut F) {
    unsafe {
        let p2 = p1.add(1);
        let p3 = p1.add(2);
        let p4 = p1.add(3);
        let p5 = p1.add(4);
        let p6 = p1.add(5);
        let p7 = p1.add(6);

        // Sort the lower 4 and the upper 4 separately
        exchange(p1, less);
        exchange(p5, less);
        exchange(p3, less);
        exchange(p7, less);

        // Finalise lower 4
        if !exchange(p2, less) {
            exchange(p1, less);
            exchange(p3, less);
            exchange(p2, less);
        }

        // Finalise upper 4
        if !exchange(p6, less) {
            exchange(p5, less);
            exchange(p7, less);
            exchange(p6, less);
        }

        // Merge p5 into p1..p4; an early return is possible when p4 <= p5
        if exchange(p4, less) {
            return;
        }
        exchange(p3, less);
        exchange(p2, less);
        exchange(p1, less);

        // Checking p7 against p4 here breaks the merge of the remaining
        // p6/p7/p8 triplet into two evenly sized operations of at most 8
        // comparisons each
        if less(&*p7, &*p4) {
            // Merge in p6
            ptr::swap(p5, p6);
            ptr::swap(p4, p5);
            exchange(p3, less);
            exchange(p2, less);

            // Merge in p7
            ptr::swap(p6, p7);
            ptr::swap(p5, p6);
            exchange(p4, less);
            exchange(p3, less);

            // Merge in p8
            if exchange(p7, less) {
                return;
            }
            exchange(p6, less);
            exchange(p5, less);
            exchange(p4, less);
        } else {
            // Merge in p6, with an early return opportunity
            if exchange(p5, less) {
                return;
            }
            exchange(p4, less);
            exchange(p3, less);
            exchange(p2, less);

            // Merge in p7/p8
            if exchange(p6, less) {
                return;
            }
            exchange(p5, less);
            exchange(p7, less);
            exchange(p6, less);
        }
    }
}

/// Leaf sorter for the merge engine: hand-tuned networks for 2..=8 items,
/// insertion sort beyond that.
pub unsafe fn small_sort<T, F: Less<T>>(s: *mut T, n: usize, less: &mut F) {
    unsafe {
        match n {
            0 | 1 => {}
            2 => sort_two(s, less),
            3 => sort_three(s, less),
            4 => sort_four(s, less),
            5 => sort_five(s, less),
            6 => sort_six(s, less),
            7 => sort_seven(s, less),
            8 => sort_eight(s, less),
            _ => insertion_sort(s, n, less),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn networks_sort_every_permutation() {
        // Exhaustive up to 6 items, sampled beyond
        for n in 2..=6usize {
            let mut indices: Vec<usize> = (0..n).collect();
            permute(&mut indices, 0, &mut |perm| {
                let mut v: Vec<i32> = perm.iter().map(|&x| x as i32).collect();
                unsafe { small_sort(v.as_mut_ptr(), n, &mut |a: &i32, b: &i32| a < b) };
                assert!(v.windows(2).all(|w| w[0] <= w[1]), "n = {n}: {v:?}");
            });
        }

        for n in [7usize, 8] {
            for pattern in 0..2048u32 {
                let mut v: Vec<i32> = (0..n).map(|i| (pattern.wrapping_mul(0x9e37).wrapping_shr(i as u32) & 7) as i32).collect();
                let mut expect = v.clone();
                expect.sort();
                unsafe { small_sort(v.as_mut_ptr(), n, &mut |a: &i32, b: &i32| a < b) };
                assert_eq!(v, expect);
            }
        }
    }

    #[test]
    fn insertion_sort_handles_both_stages() {
        let mut v: Vec<i32> = (0..40).rev().collect();
        unsafe { insertion_sort(v.as_mut_ptr(), v.len(), &mut |a: &i32, b: &i32| a < b) };
        assert_eq!(v, (0..40).collect::<Vec<_>>());
    }

    fn permute(items: &mut Vec<usize>, k: usize, visit: &mut impl FnMut(&[usize])) {
        if k == items.len() {
            visit(items);
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            permute(items, k + 1, visit);
            items.swap(k, i);
        }
    }
}
