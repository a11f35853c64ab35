//! Block rotation: exchange two adjacent runs of unequal length in place.
//!
//! The core loop is a successive-swap scheme in the Gries-Mills family, with
//! a 3-way ring swap that collapses the rotation window by twice the smaller
//! run length per cycle once the runs differ substantially in size. The two
//! buffered helpers catch the degenerate geometries (a tiny run, or two runs
//! that differ by only a few elements) where the main loop would shrink the
//! window slowest, trading at most [`ROTATE_SMALL`] elements of stack for a
//! single move-and-copy.

use core::mem::MaybeUninit;
use core::ptr;

use crate::util::{ptr_sub, swap_block, swap_ring};

/// Upper bound, in elements, on the stack scratch used by the buffered
/// rotation helpers. Gains asymptote beyond about 16 items.
pub const ROTATE_SMALL: usize = 16;

// Rotate by copying the smaller run out to stack scratch, moving the larger
// run over in one shot, and copying the scratch back into the hole.
unsafe fn rotate_small<T>(pa: *mut T, pb: *mut T, pe: *mut T) {
    unsafe {
        let na = ptr_sub(pb, pa);
        let nb = ptr_sub(pe, pb);

        if na == nb {
            return swap_block(pa, pb, na);
        }

        debug_assert!(usize::min(na, nb) <= ROTATE_SMALL);

        let mut buf = MaybeUninit::<[T; ROTATE_SMALL]>::uninit();
        let bp = buf.as_mut_ptr() as *mut T;
        let pc = pa.add(nb);

        if na < nb {
            ptr::copy_nonoverlapping(pa, bp, na);
            ptr::copy(pb, pa, nb);
            ptr::copy_nonoverlapping(bp, pc, na);
        } else {
            ptr::copy_nonoverlapping(pb, bp, nb);
            ptr::copy(pa, pc, na);
            ptr::copy_nonoverlapping(bp, pa, nb);
        }
    }
}

// Rotate two runs that overlap by only a small amount: buffer the overhang,
// shift the rest into place with one move and one block swap, and restore
// the overhang.
unsafe fn rotate_overlap<T>(pa: *mut T, pb: *mut T, pe: *mut T) {
    unsafe {
        let na = ptr_sub(pb, pa);
        let nb = ptr_sub(pe, pb);

        if na == nb {
            return swap_block(pa, pb, na);
        }

        let mut buf = MaybeUninit::<[T; ROTATE_SMALL]>::uninit();
        let bp = buf.as_mut_ptr() as *mut T;

        if na < nb {
            let nc = nb - na;
            let pc = pb.add(nc);

            // Buffer B's tail, shift B's head to the end, swap A into place,
            // restore the tail between them
            ptr::copy_nonoverlapping(pe.sub(nc), bp, nc);
            ptr::copy(pb, pc, na);
            swap_block(pa, pc, na);
            ptr::copy_nonoverlapping(bp, pb, nc);
        } else {
            let nc = na - nb;
            let pc = pb.sub(nc);

            // Buffer A's tail, shift B down over it, swap A's head with B,
            // restore the tail at the very end
            ptr::copy_nonoverlapping(pc, bp, nc);
            ptr::copy(pb, pc, nb);
            swap_block(pa, pc, nb);
            ptr::copy_nonoverlapping(bp, pe.sub(nc), nc);
        }
    }
}

/// Permute the adjacent runs `A = pa..pb` and `B = pb..pe` into `BA` in
/// place, preserving the relative order of the elements inside each run.
/// Uses O(|A| + |B|) swaps and constant space beyond the bounded scratch of
/// the small-size helpers.
pub unsafe fn rotate_block<T>(mut pa: *mut T, mut pb: *mut T, mut pe: *mut T) {
    unsafe {
        let mut na = ptr_sub(pb, pa);
        let mut nb = ptr_sub(pe, pb);

        loop {
            if na <= nb {
                let nc = nb - na;

                if na <= ROTATE_SMALL {
                    if na > 0 {
                        rotate_small(pa, pb, pe);
                    }
                    return;
                }

                if nc < na {
                    // Overflow scenario
                    if nc > 2 && nc <= ROTATE_SMALL {
                        return rotate_overlap(pa, pb, pe);
                    }

                    swap_ring(pb.sub(nc), pb, pe.sub(nc), nc);
                    swap_block(pa, pb.add(nc), na - nc);
                    na -= nc;
                    pe = pb;
                    pb = pb.sub(nc);
                    nb = nc;
                } else {
                    // Remainder scenario
                    swap_ring(pa, pb, pe.sub(na), na);
                    pa = pb;
                    pb = pb.add(na);
                    pe = pe.sub(na);
                    nb -= na << 1;
                }
            } else {
                let nc = na - nb;

                if nb <= ROTATE_SMALL {
                    if nb > 0 {
                        rotate_small(pa, pb, pe);
                    }
                    return;
                }

                if nc < nb {
                    // Overflow scenario
                    if nc > 2 && nc <= ROTATE_SMALL {
                        return rotate_overlap(pa, pb, pe);
                    }

                    swap_ring(pb, pb.sub(nc), pa, nc);
                    swap_block(pb.add(nc), pa.add(nc), nb - nc);
                    pa = pb;
                    na = nc;
                    pb = pb.add(nc);
                    nb -= nc;
                } else {
                    // Remainder scenario
                    swap_ring(pb, pb.sub(nb), pa, nb);
                    pe = pb;
                    pb = pb.sub(nb);
                    pa = pa.add(nb);
                    na -= nb << 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotated(na: usize, nb: usize) -> Vec<u32> {
        let mut v: Vec<u32> = (0..(na + nb) as u32).collect();
        unsafe {
            let s = v.as_mut_ptr();
            rotate_block(s, s.add(na), s.add(na + nb));
        }
        v
    }

    fn expected(na: usize, nb: usize) -> Vec<u32> {
        let mut v: Vec<u32> = ((na as u32)..(na + nb) as u32).collect();
        v.extend(0..na as u32);
        v
    }

    #[test]
    fn rotates_all_small_geometries() {
        for na in 0..48 {
            for nb in 0..48 {
                assert_eq!(rotated(na, nb), expected(na, nb), "na={na} nb={nb}");
            }
        }
    }

    #[test]
    fn rotates_lopsided_and_overlapping_blocks() {
        for (na, nb) in [
            (1, 500),
            (500, 1),
            (17, 483),
            (483, 17),
            (250, 250),
            (251, 249),
            (256, 260),
            (260, 256),
            (129, 371),
            (333, 167),
        ] {
            assert_eq!(rotated(na, nb), expected(na, nb), "na={na} nb={nb}");
        }
    }

    #[test]
    fn double_rotation_restores_the_original() {
        let original: Vec<u32> = (0..777).collect();

        for na in [3, 16, 17, 250, 389, 760] {
            let mut v = original.clone();
            unsafe {
                let s = v.as_mut_ptr();
                rotate_block(s, s.add(na), s.add(777));
                rotate_block(s, s.add(777 - na), s.add(777));
            }
            assert_eq!(v, original, "na={na}");
        }
    }
}
