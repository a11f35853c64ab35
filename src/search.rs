use crate::util::{Less, conditional, ptr_sub};

/// Probe direction for the sprint searches: `Left` scans backwards from the
/// end of the range, `Right` forwards from its start.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Leap {
    Left,
    Right,
}

/// Return the value `i` in `0..=n` such that for all `j` in `0..i`, `f(j)` and
/// for all `j` in `i..n`, `!f(j)`. The caller guarantees `f` is partitioned in
/// such a manner.
fn lower_bound(mut n: usize, mut f: impl FnMut(usize) -> bool) -> usize {
    let mut i = 0;

    while n > 0 {
        let h = n / 2;
        i += conditional(0, n - h, f(i + h));
        n = h;
    }

    i
}

/// Return the number of elements in the region `s..s + n` which are `less`
/// than `val`.
pub unsafe fn search_left<T, F: Less<T>>(
    s: *const T,
    n: usize,
    val: *const T,
    less: &mut F,
) -> usize {
    unsafe { lower_bound(n, |x| less(&*s.add(x), &*val)) }
}

/// Return the number of elements in the region `s..s + n` which `val` is not
/// `less` than.
pub unsafe fn search_right<T, F: Less<T>>(
    s: *const T,
    n: usize,
    val: *const T,
    less: &mut F,
) -> usize {
    unsafe { lower_bound(n, |x| !less(&*val, &*s.add(x))) }
}

/// Find the split width for a shift or reverse merge stalled at boundary
/// `pb`: the largest `k <= n` such that the `k` elements just right of `pb`
/// all precede the `k` elements just left of it when reflected pairwise.
/// Blocks of that width can be exchanged across the boundary in one shot.
///
/// Requires `n` valid elements on both sides of `pb`.
pub unsafe fn mirror_split<T, F: Less<T>>(pb: *mut T, n: usize, less: &mut F) -> usize {
    unsafe {
        if n >= 8 {
            let mut min = 0;
            let mut max = n;
            let mut pos = max >> 1;

            while min < max {
                // if b[pos] < a[-(pos + 1)] { min = pos + 1 } else { max = pos }
                let res = less(&*pb.add(pos), &*pb.sub(pos + 1));
                min = conditional(min, pos + 1, res);
                max = conditional(pos, max, res);
                pos = (min + max) >> 1;
            }

            pos
        } else {
            // Linear scan in from the widest pair is faster for small sets
            let mut k = n;
            while k > 0 && !less(&*pb.add(k - 1), &*pb.sub(k)) {
                k -= 1;
            }
            k
        }
    }
}

/// Return the first element of `pb..pe` that is not `less` than `*pa`, or
/// `pe` when every element is.
pub unsafe fn rotate_point<T, F: Less<T>>(
    pa: *const T,
    pb: *mut T,
    pe: *mut T,
    less: &mut F,
) -> *mut T {
    unsafe {
        let len = ptr_sub(pe, pb);

        if len > 12 {
            pb.add(search_left(pb, len, pa, less))
        } else {
            let mut p = pb;
            while p != pe && less(&*p, &*pa) {
                p = p.add(1);
            }
            p
        }
    }
}

/// Return the leftmost element within `pa..pe` that is greater than, or equal
/// to, `*pt`. The probe phase leap-frogs in the `leap` direction to bracket
/// the answer within a power-of-two window before refining by binary search.
pub unsafe fn sprint_left<T, F: Less<T>>(
    pa: *mut T,
    pe: *mut T,
    pt: *const T,
    leap: Leap,
    less: &mut F,
) -> *mut T {
    unsafe {
        let mut max = ptr_sub(pe, pa);
        let mut min = 0;
        let mut pos = 0;

        if leap == Leap::Left {
            // Leap-frog backwards from pe to find the search range
            while pos < max {
                if less(&*pe.sub(pos + 1), &*pt) {
                    break;
                }
                pos = (pos << 1) + 1;
            }

            // Set up min and max relative to pe, unless pos overran the
            // range, in which case pos / 2 is the best bound available
            if pos > max {
                max = pos >> 1;
            } else {
                min = max - pos;
                max = min + (pos >> 1);
            }
        } else {
            while pos < max {
                if !less(&*pa.add(pos), &*pt) {
                    break;
                }
                pos = (pos << 1) + 1;
            }

            // Keep min and max within limits; the `pos != 0` term avoids an
            // increment when the very first probe hit, which would otherwise
            // leave min above max
            if pos > max {
                min = max - (pos >> 1);
            } else {
                min = (pos >> 1) + (pos != 0) as usize;
                max = pos;
            }
        }

        pos = (min + max) >> 1;
        while min < max {
            // if a[pos] < *pt { min = pos + 1 } else { max = pos }
            let res = less(&*pa.add(pos), &*pt);
            min = conditional(min, pos + 1, res);
            max = conditional(pos, max, res);
            pos = (min + max) >> 1;
        }

        pa.add(pos)
    }
}

/// Return one past the rightmost element within `pa..pe` that is less than,
/// or equal to, `*pt`.
pub unsafe fn sprint_right<T, F: Less<T>>(
    pa: *mut T,
    pe: *mut T,
    pt: *const T,
    leap: Leap,
    less: &mut F,
) -> *mut T {
    unsafe {
        let mut max = ptr_sub(pe, pa);
        let mut min = 0;
        let mut pos = 0;

        if leap == Leap::Right {
            while pos < max {
                if less(&*pt, &*pa.add(pos)) {
                    break;
                }
                pos = (pos << 1) + 1;
            }

            if pos > max {
                min = max - (pos >> 1);
            } else {
                min = (pos >> 1) + (pos != 0) as usize;
                max = pos;
            }
        } else {
            // Leap-frog backwards from pe to find the search range
            while pos < max {
                if !less(&*pt, &*pe.sub(pos + 1)) {
                    break;
                }
                pos = (pos << 1) + 1;
            }

            if pos > max {
                max = pos >> 1;
            } else {
                min = max - pos;
                max = min + (pos >> 1);
            }
        }

        pos = (min + max) >> 1;
        while min < max {
            // if *pt < a[pos] { max = pos } else { min = pos + 1 }
            let res = less(&*pt, &*pa.add(pos));
            max = conditional(max, pos, res);
            min = conditional(pos + 1, min, res);
            pos = (min + max) >> 1;
        }

        pa.add(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lt(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn sprint_bounds_match_linear_scan() {
        let v: Vec<i32> = vec![0, 0, 1, 2, 2, 2, 3, 5, 5, 8, 9, 9, 9, 12];
        let n = v.len();
        let base = v.as_ptr() as *mut i32;

        for target in -1..14 {
            let expect_left = v.iter().take_while(|&&x| x < target).count();
            let expect_right = v.iter().take_while(|&&x| x <= target).count();

            for leap in [Leap::Left, Leap::Right] {
                let (l, r) = unsafe {
                    let l = sprint_left(base, base.add(n), &target, leap, &mut lt);
                    let r = sprint_right(base, base.add(n), &target, leap, &mut lt);
                    (ptr_sub(l, base), ptr_sub(r, base))
                };
                assert_eq!(l, expect_left, "sprint_left target {target}");
                assert_eq!(r, expect_right, "sprint_right target {target}");
            }
        }
    }

    #[test]
    fn mirror_split_finds_exchange_width() {
        // Left run ends ... 7 8 9 | right run starts 1 2 3 ...
        let v: Vec<i32> = vec![2, 4, 6, 7, 8, 9, 1, 2, 3, 10, 11, 12];
        let base = v.as_ptr() as *mut i32;

        let k = unsafe { mirror_split(base.add(6), 6, &mut lt) };

        // 1 < 9, 2 < 8, 3 < 7, but 10 is not below 6
        assert_eq!(k, 3);
    }

    #[test]
    fn rotate_point_is_lower_bound() {
        let v: Vec<i32> = vec![1, 3, 3, 4, 6, 6, 6, 7, 9, 11, 11, 13, 15, 16];
        let base = v.as_ptr() as *mut i32;
        let n = v.len();

        for target in 0..18 {
            let expect = v.iter().take_while(|&&x| x < target).count();
            let p = unsafe { rotate_point(&target, base, base.add(n), &mut lt) };
            assert_eq!(unsafe { ptr_sub(p, base) }, expect);
        }
    }
}
