use rand::Rng;
use trisort::{Workspace, inplace_sort, inplace_sort_by};

#[test]
fn test_without_workspace() {
    let mut rng = rand::rng();

    for n in [0usize, 1, 11, 12, 100, 10_000] {
        let mut v: Vec<u64> = (0..n).map(|_| rng.random()).collect();
        let mut expected = v.clone();
        expected.sort_unstable();

        inplace_sort(&mut v, Workspace::None);
        assert_eq!(v, expected, "n = {n}");
    }
}

#[test]
fn test_with_internal_workspace() {
    let mut rng = rand::rng();

    for n in [0usize, 7, 12, 100, 10_000, 100_000] {
        let mut v: Vec<u64> = (0..n).map(|_| rng.random_range(0..1000)).collect();
        let mut expected = v.clone();
        expected.sort_unstable();

        inplace_sort(&mut v, Workspace::Internal);
        assert_eq!(v, expected, "n = {n}");
    }
}

#[test]
fn test_with_borrowed_buffers_of_every_size() {
    let mut rng = rand::rng();
    let n = 20_000;

    // Down to a single-element buffer the sort must degrade gracefully
    for nw in [0usize, 1, 2, 3, 16, 100, n / 8, n / 2, n] {
        let mut v: Vec<u32> = (0..n).map(|_| rng.random_range(0..5000)).collect();
        let mut expected = v.clone();
        expected.sort_unstable();

        let mut scratch: Vec<u32> = (0..nw as u32).collect();
        inplace_sort(&mut v, Workspace::Buffer(&mut scratch));

        assert_eq!(v, expected, "nw = {nw}");
    }
}

#[test]
fn test_buffer_contents_are_preserved_as_a_multiset() {
    let mut rng = rand::rng();

    let mut v: Vec<u32> = (0..50_000).map(|_| rng.random_range(0..100)).collect();
    let mut scratch: Vec<u32> = (0..1000).map(|_| rng.random_range(500..600)).collect();

    let mut expected = v.clone();
    expected.sort_unstable();
    let mut scratch_expected = scratch.clone();
    scratch_expected.sort_unstable();

    inplace_sort(&mut v, Workspace::Buffer(&mut scratch));

    assert_eq!(v, expected);

    // Scratch order is unspecified, its contents are not
    scratch.sort_unstable();
    assert_eq!(scratch, scratch_expected);
}

#[test]
fn test_non_copy_elements() {
    let mut rng = rand::rng();

    let mut v: Vec<String> = (0..5_000)
        .map(|_| format!("{:06}", rng.random_range(0..10_000u32)))
        .collect();
    let mut expected = v.clone();
    expected.sort_unstable();

    let mut scratch: Vec<String> = (0..128).map(|i| format!("scratch-{i}")).collect();
    inplace_sort(&mut v, Workspace::Buffer(&mut scratch));

    assert_eq!(v, expected);
    assert_eq!(scratch.len(), 128);
}

#[test]
fn test_internal_workspace_with_owned_elements() {
    let mut rng = rand::rng();

    let mut v: Vec<Box<u64>> = (0..30_000).map(|_| Box::new(rng.random_range(0..500))).collect();
    let mut expected: Vec<u64> = v.iter().map(|b| **b).collect();
    expected.sort_unstable();

    inplace_sort(&mut v, Workspace::Internal);

    let got: Vec<u64> = v.iter().map(|b| **b).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_custom_comparator_descending() {
    let mut rng = rand::rng();

    let mut v: Vec<i32> = (0..10_000).map(|_| rng.random_range(-100..100)).collect();
    let mut expected = v.clone();
    expected.sort_unstable_by(|a, b| b.cmp(a));

    inplace_sort_by(&mut v, Workspace::Internal, |a, b| b.cmp(a));
    assert_eq!(v, expected);
}

#[test]
fn test_presorted_and_reversed_inputs() {
    for n in [100usize, 10_000] {
        let mut v: Vec<u32> = (0..n as u32).collect();
        inplace_sort(&mut v, Workspace::Internal);
        assert!(v.windows(2).all(|w| w[0] <= w[1]));

        let mut v: Vec<u32> = (0..n as u32).rev().collect();
        let mut scratch = vec![0u32; n / 8];
        inplace_sort(&mut v, Workspace::Buffer(&mut scratch));
        assert!(v.windows(2).all(|w| w[0] <= w[1]));
    }
}
