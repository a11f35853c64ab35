use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;
use trisort::{Workspace, basic_sort, inplace_sort, stable_sort};

fn bench_pattern(c: &mut Criterion, name: &str, input: Vec<u64>) {
    let mut group = c.benchmark_group(name);
    group.sample_size(20);

    group.bench_function("trisort::basic_sort", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| basic_sort(black_box(&mut data)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("trisort::stable_sort", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| stable_sort(black_box(&mut data)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("trisort::inplace_sort (internal ws)", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| inplace_sort(black_box(&mut data), Workspace::Internal),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort (stable)", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| data.sort(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("slice::sort_unstable", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| data.sort_unstable(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_random(c: &mut Criterion) {
    let mut rng = rand::rng();
    let input: Vec<u64> = (0..100_000).map(|_| rng.random()).collect();
    bench_pattern(c, "Random u64", input);
}

fn bench_presorted(c: &mut Criterion) {
    let input: Vec<u64> = (0..100_000).collect();
    bench_pattern(c, "Presorted", input);
}

fn bench_reversed(c: &mut Criterion) {
    let input: Vec<u64> = (0..100_000).rev().collect();
    bench_pattern(c, "Reversed", input);
}

fn bench_few_distinct(c: &mut Criterion) {
    let mut rng = rand::rng();
    let input: Vec<u64> = (0..100_000).map(|_| rng.random_range(0..16)).collect();
    bench_pattern(c, "Few Distinct", input);
}

fn bench_saw_mixed(c: &mut Criterion) {
    let input: Vec<u64> = (0..100_000u64)
        .map(|i| if (i / 1000) % 2 == 0 { i % 1000 } else { 1000 - i % 1000 })
        .collect();
    bench_pattern(c, "Sawtooth", input);
}

criterion_group!(
    benches,
    bench_random,
    bench_presorted,
    bench_reversed,
    bench_few_distinct,
    bench_saw_mixed
);
criterion_main!(benches);
