//! Micro-benchmarks for the code-point set primitive at UCD-like sizes.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use guniset::{CodePointSet, CodePointSetBuilder, RuneRange};

/// Roughly the shape of a large property bucket: many short ranges spread
/// over the BMP plus one long supplementary run.
fn large_set() -> CodePointSet {
    let mut builder = CodePointSetBuilder::new();
    for start in (0..0xFFFF).step_by(64) {
        builder.add_range(RuneRange::new(start, start + 31));
    }
    builder.add_range(RuneRange::new(0x20000, 0x2A6DF));
    builder.build()
}

fn offset_set() -> CodePointSet {
    let mut builder = CodePointSetBuilder::new();
    for start in (16..0xFFFF).step_by(64) {
        builder.add_range(RuneRange::new(start, start + 31));
    }
    builder.build()
}

fn bench_bulk_build(c: &mut Criterion) {
    c.bench_function("builder_build_100k", |b| {
        b.iter(|| black_box(large_set()))
    });
}

fn bench_union(c: &mut Criterion) {
    let left = large_set();
    let right = offset_set();
    c.bench_function("union_overlapping", |b| {
        b.iter(|| {
            let mut set = left.clone();
            set.add_set(black_box(&right));
            black_box(set)
        })
    });
}

fn bench_intersect(c: &mut Criterion) {
    let left = large_set();
    let right = offset_set();
    c.bench_function("intersect_overlapping", |b| {
        b.iter(|| black_box(left.intersect(black_box(&right))))
    });
}

fn bench_difference(c: &mut Criterion) {
    let left = large_set();
    let right = offset_set();
    c.bench_function("difference_overlapping", |b| {
        b.iter(|| {
            let mut set = left.clone();
            set.remove_set(black_box(&right));
            black_box(set)
        })
    });
}

fn bench_range_iteration(c: &mut Criterion) {
    let set = large_set();
    c.bench_function("ranges_walk", |b| {
        b.iter(|| {
            let mut count = 0usize;
            for range in set.ranges() {
                count += (range.last - range.first + 1) as usize;
            }
            black_box(count)
        })
    });
}

fn bench_contains(c: &mut Criterion) {
    let set = large_set();
    c.bench_function("contains_probe", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for r in (0..0x10FFFF).step_by(997) {
                if set.contains(black_box(r)) {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

criterion_group!(
    benches,
    bench_bulk_build,
    bench_union,
    bench_intersect,
    bench_difference,
    bench_range_iteration,
    bench_contains
);
criterion_main!(benches);
