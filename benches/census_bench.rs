// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Criterion benchmarks for face pairing enumeration and small closed
//! censuses.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tricensus::{find_all_pairings, BoundaryOption, CancelFlag, Census, CensusOptions, SearchOptions};

fn bench_pairings(c: &mut Criterion) {
    let mut group = c.benchmark_group("face_pairings");
    for &n in &[2usize, 3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("closed", n), &n, |b, &n| {
            b.iter(|| {
                let mut found = 0u64;
                find_all_pairings(n, BoundaryOption::Forbidden, None, &CancelFlag::new(), |p| {
                    if p.is_some() {
                        found += 1;
                    }
                });
                black_box(found)
            })
        });
    }
    group.finish();
}

fn bench_census(c: &mut Criterion) {
    let mut group = c.benchmark_group("closed_census");
    group.sample_size(10);
    for &n in &[1usize, 2, 3] {
        for orientable_only in [false, true] {
            let name = if orientable_only { "orientable" } else { "all" };
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                let options = CensusOptions::new(n)
                    .with_search(SearchOptions::default().with_orientable_only(orientable_only));
                b.iter(|| {
                    let census = Census::new(options).unwrap();
                    black_box(census.run(&CancelFlag::new(), |_| {}).unwrap().triangulations)
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_pairings, bench_census);
criterion_main!(benches);
