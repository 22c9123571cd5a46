// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossing detection over a lattice of routes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wayline_benches::lattice;
use wayline_route::crossing::{CrossingPath, find_crossings};

fn bench_find_crossings(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_crossings");
    for count in [10_usize, 40, 100] {
        let routes = lattice(count);
        let paths: Vec<CrossingPath<'_, usize>> = routes
            .iter()
            .enumerate()
            .map(|(id, points)| CrossingPath {
                id,
                points,
                orthogonal: true,
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &paths, |b, paths| {
            b.iter(|| black_box(find_crossings(black_box(paths))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_crossings);
criterion_main!(benches);
