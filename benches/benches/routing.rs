// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orthogonal routing and port selection.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kurbo::Point;
use wayline_benches::GridScene;
use wayline_geom::Port;
use wayline_route::{LineStyle, OrthogonalRouter, PathRenderer, RenderRequest, select_ports};

fn bench_orthogonal(c: &mut Criterion) {
    let mut group = c.benchmark_group("orthogonal_route");
    let router = OrthogonalRouter::default();
    for (name, cols, rows) in [("clear", 0, 0), ("grid_2x3", 2, 3), ("grid_4x5", 4, 5)] {
        let scene = GridScene::new(cols, rows);
        group.bench_with_input(BenchmarkId::new("route", name), &scene, |b, scene| {
            b.iter(|| black_box(scene.route(black_box(&router))));
        });
    }
    group.finish();
}

fn bench_port_selection(c: &mut Criterion) {
    let scene = GridScene::new(4, 5);
    c.bench_function("select_ports/grid_4x5", |b| {
        b.iter(|| select_ports(black_box(scene.source), black_box(scene.target), &scene.obstacles));
    });
}

fn bench_render_styles(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = PathRenderer::default();
    let scene = GridScene::new(2, 3);
    let (s, t) = (Port::Right.anchor(scene.source, 0.5), Point::new(380.0, 200.0));
    for style in [LineStyle::Curved, LineStyle::Arc, LineStyle::Smart] {
        let request = RenderRequest {
            obstacles: &scene.obstacles,
            source_port: Some(Port::Right),
            source_bounds: Some(scene.source),
            ..RenderRequest::new(style, s, t)
        };
        group.bench_function(format!("{style:?}"), |b| {
            b.iter(|| black_box(renderer.render(black_box(&request))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_orthogonal, bench_port_selection, bench_render_styles);
criterion_main!(benches);
