// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene fixtures shared by the Wayline benchmarks.

use kurbo::{Point, Rect};
use wayline_geom::{Port, rect_from_xywh};
use wayline_route::{OrthogonalRouter, RouteOptions, RouteResult};

/// Two nodes far apart with a `cols` x `rows` grid of obstacles between them.
pub struct GridScene {
    /// Source node bounds.
    pub source: Rect,
    /// Target node bounds.
    pub target: Rect,
    /// Obstacles between them.
    pub obstacles: Vec<Rect>,
}

impl GridScene {
    /// Build the scene.
    pub fn new(cols: u32, rows: u32) -> Self {
        let mut obstacles = Vec::new();
        for col in 0..cols {
            for row in 0..rows {
                obstacles.push(rect_from_xywh(
                    200.0 + f64::from(col) * 90.0,
                    -150.0 + f64::from(row) * 80.0,
                    40.0,
                    40.0,
                ));
            }
        }
        let far = 200.0 + f64::from(cols) * 90.0 + 60.0;
        Self {
            source: rect_from_xywh(0.0, 0.0, 120.0, 60.0),
            target: rect_from_xywh(far, 0.0, 120.0, 60.0),
            obstacles,
        }
    }

    /// Route options for a connector from `source` to `target`.
    pub fn options(&self) -> RouteOptions<'_> {
        RouteOptions {
            source_bounds: Some(self.source),
            target_bounds: Some(self.target),
            obstacles: &self.obstacles,
            ..RouteOptions::default()
        }
    }

    /// Route right to left across the grid.
    pub fn route(&self, router: &OrthogonalRouter) -> RouteResult {
        router.route(
            Port::Right.anchor(self.source, 0.5),
            Port::Left.anchor(self.target, 0.5),
            Port::Right,
            Port::Left,
            &self.options(),
        )
    }
}

/// `count` orthogonal routes woven into a lattice: half run left to right with a
/// step in the middle, half run top to bottom, so every horizontal route crosses
/// every vertical one.
pub fn lattice(count: usize) -> Vec<Vec<Point>> {
    let half = count / 2;
    let span = 40.0 * half as f64 + 40.0;
    let mut routes = Vec::with_capacity(count);
    for i in 0..half {
        let y = 20.0 + 40.0 * i as f64;
        routes.push(vec![
            Point::new(0.0, y),
            Point::new(span * 0.5, y),
            Point::new(span * 0.5, y + 10.0),
            Point::new(span, y + 10.0),
        ]);
    }
    for i in 0..count - half {
        let x = 30.0 + 40.0 * i as f64;
        routes.push(vec![Point::new(x, -10.0), Point::new(x, span + 10.0)]);
    }
    routes
}
