// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lane grid search, used when the heuristic pipeline's route breaks one of
//! its invariants.
//!
//! The grid's lines are the two stub coordinates, every blocked rect's edges,
//! and a frame one stub outside all of them. No rect edge lies strictly
//! between two neighbouring lines, so each grid step is either wholly inside a
//! blocked rect or wholly outside all of them, and a path made of clear steps
//! is clear as a whole.
//!
//! Search states are a grid node plus a heading. Reversing is never allowed,
//! which keeps the stubs intact: the search starts at the source stub heading
//! out of the source port and may not reach the target stub heading away from
//! the target.

use alloc::collections::BinaryHeap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use wayline_geom::{Axis, Port, segment_intersects_rect, span};

use super::Plan;

/// Extra cost of each bend, in route units.
const BEND_COST: f64 = 40.0;

/// Grids with more nodes than this are not searched.
const MAX_NODES: usize = 16_384;

#[derive(Clone, Copy, Debug)]
struct Entry {
    estimate: f64,
    cost: f64,
    state: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the heap pops the cheapest estimate first.
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| self.state.cmp(&other.state))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Index of `port` in [`Port::ALL`], used as the heading of a step that moves
/// along its normal.
fn heading(port: Port) -> usize {
    match port {
        Port::Top => 0,
        Port::Right => 1,
        Port::Bottom => 2,
        Port::Left => 3,
    }
}

fn manhattan(a: Point, b: Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Sorted, deduplicated grid lines along `axis`.
fn lines(blocked: &[Rect], stubs: [Point; 2], margin: f64, axis: Axis) -> Vec<f64> {
    let mut values: Vec<f64> = stubs.iter().map(|p| axis.along(*p)).collect();
    for r in blocked {
        let (lo, hi) = span(*r, axis);
        values.push(lo);
        values.push(hi);
    }
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    values.push(lo - margin);
    values.push(hi + margin);
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b).is_eq());
    values
}

/// A rectilinear path from the source stub to the target stub that stays out
/// of every padded obstacle and both endpoints' padded bounds.
///
/// The returned points start at the source stub and end at the target stub.
/// `None` when there is no such path on the grid or the grid is too large.
pub(super) fn search(plan: &Plan<'_>) -> Option<Vec<Point>> {
    let (start, goal) = (plan.source_stub(), plan.target_stub());
    let blocked: Vec<Rect> = plan
        .obstacles
        .iter()
        .copied()
        .chain(plan.own_bounds().into_iter().map(|(r, _)| r))
        .collect();
    let margin = plan.config.min_stub.max(1.0);
    let xs = lines(&blocked, [start, goal], margin, Axis::Horizontal);
    let ys = lines(&blocked, [start, goal], margin, Axis::Vertical);
    let (nx, ny) = (xs.len(), ys.len());
    if nx * ny > MAX_NODES {
        tracing::debug!(nx, ny, "lane grid too large to search");
        return None;
    }

    let node = |p: Point| {
        let ix = xs.binary_search_by(|x| x.total_cmp(&p.x)).ok()?;
        let iy = ys.binary_search_by(|y| y.total_cmp(&p.y)).ok()?;
        Some(iy * nx + ix)
    };
    let point = |n: usize| Point::new(xs[n % nx], ys[n / nx]);
    let neighbour = |n: usize, port: Port| {
        let (ix, iy) = (n % nx, n / nx);
        match port {
            Port::Top => iy.checked_sub(1).map(|y| y * nx + ix),
            Port::Bottom => (iy + 1 < ny).then(|| (iy + 1) * nx + ix),
            Port::Left => ix.checked_sub(1).map(|x| iy * nx + x),
            Port::Right => (ix + 1 < nx).then(|| iy * nx + ix + 1),
        }
    };

    let from = node(start)?;
    let to = node(goal)?;
    let away_from_target = heading(plan.target_port);

    let mut best = vec![f64::INFINITY; nx * ny * 4];
    let mut prev: Vec<Option<usize>> = vec![None; nx * ny * 4];
    let mut heap = BinaryHeap::new();
    let first = from * 4 + heading(plan.source_port);
    best[first] = 0.0;
    heap.push(Entry {
        estimate: manhattan(start, goal),
        cost: 0.0,
        state: first,
    });

    let mut found = None;
    while let Some(Entry { cost, state, .. }) = heap.pop() {
        if cost > best[state] {
            continue;
        }
        let (n, dir) = (state / 4, state % 4);
        if n == to && dir != away_from_target {
            found = Some(state);
            break;
        }
        let here = point(n);
        let back = Port::ALL[dir].opposite();
        for port in Port::ALL {
            if port == back {
                continue;
            }
            let Some(m) = neighbour(n, port) else {
                continue;
            };
            let there = point(m);
            if blocked.iter().any(|r| segment_intersects_rect(here, there, *r)) {
                continue;
            }
            let turn = heading(port);
            let mut next_cost = cost + manhattan(here, there);
            if turn != dir {
                next_cost += BEND_COST;
            }
            let next = m * 4 + turn;
            if next_cost >= best[next] {
                continue;
            }
            best[next] = next_cost;
            prev[next] = Some(state);
            heap.push(Entry {
                estimate: next_cost + manhattan(there, goal),
                cost: next_cost,
                state: next,
            });
        }
    }

    let mut state = found?;
    let mut path = vec![point(state / 4)];
    while let Some(p) = prev[state] {
        state = p;
        path.push(point(state / 4));
    }
    path.reverse();
    Some(path)
}
