// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detours around the endpoints' own nodes and around external obstacles.
//!
//! A detour replaces one run with a path around a rect on the perpendicular
//! axis, along a lane on the rect's boundary:
//!
//! - When both ends of the run lie outside the rect along the run's axis and
//!   the run does not touch an endpoint, the whole run shifts onto the lane.
//! - Otherwise the run steps out to the lane at the rect's near edge, follows
//!   it, and steps back at the far edge.
//!
//! Lanes sit exactly on the padded boundary, which counts as outside.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};
use smallvec::{SmallVec, smallvec};
use wayline_geom::{Axis, merge_overlapping, segment_intersects_rect, simplify_polyline, span};

use super::{Own, Plan, run_axis};

/// Reroute runs that cut through the source or target node's padded bounds.
///
/// The first run may touch the source node and the last run the target node;
/// every other combination is detoured around the nearer side, unless that
/// detour would run into the other endpoint's node.
pub(super) fn avoid_own_bounds(points: &mut Vec<Point>, plan: &Plan<'_>) {
    let own = plan.own_bounds();
    if own.is_empty() {
        return;
    }
    for _ in 0..plan.config.max_iterations {
        let last = points.len().saturating_sub(2);
        let hit = points.windows(2).enumerate().find_map(|(k, w)| {
            own.iter()
                .filter(|(_, which)| {
                    !(k == 0 && *which == Own::Source) && !(k == last && *which == Own::Target)
                })
                .find(|(rect, _)| segment_intersects_rect(w[0], w[1], *rect))
                .map(|(rect, _)| (k, *rect))
        });
        let Some((k, rect)) = hit else {
            return;
        };
        let (a, b) = (points[k], points[k + 1]);
        let others: SmallVec<[Rect; 2]> = own
            .iter()
            .map(|(r, _)| *r)
            .filter(|r| *r != rect)
            .collect();
        let terminal = plan.pinned || k == 0 || k == last;
        let lane = nearer_side(a, b, rect, &others, terminal);
        tracing::trace!(segment = k, "detouring around endpoint node");
        splice(points, k, &detour(a, b, rect, lane, terminal));
    }
}

/// Reroute the first run that enters a padded obstacle, repeatedly, up to the
/// configured budget. Returns the number of detours made.
pub(super) fn avoid_obstacles(points: &mut Vec<Point>, plan: &Plan<'_>) -> usize {
    if plan.obstacles.is_empty() {
        return 0;
    }
    let bias = plan.bias();
    let budget = plan.config.max_iterations;
    for iteration in 0..budget {
        let Some((k, hit)) = first_hit(points, &plan.obstacles) else {
            return iteration;
        };
        // Touching obstacles are passed as one so the detour does not run
        // straight into a neighbour.
        let rect = merge_overlapping(hit, &plan.obstacles);
        let (a, b) = (points[k], points[k + 1]);
        let lane = biased_side(a, b, rect, bias, plan.config.bias_weight);
        let terminal = plan.pinned || k == 0 || k + 2 == points.len();
        tracing::trace!(iteration, segment = k, terminal, "detouring around obstacle");
        splice(points, k, &detour(a, b, rect, lane, terminal));
    }
    if first_hit(points, &plan.obstacles).is_some() {
        tracing::debug!(budget, "obstacle avoidance budget exhausted; keeping best-effort route");
    }
    budget
}

/// First run, and the first rect it enters.
fn first_hit(points: &[Point], rects: &[Rect]) -> Option<(usize, Rect)> {
    points.windows(2).enumerate().find_map(|(k, w)| {
        rects
            .iter()
            .find(|r| segment_intersects_rect(w[0], w[1], **r))
            .map(|r| (k, *r))
    })
}

/// Insert `detour` between `points[k]` and `points[k + 1]`, then tidy.
fn splice(points: &mut Vec<Point>, k: usize, detour: &[Point]) {
    let tail = points.split_off(k + 1);
    points.extend_from_slice(detour);
    points.extend(tail);
    *points = simplify_polyline(points);
}

/// Lane on the side of `rect` nearer to the run `a -> b`.
///
/// A side whose detour would enter one of `others` loses to the far side when
/// the far side's detour stays clear of them.
fn nearer_side(a: Point, b: Point, rect: Rect, others: &[Rect], terminal: bool) -> f64 {
    let axis = run_axis(a, b);
    let (lo, hi) = span(rect, axis.cross());
    let here = axis.across(a);
    let (near, far) = if here - lo <= hi - here { (lo, hi) } else { (hi, lo) };
    let blocked = |lane: f64| {
        detour(a, b, rect, lane, terminal)
            .windows(2)
            .any(|w| others.iter().any(|o| segment_intersects_rect(w[0], w[1], *o)))
    };
    if blocked(near) && !blocked(far) { far } else { near }
}

/// Lane on the side of `rect` with the lower biased cost.
///
/// Each side costs its distance from the run, scaled down by up to `weight`
/// when the side points the way `bias` does. Equal costs go to the shorter
/// distance, then to the low side.
fn biased_side(a: Point, b: Point, rect: Rect, bias: Vec2, weight: f64) -> f64 {
    let axis = run_axis(a, b);
    let (lo, hi) = span(rect, axis.cross());
    let here = axis.across(a);
    let (to_lo, to_hi) = ((here - lo).abs(), (hi - here).abs());
    // Bias component toward the high side.
    let toward_hi = match axis.cross() {
        Axis::Horizontal => bias.x,
        Axis::Vertical => bias.y,
    };
    let cost_lo = to_lo * (1.0 + weight * toward_hi);
    let cost_hi = to_hi * (1.0 - weight * toward_hi);
    if cost_lo < cost_hi || (cost_lo == cost_hi && to_lo <= to_hi) {
        lo
    } else {
        hi
    }
}

/// Points to insert between `a` and `b` to pass `rect` along `lane`.
fn detour(a: Point, b: Point, rect: Rect, lane: f64, terminal: bool) -> SmallVec<[Point; 4]> {
    let axis = run_axis(a, b);
    let (lo, hi) = span(rect, axis);
    let (from, to) = (axis.along(a), axis.along(b));
    let outside = |v: f64| v <= lo || v >= hi;
    if !terminal && outside(from) && outside(to) {
        return smallvec![axis.point(from, lane), axis.point(to, lane)];
    }
    let (enter, exit) = if to >= from {
        (from.max(lo), to.min(hi))
    } else {
        (from.min(hi), to.max(lo))
    };
    let here = axis.across(a);
    smallvec![
        axis.point(enter, here),
        axis.point(enter, lane),
        axis.point(exit, lane),
        axis.point(exit, here),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orthogonal::{OrthogonalRouter, RouteOptions};
    use alloc::vec;
    use wayline_geom::Port;

    const OBSTACLE: Rect = Rect::new(100.0, -20.0, 140.0, 60.0);

    #[test]
    fn interior_run_shifts_onto_the_lane() {
        let a = Point::new(50.0, 20.0);
        let b = Point::new(200.0, 20.0);
        let d = detour(a, b, OBSTACLE, -20.0, false);
        assert_eq!(d.as_slice(), &[Point::new(50.0, -20.0), Point::new(200.0, -20.0)]);
    }

    #[test]
    fn terminal_run_hugs_the_obstacle() {
        let a = Point::new(50.0, 20.0);
        let b = Point::new(200.0, 20.0);
        let d = detour(a, b, OBSTACLE, 60.0, true);
        assert_eq!(
            d.as_slice(),
            &[
                Point::new(100.0, 20.0),
                Point::new(100.0, 60.0),
                Point::new(140.0, 60.0),
                Point::new(140.0, 20.0),
            ]
        );
        // Running backwards enters at the high edge.
        let d = detour(b, a, OBSTACLE, 60.0, true);
        assert_eq!(d[0], Point::new(140.0, 20.0));
        assert_eq!(d[3], Point::new(100.0, 20.0));
    }

    #[test]
    fn vertical_runs_detour_sideways() {
        let a = Point::new(120.0, -100.0);
        let b = Point::new(120.0, 100.0);
        assert_eq!(nearer_side(a, b, OBSTACLE, &[], false), 100.0);
        let d = detour(a, b, OBSTACLE, 100.0, false);
        assert_eq!(d.as_slice(), &[Point::new(100.0, -100.0), Point::new(100.0, 100.0)]);
    }

    #[test]
    fn own_detour_avoids_the_other_endpoint() {
        let router = OrthogonalRouter::default();
        // The target sits just right of the source's padded bounds, so the
        // nearer lane at x = 135 would run through it.
        let options = RouteOptions {
            source_bounds: Some(Rect::new(0.0, 0.0, 120.0, 60.0)),
            target_bounds: Some(Rect::new(140.0, -150.0, 260.0, -90.0)),
            ..RouteOptions::default()
        };
        let plan = router
            .plan(
                Point::new(60.0, 60.0),
                Point::new(140.0, -120.0),
                Port::Bottom,
                Port::Left,
                &options,
            )
            .expect("finite input");
        let mut points = vec![
            Point::new(60.0, 60.0),
            Point::new(60.0, 90.0),
            Point::new(119.0, 90.0),
            Point::new(119.0, -198.0),
            Point::new(110.0, -198.0),
            Point::new(110.0, -120.0),
            Point::new(140.0, -120.0),
        ];
        avoid_own_bounds(&mut points, &plan);
        assert_eq!(
            points,
            vec![
                Point::new(60.0, 60.0),
                Point::new(60.0, 90.0),
                Point::new(-15.0, 90.0),
                Point::new(-15.0, -198.0),
                Point::new(110.0, -198.0),
                Point::new(110.0, -120.0),
                Point::new(140.0, -120.0),
            ]
        );
    }

    #[test]
    fn blocked_near_side_falls_back_to_the_far_side() {
        let a = Point::new(120.0, -100.0);
        let b = Point::new(120.0, 100.0);
        let other = [Rect::new(80.0, -20.0, 105.0, 20.0)];
        assert_eq!(nearer_side(a, b, OBSTACLE, &other, false), 140.0);
        // When both sides are blocked the nearer one stays.
        let both = [Rect::new(80.0, -20.0, 105.0, 20.0), Rect::new(135.0, -20.0, 160.0, 20.0)];
        assert_eq!(nearer_side(a, b, OBSTACLE, &both, false), 100.0);
    }

    #[test]
    fn bias_breaks_near_ties() {
        let a = Point::new(50.0, 19.0);
        let b = Point::new(200.0, 19.0);
        // Unbiased, the top lane (39 away) beats the bottom one (41 away).
        assert_eq!(biased_side(a, b, OBSTACLE, Vec2::ZERO, 0.3), -20.0);
        // Heading down tips it to the bottom.
        assert_eq!(biased_side(a, b, OBSTACLE, Vec2::new(0.0, 1.0), 0.3), 60.0);
        // Exact ties go to the shorter raw distance, then the low side.
        let mid = Point::new(50.0, 20.0);
        assert_eq!(biased_side(mid, Point::new(200.0, 20.0), OBSTACLE, Vec2::new(1.0, 0.0), 0.3), -20.0);
    }

    #[test]
    fn first_hit_reports_the_earliest_run() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(300.0, 100.0),
        ];
        let rects = [Rect::new(100.0, 80.0, 120.0, 120.0), Rect::new(-10.0, 40.0, 10.0, 60.0)];
        assert_eq!(first_hit(&pts, &rects), Some((0, rects[1])));
        assert_eq!(first_hit(&pts[1..], &rects), Some((0, rects[0])));
        assert_eq!(first_hit(&pts, &[]), None);
    }
}
