// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approach correction and backtrack removal.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use wayline_geom::{Axis, Port, simplify_polyline};

use super::Plan;

/// Make both ends leave their ports along the normal for at least one stub.
pub(super) fn correct_approach(points: &mut Vec<Point>, plan: &Plan<'_>) {
    correct_start(points, plan.source_port, plan);
    points.reverse();
    correct_start(points, plan.target_port, plan);
    points.reverse();
}

fn correct_start(points: &mut Vec<Point>, port: Port, plan: &Plan<'_>) {
    if points.len() < 2 {
        return;
    }
    let (eps, stub) = (plan.config.align_epsilon, plan.config.min_stub);
    let axis = port.axis();
    let s = points[0];
    let p = points[1];
    let stub_point = s + port.normal() * stub;

    if (axis.across(p) - axis.across(s)).abs() < eps {
        let along = port.along(p - s);
        if along >= stub - eps {
            return;
        }
        if along <= 0.0 {
            // Leaves backwards: go out along the normal instead and turn onto
            // the line of the run after `p`.
            if let Some(&q) = points.get(2) {
                points[1] = stub_point;
                points.insert(2, axis.point(axis.along(stub_point), axis.across(q)));
            }
            return;
        }
        // Short stub followed by a perpendicular leg: push both outward. The leg
        // must not end at the other endpoint, which cannot move, and the moved
        // legs must stay clear.
        if points.len() > 3 {
            let (q, r) = (points[2], points[3]);
            if (axis.along(q) - axis.along(p)).abs() < eps {
                let out = axis.along(stub_point);
                let (p2, q2) = (axis.point(out, axis.across(p)), axis.point(out, axis.across(q)));
                // The run after the leg may end at the other endpoint, inside
                // its padded bounds.
                let onward_clear = if points.len() == 4 {
                    plan.obstacle_clear(q2, r)
                } else {
                    plan.leg_clear(q2, r)
                };
                if plan.leg_clear(p2, q2) && onward_clear {
                    points[1] = p2;
                    points[2] = q2;
                } else {
                    tracing::trace!("short stub kept; pushing it out would hit an obstacle");
                }
            }
        }
        return;
    }

    // Off axis: leave along the normal, then turn onto the next point's line.
    let elbow = axis.point(axis.along(stub_point), axis.across(p));
    points.insert(1, stub_point);
    points.insert(2, elbow);
}

/// Pull U-turns that overshoot the target's coordinate back onto it, when the
/// shortened legs stay clear.
///
/// Only legs strictly between the first and last interior points are moved so
/// the stubs at both ends are left alone.
pub(super) fn remove_backtracks(points: &mut Vec<Point>, plan: &Plan<'_>) {
    let eps = plan.config.align_epsilon;
    let mut i = 2;
    while i + 4 <= points.len() {
        let (a, b, c, d) = (points[i - 1], points[i], points[i + 1], points[i + 2]);
        if let Some((b2, c2)) = pull_back([a, b, c, d], plan.target, eps)
            && plan.leg_clear(a, b2)
            && plan.leg_clear(b2, c2)
            && plan.leg_clear(c2, d)
        {
            points[i] = b2;
            points[i + 1] = c2;
            *points = simplify_polyline(points);
        }
        i += 1;
    }
}

/// For a U `a -> b -> c -> d` whose base `b -> c` lies beyond `target` along
/// the legs' axis while `a` and `d` do not, the base moved onto the target's
/// coordinate.
fn pull_back([a, b, c, d]: [Point; 4], target: Point, eps: f64) -> Option<(Point, Point)> {
    let axis = if (a.x - b.x).abs() < eps {
        Axis::Vertical
    } else if (a.y - b.y).abs() < eps {
        Axis::Horizontal
    } else {
        return None;
    };
    let parallel_out = (axis.across(c) - axis.across(d)).abs() < eps;
    let flat_base = (axis.along(b) - axis.along(c)).abs() < eps;
    if !parallel_out || !flat_base {
        return None;
    }
    let leg_in = axis.along(b) - axis.along(a);
    let leg_out = axis.along(d) - axis.along(c);
    if leg_in * leg_out >= 0.0 {
        return None;
    }

    let goal = axis.along(target);
    let sign = leg_in.signum();
    let beyond = |p: Point| (axis.along(p) - goal) * sign > eps;
    if !beyond(b) || beyond(a) || beyond(d) {
        return None;
    }
    Some((
        axis.point(goal, axis.across(b)),
        axis.point(goal, axis.across(c)),
    ))
}
