// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line/line and line/rect intersection.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::rect::is_finite_point;

/// Cross products below this magnitude are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-4;

/// Intersection of two infinite lines, with the parameters along each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineHit {
    /// Intersection point.
    pub point: Point,
    /// Parameter along the first line: `a0 + t * (a1 - a0)`.
    pub t: f64,
    /// Parameter along the second line: `b0 + u * (b1 - b0)`.
    pub u: f64,
}

/// Intersect the lines through `a0..a1` and `b0..b1`.
///
/// Returns `None` for (near-)parallel lines. The parameters are not clamped; use
/// [`segments_cross`] to restrict the hit to the segments' interiors.
pub fn line_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<LineHit> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.cross(s);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    Some(LineHit {
        point: a0 + r * t,
        t,
        u,
    })
}

/// Intersect two segments, accepting only hits strictly inside
/// `(margin, 1 - margin)` on both.
///
/// A positive margin excludes endpoints, so segments that merely share an
/// endpoint (consecutive runs of one route, or two routes meeting at a port)
/// do not cross.
pub fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point, margin: f64) -> Option<LineHit> {
    let hit = line_intersection(a0, a1, b0, b1)?;
    let inside = |v: f64| v > margin && v < 1.0 - margin;
    (inside(hit.t) && inside(hit.u)).then_some(hit)
}

/// Liang–Barsky clip of `a..b` against the closed `rect`.
fn clip(a: Point, b: Point, rect: Rect) -> Option<(f64, f64)> {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, a.x - rect.x0),
        (d.x, rect.x1 - a.x),
        (-d.y, a.y - rect.y0),
        (d.y, rect.y1 - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// Whether the segment `a..b` passes through the interior of `rect`.
///
/// Touching or running along an edge is not an intersection, which lets detours
/// hug a padded obstacle's boundary.
pub fn segment_intersects_rect(a: Point, b: Point, rect: Rect) -> bool {
    if !is_finite_point(a) || !is_finite_point(b) {
        return false;
    }
    let Some((t0, t1)) = clip(a, b, rect) else {
        return false;
    };
    // A chord of a convex region is interior iff its midpoint is, unless it
    // lies entirely on the boundary.
    let mid = a.lerp(b, (t0 + t1) * 0.5);
    mid.x > rect.x0 && mid.x < rect.x1 && mid.y > rect.y0 && mid.y < rect.y1
}
