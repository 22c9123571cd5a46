// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline cleanup and rounded path assembly.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Vec2};

/// Points closer than this are considered the same point.
const DUPLICATE_EPSILON: f64 = 1e-3;

/// Corners whose rounding radius would be at most this are drawn sharp.
const MIN_ROUNDING: f64 = 1.0;

/// Drop consecutive duplicate points.
pub fn dedupe_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_some_and(|last| last.distance(p) < DUPLICATE_EPSILON) {
            continue;
        }
        out.push(p);
    }
    out
}

fn collinear(d_in: Vec2, d_out: Vec2) -> bool {
    let scale = d_in.hypot() * d_out.hypot();
    scale == 0.0 || d_in.cross(d_out).abs() <= 1e-9 * scale
}

/// Remove duplicates and collinear interior points, in either direction.
///
/// A point where the polyline doubles back on itself is also removed; the
/// remaining run still covers the same line.
pub fn simplify_polyline(points: &[Point]) -> Vec<Point> {
    collapse(points, true)
}

fn collapse(points: &[Point], drop_reversals: bool) -> Vec<Point> {
    let deduped = dedupe_points(points);
    let mut out: Vec<Point> = Vec::with_capacity(deduped.len());
    for p in deduped {
        while out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            let (d_in, d_out) = (b - a, p - b);
            if collinear(d_in, d_out) && (drop_reversals || d_in.dot(d_out) > 0.0) {
                out.pop();
            } else {
                break;
            }
        }
        if out.last().is_some_and(|last| last.distance(p) < DUPLICATE_EPSILON) {
            continue;
        }
        out.push(p);
    }
    out
}

/// Join `points` with straight runs, rounding each interior corner.
///
/// Each corner becomes a quadratic curve whose control point is the corner
/// itself and whose radius is `min(radius, len_in / 2, len_out / 2)`, so
/// neighbouring corners never overlap. A radius that works out to 1 unit or
/// less draws a plain corner; pass `0.0` for sharp corners. Collinear points
/// are elided, so two points (or three in a line) yield a single line command.
pub fn build_rounded_path(points: &[Point], radius: f64) -> BezPath {
    build_gapped_path(points, radius, &[], 0.0)
}

/// Like [`build_rounded_path`], but leaves a gap of `gap` units centred on each
/// point in `gaps` that lies on a straight run.
///
/// Used to draw bridges where another connector crosses this one. Gap points
/// inside a rounded corner, or within half a gap of its ends, are ignored.
pub fn build_gapped_path(points: &[Point], radius: f64, gaps: &[Point], gap: f64) -> BezPath {
    let pts = collapse(points, false);
    let mut path = BezPath::new();
    let Some(&first) = pts.first() else {
        return path;
    };
    path.move_to(first);
    if pts.len() == 1 {
        return path;
    }

    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let half_gap = if gap.is_finite() { gap.max(0.0) * 0.5 } else { 0.0 };
    let mut cursor = first;
    for i in 1..pts.len() - 1 {
        let (prev, corner, next) = (pts[i - 1], pts[i], pts[i + 1]);
        let d_in = corner - prev;
        let d_out = next - corner;
        let (len_in, len_out) = (d_in.hypot(), d_out.hypot());
        let r = radius.min(len_in * 0.5).min(len_out * 0.5);
        if r <= MIN_ROUNDING || d_in.dot(d_out) < 0.0 {
            run_to(&mut path, cursor, corner, gaps, half_gap);
            cursor = corner;
            continue;
        }
        let enter = corner - d_in * (r / len_in);
        let exit = corner + d_out * (r / len_out);
        run_to(&mut path, cursor, enter, gaps, half_gap);
        path.quad_to(corner, exit);
        cursor = exit;
    }
    run_to(&mut path, cursor, pts[pts.len() - 1], gaps, half_gap);
    path
}

/// Emit a straight run from `from` to `to`, breaking it around any gap point
/// that lies on it.
fn run_to(path: &mut BezPath, from: Point, to: Point, gaps: &[Point], half_gap: f64) {
    let d = to - from;
    let len = d.hypot();
    if half_gap <= 0.0 || gaps.is_empty() || len <= 2.0 * half_gap {
        path.line_to(to);
        return;
    }
    let dir = d / len;
    let mut along: Vec<f64> = gaps
        .iter()
        .filter_map(|g| {
            let v = *g - from;
            let s = v.dot(dir);
            let off = v.cross(dir).abs();
            (off < 0.5 && s >= half_gap && s <= len - half_gap).then_some(s)
        })
        .collect();
    along.sort_by(f64::total_cmp);
    let mut last = f64::NEG_INFINITY;
    for s in along {
        // Gaps closer together than one gap width merge into the earlier one.
        if s - last < 2.0 * half_gap {
            continue;
        }
        path.line_to(from + dir * (s - half_gap));
        path.move_to(from + dir * (s + half_gap));
        last = s;
    }
    path.line_to(to);
}
