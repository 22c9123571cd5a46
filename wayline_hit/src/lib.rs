// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precise hit testing and nearest-point queries for connectors.
//!
//! This crate answers the geometric questions an editor asks while the user
//! points at connectors: how far is the pointer from this route, which segment
//! is under it, where on a curve is the closest point, and where should a label
//! sit. It is built on [`kurbo`] and knows nothing about routing or events.
//!
//! # Key types
//!
//! - [`HitParams`]: per-query parameters such as fill/stroke tolerances.
//! - [`HitScore`]: a small scoring record `{ distance, kind }` used for ranking
//!   candidates. Lower distance is preferred; [`HitKind`] is a coarse class.
//! - [`PreciseHitTest`]: implemented by shapes that can answer "does this point
//!   hit me?". Implementations are provided for [`Rect`] (node bodies), [`Handle`]
//!   (drag handles), and the stroke types in [`stroke`] and [`curve`].
//!
//! # Queries
//!
//! - [`distance_to_segment`] / [`nearest_on_segment`]: projection clamped to the
//!   segment.
//! - [`nearest_on_polyline`]: the same scan over every run of a route, reporting
//!   the segment index and parameter.
//! - [`point_on_axis_segment`]: tolerant test against an axis-aligned run.
//! - [`curve::nearest_on_quad`] / [`curve::nearest_on_cubic`]: nearest sample on a
//!   Bézier using a fixed 50-sample scan. This is a bounded approximation: the
//!   true closest point may fall between samples.
//! - [`label::polyline_midpoint`] and [`label::curve_midpoint`]: label anchors.
//!
//! ```rust
//! use kurbo::Point;
//! use wayline_hit::{distance_to_segment, nearest_on_polyline};
//!
//! let a = Point::new(0.0, 0.0);
//! let b = Point::new(100.0, 0.0);
//! assert_eq!(distance_to_segment(Point::new(50.0, 0.0), a, b), 0.0);
//! assert_eq!(distance_to_segment(Point::new(103.0, 4.0), a, b), 5.0);
//!
//! let route = [a, b, Point::new(100.0, 80.0)];
//! let hit = nearest_on_polyline(&route, Point::new(96.0, 40.0)).unwrap();
//! assert_eq!(hit.segment, 1);
//! assert_eq!(hit.point, Point::new(100.0, 40.0));
//! ```

#![no_std]

extern crate alloc;

use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use wayline_geom::ALIGN_EPSILON;

pub mod curve;
pub mod label;
pub mod stroke;

/// Kind of hit produced by a precise test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HitKind {
    /// Hit the interior/fill of a shape (a node body).
    Fill,
    /// Hit the stroked outline of a shape (a connector).
    Stroke,
    /// Hit a drag handle (endpoint, waypoint, segment or curve handle).
    Handle,
    /// Hit, but kind is unspecified/other.
    Other,
}

/// Parameters controlling precise hit tests.
#[derive(Clone, Copy, Debug)]
pub struct HitParams {
    /// Tolerance in document units for hits against filled regions.
    pub fill_tolerance: f64,
    /// Tolerance in document units for hits against stroked connectors.
    ///
    /// Connectors are thin; editors typically widen their pick region well
    /// beyond the drawn stroke.
    pub stroke_tolerance: f64,
    /// Prefer fill hits over stroke hits when both are possible at the same
    /// location.
    ///
    /// This is a hint for callers when combining multiple `HitScore`s; the trait
    /// itself does not enforce any policy.
    pub prefer_fill: bool,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            fill_tolerance: 0.0,
            stroke_tolerance: 0.0,
            prefer_fill: true,
        }
    }
}

/// Score returned from a precise hit.
///
/// Lower distance is considered a better (closer) hit for tie-breaking.
#[derive(Clone, Copy, Debug)]
pub struct HitScore {
    /// Geometric distance in document space.
    pub distance: f64,
    /// Classification of what was hit.
    pub kind: HitKind,
}

impl HitScore {
    /// Convenience constructor for a filled hit at distance 0.
    pub const fn filled() -> Self {
        Self {
            distance: 0.0,
            kind: HitKind::Fill,
        }
    }

    /// Compare two scores, preferring smaller distance; ties keep original order.
    pub fn cmp_distance(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Trait for precise 2D hit testing in document coordinates.
///
/// Implementors should treat the tolerances in [`HitParams`] as inclusive radii.
pub trait PreciseHitTest {
    /// Perform a precise hit test against `pt`.
    ///
    /// Returns `Some(HitScore)` when the point is considered a hit.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}

/// Node bodies: axis-aligned rectangles with an optional fill tolerance.
impl PreciseHitTest for Rect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let inflated = if params.fill_tolerance > 0.0 {
            self.inflate(params.fill_tolerance, params.fill_tolerance)
        } else {
            *self
        };
        if !inflated.contains(pt) {
            return None;
        }
        // Distance to the original rect edge; interior points are 0.
        let dx = (self.x0 - pt.x).max(pt.x - self.x1).max(0.0);
        let dy = (self.y0 - pt.y).max(pt.y - self.y1).max(0.0);
        Some(HitScore {
            distance: (dx * dx + dy * dy).sqrt(),
            kind: HitKind::Fill,
        })
    }
}

/// A circular drag handle drawn at an endpoint, waypoint, segment midpoint or
/// curve apex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Handle {
    /// Handle centre.
    pub center: Point,
    /// Drawn radius.
    pub radius: f64,
}

impl Handle {
    /// Create a handle.
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl PreciseHitTest for Handle {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let dist = pt.distance(self.center);
        if dist <= self.radius + params.fill_tolerance {
            Some(HitScore {
                distance: (dist - self.radius).max(0.0),
                kind: HitKind::Handle,
            })
        } else {
            None
        }
    }
}

/// Closest point on the segment `a..b` to `pt`, with its parameter in `[0, 1]`.
///
/// Degenerate segments report `a` with parameter 0.
pub fn nearest_on_segment(pt: Point, a: Point, b: Point) -> (Point, f64) {
    let v = b - a;
    let len2 = v.hypot2();
    let t = if len2 > 0.0 {
        ((pt - a).dot(v) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (a + v * t, t)
}

/// Distance from `pt` to the segment `a..b`.
///
/// Points beyond either end measure to the nearer endpoint.
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let (proj, _) = nearest_on_segment(pt, a, b);
    pt.distance(proj)
}

/// Nearest point on a polyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolylineHit {
    /// Index of the segment (run) containing the nearest point.
    pub segment: usize,
    /// Parameter along that segment in `[0, 1]`.
    pub t: f64,
    /// The nearest point.
    pub point: Point,
    /// Distance from the query point.
    pub distance: f64,
}

/// Nearest point on the polyline through `points`.
///
/// Returns `None` for fewer than two points. The earliest segment wins ties.
pub fn nearest_on_polyline(points: &[Point], pt: Point) -> Option<PolylineHit> {
    let mut best: Option<PolylineHit> = None;
    for (segment, pair) in points.windows(2).enumerate() {
        let (point, t) = nearest_on_segment(pt, pair[0], pair[1]);
        let distance = pt.distance(point);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(PolylineHit {
                segment,
                t,
                point,
                distance,
            });
        }
    }
    best
}

/// Whether `pt` lies within `tolerance` of the axis-aligned run `a..b`.
///
/// Runs that are not axis-aligned fall back to the Euclidean distance test.
pub fn point_on_axis_segment(pt: Point, a: Point, b: Point, tolerance: f64) -> bool {
    let within = |v: f64, lo: f64, hi: f64| v >= lo.min(hi) - tolerance && v <= lo.max(hi) + tolerance;
    if (a.y - b.y).abs() < ALIGN_EPSILON {
        (pt.y - a.y).abs() <= tolerance && within(pt.x, a.x, b.x)
    } else if (a.x - b.x).abs() < ALIGN_EPSILON {
        (pt.x - a.x).abs() <= tolerance && within(pt.y, a.y, b.y)
    } else {
        distance_to_segment(pt, a, b) <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokedLine;
    use kurbo::Line;

    #[test]
    fn rect_hit_inside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let score = r
            .hit_test_local(Point::new(5.0, 5.0), &HitParams::default())
            .expect("expected hit");
        assert_eq!(score.kind, HitKind::Fill);
        assert_eq!(score.distance, 0.0);
    }

    #[test]
    fn rect_hit_with_tolerance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let params = HitParams {
            fill_tolerance: 1.0,
            ..HitParams::default()
        };
        let score = r
            .hit_test_local(Point::new(10.5, 5.0), &params)
            .expect("expected tolerant hit");
        assert!((score.distance - 0.5).abs() < 1e-12);
        assert!(r.hit_test_local(Point::new(11.5, 5.0), &params).is_none());
    }

    #[test]
    fn handle_hits_are_handles() {
        let h = Handle::new(Point::new(10.0, 10.0), 4.0);
        let score = h
            .hit_test_local(Point::new(12.0, 10.0), &HitParams::default())
            .expect("inside the handle");
        assert_eq!(score.kind, HitKind::Handle);
        assert_eq!(score.distance, 0.0);
        assert!(
            h.hit_test_local(Point::new(20.0, 10.0), &HitParams::default())
                .is_none()
        );
    }

    #[test]
    fn distance_on_segment_is_zero() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        let on = Point::new(15.0, 20.0);
        assert!(distance_to_segment(on, a, b).abs() < 1e-9);
    }

    #[test]
    fn distance_beyond_ends_uses_nearest_endpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(-3.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Point::new(16.0, 8.0), a, b), 10.0);
        // Degenerate segment.
        assert_eq!(distance_to_segment(Point::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn polyline_reports_segment_and_parameter() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ];
        let hit = nearest_on_polyline(&pts, Point::new(90.0, 75.0)).expect("two segments");
        assert_eq!(hit.segment, 1);
        assert!((hit.t - 0.75).abs() < 1e-12);
        assert_eq!(hit.distance, 10.0);
        assert!(nearest_on_polyline(&pts[..1], Point::ZERO).is_none());
    }

    #[test]
    fn axis_segment_tolerance() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(50.0, 10.0);
        assert!(point_on_axis_segment(Point::new(25.0, 13.0), a, b, 3.0));
        assert!(!point_on_axis_segment(Point::new(25.0, 14.0), a, b, 3.0));
        assert!(point_on_axis_segment(Point::new(52.0, 10.0), a, b, 3.0));
        assert!(!point_on_axis_segment(Point::new(54.0, 10.0), a, b, 3.0));
        let v0 = Point::new(5.0, 0.0);
        let v1 = Point::new(5.0, 40.0);
        assert!(point_on_axis_segment(Point::new(7.0, 20.0), v0, v1, 2.0));
    }

    #[test]
    fn stroked_line_hit_and_miss() {
        let stroked = StrokedLine {
            line: Line::new((0.0, 0.0), (10.0, 0.0)),
            half_width: 1.0,
        };
        let params = HitParams::default();
        assert!(stroked.hit_test_local(Point::new(5.0, 0.5), &params).is_some());
        assert!(stroked.hit_test_local(Point::new(5.0, 5.0), &params).is_none());
    }
}
