// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label anchors along connectors.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{ParamCurve, Point};

/// How run lengths are measured when walking a polyline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthMetric {
    /// Straight-line length of each run.
    #[default]
    Euclidean,
    /// `|dx| + |dy|` per run; used for orthogonal routes so that a label sits
    /// halfway along the route as drawn on the grid.
    Manhattan,
}

impl LengthMetric {
    fn length(self, a: Point, b: Point) -> f64 {
        match self {
            Self::Euclidean => a.distance(b),
            Self::Manhattan => (b.x - a.x).abs() + (b.y - a.y).abs(),
        }
    }
}

/// Total length of the polyline under `metric`.
pub fn polyline_length(points: &[Point], metric: LengthMetric) -> f64 {
    points.windows(2).map(|w| metric.length(w[0], w[1])).sum()
}

/// Point at `distance` along the polyline, clamped to its ends.
///
/// Returns `None` for an empty polyline.
pub fn point_at_length(points: &[Point], distance: f64, metric: LengthMetric) -> Option<Point> {
    let first = *points.first()?;
    let mut remaining = distance.max(0.0);
    for w in points.windows(2) {
        let len = metric.length(w[0], w[1]);
        if len > 0.0 && remaining <= len {
            return Some(w[0].lerp(w[1], remaining / len));
        }
        remaining -= len;
    }
    Some(points.last().copied().unwrap_or(first))
}

/// Halfway point of the polyline by cumulative length.
pub fn polyline_midpoint(points: &[Point], metric: LengthMetric) -> Option<Point> {
    point_at_length(points, polyline_length(points, metric) * 0.5, metric)
}

/// Label anchor for a single-curve connector: the curve at `t = 0.5`.
pub fn curve_midpoint<C: ParamCurve>(curve: &C) -> Point {
    curve.eval(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::QuadBez;

    #[test]
    fn midpoint_walks_cumulative_length() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
        ];
        // 150 long; halfway is 75 along the first run.
        assert_eq!(
            polyline_midpoint(&pts, LengthMetric::Euclidean),
            Some(Point::new(75.0, 0.0))
        );
    }

    #[test]
    fn manhattan_differs_on_diagonals() {
        let pts = [Point::new(0.0, 0.0), Point::new(30.0, 40.0), Point::new(130.0, 40.0)];
        assert_eq!(polyline_length(&pts, LengthMetric::Euclidean), 150.0);
        assert_eq!(polyline_length(&pts, LengthMetric::Manhattan), 170.0);
        assert_eq!(
            polyline_midpoint(&pts, LengthMetric::Manhattan),
            Some(Point::new(45.0, 40.0))
        );
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(polyline_midpoint(&[], LengthMetric::Euclidean), None);
        let single = [Point::new(3.0, 4.0)];
        assert_eq!(
            polyline_midpoint(&single, LengthMetric::Euclidean),
            Some(Point::new(3.0, 4.0))
        );
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        assert_eq!(
            point_at_length(&pts, 99.0, LengthMetric::Euclidean),
            Some(Point::new(10.0, 0.0))
        );
    }

    #[test]
    fn curve_midpoint_is_half_parameter() {
        let quad = QuadBez::new((0.0, 0.0), (50.0, 50.0), (100.0, 0.0));
        assert_eq!(curve_midpoint(&quad), Point::new(50.0, 25.0));
    }
}
