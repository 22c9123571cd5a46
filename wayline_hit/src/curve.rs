// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sampled nearest-point queries on Bézier connectors.
//!
//! Curved and arc connectors are single quadratic or cubic Béziers. Instead of
//! solving for the exact foot of the perpendicular, the curve is evaluated at
//! [`CURVE_SAMPLES`] evenly spaced parameters and the closest sample wins.
//! The error is bounded by the spacing between samples, which is fine for
//! pointer tolerances but not for consumers that need exact projections.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{CubicBez, ParamCurve, Point, QuadBez};

use crate::stroke::stroke_score;
use crate::{HitParams, HitScore, PreciseHitTest};

/// Number of sampling intervals used by [`nearest_on_quad`] and [`nearest_on_cubic`].
pub const CURVE_SAMPLES: usize = 50;

/// Nearest sampled point on a curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveHit {
    /// Curve parameter of the sample.
    pub t: f64,
    /// The sampled point.
    pub point: Point,
    /// Distance from the query point.
    pub distance: f64,
}

/// Closest of `samples + 1` evenly spaced samples of `curve` to `pt`.
///
/// Always returns a sample; `samples` is raised to at least 1.
pub fn nearest_sample<C: ParamCurve>(curve: &C, pt: Point, samples: usize) -> CurveHit {
    let samples = samples.max(1);
    let mut best = CurveHit {
        t: 0.0,
        point: curve.eval(0.0),
        distance: f64::INFINITY,
    };
    for i in 0..=samples {
        #[allow(
            clippy::cast_precision_loss,
            reason = "sample counts are small; precision loss is irrelevant."
        )]
        let t = i as f64 / samples as f64;
        let point = curve.eval(t);
        let distance = pt.distance(point);
        if distance < best.distance {
            best = CurveHit { t, point, distance };
        }
    }
    best
}

/// Nearest sampled point on a quadratic Bézier.
pub fn nearest_on_quad(quad: QuadBez, pt: Point) -> CurveHit {
    nearest_sample(&quad, pt, CURVE_SAMPLES)
}

/// Nearest sampled point on a cubic Bézier.
pub fn nearest_on_cubic(cubic: CubicBez, pt: Point) -> CurveHit {
    nearest_sample(&cubic, pt, CURVE_SAMPLES)
}

/// A stroked quadratic connector.
#[derive(Clone, Copy, Debug)]
pub struct StrokedQuad {
    /// Centreline.
    pub curve: QuadBez,
    /// Half of the stroke width.
    pub half_width: f64,
}

impl PreciseHitTest for StrokedQuad {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        stroke_score(nearest_on_quad(self.curve, pt).distance, self.half_width, params)
    }
}

/// A stroked cubic connector.
#[derive(Clone, Copy, Debug)]
pub struct StrokedCubic {
    /// Centreline.
    pub curve: CubicBez,
    /// Half of the stroke width.
    pub half_width: f64,
}

impl PreciseHitTest for StrokedCubic {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        stroke_score(nearest_on_cubic(self.curve, pt).distance, self.half_width, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_apex_is_found() {
        // Apex of this quad is at (50, 25), reached at t = 0.5.
        let quad = QuadBez::new((0.0, 0.0), (50.0, 50.0), (100.0, 0.0));
        let hit = nearest_on_quad(quad, Point::new(50.0, 40.0));
        assert_eq!(hit.t, 0.5);
        assert_eq!(hit.point, Point::new(50.0, 25.0));
        assert_eq!(hit.distance, 15.0);
    }

    #[test]
    fn endpoints_are_sampled() {
        let cubic = CubicBez::new((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
        let hit = nearest_on_cubic(cubic, Point::new(120.0, -10.0));
        assert_eq!(hit.t, 1.0);
        assert_eq!(hit.point, Point::new(100.0, 0.0));
    }

    #[test]
    fn sampling_is_an_upper_bound() {
        // A straight quad: exact distance to the line y = 0 is 3 everywhere.
        let quad = QuadBez::new((0.0, 0.0), (50.0, 0.0), (100.0, 0.0));
        let hit = nearest_on_quad(quad, Point::new(31.0, 3.0));
        assert!(hit.distance >= 3.0);
        assert!(hit.distance <= 3.0 + 1.0 + 1e-9, "error bounded by half the sample spacing");
    }

    #[test]
    fn stroked_curves_hit_near_the_centreline() {
        let cubic = StrokedCubic {
            curve: CubicBez::new((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0)),
            half_width: 2.0,
        };
        let apex = cubic.curve.eval(0.5);
        let params = HitParams::default();
        assert!(cubic.hit_test_local(apex, &params).is_some());
        assert!(cubic.hit_test_local(Point::new(50.0, -20.0), &params).is_none());

        let quad = StrokedQuad {
            curve: QuadBez::new((0.0, 0.0), (50.0, 50.0), (100.0, 0.0)),
            half_width: 2.0,
        };
        assert!(quad.hit_test_local(Point::new(50.0, 26.0), &params).is_some());
    }
}
