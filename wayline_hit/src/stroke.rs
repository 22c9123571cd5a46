// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-oriented hit testing for straight and polyline connectors.
//!
//! These types model a connector as a centreline plus a half-width. They do not
//! model joins, caps or dashes; a connector's pick region is simply every point
//! within `half_width + stroke_tolerance` of the centreline.

use kurbo::{Line, Point};

use crate::{HitKind, HitParams, HitScore, PreciseHitTest, distance_to_segment, nearest_on_polyline};

/// A stroked straight connector (centreline + half-width).
#[derive(Clone, Copy, Debug)]
pub struct StrokedLine {
    /// The centreline segment.
    pub line: Line,
    /// Half of the stroke width.
    pub half_width: f64,
}

impl PreciseHitTest for StrokedLine {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let dist = distance_to_segment(pt, self.line.p0, self.line.p1);
        stroke_score(dist, self.half_width, params)
    }
}

/// A stroked polyline connector, such as an orthogonal route.
#[derive(Clone, Copy, Debug)]
pub struct StrokedPolyline<'a> {
    /// Route points in order.
    pub points: &'a [Point],
    /// Half of the stroke width.
    pub half_width: f64,
}

impl StrokedPolyline<'_> {
    /// Index of the segment under `pt`, if the point hits the stroke.
    ///
    /// Used to pick which segment a segment drag should move.
    pub fn segment_at(&self, pt: Point, params: &HitParams) -> Option<usize> {
        let hit = nearest_on_polyline(self.points, pt)?;
        (hit.distance <= self.half_width + params.stroke_tolerance).then_some(hit.segment)
    }
}

impl PreciseHitTest for StrokedPolyline<'_> {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let hit = nearest_on_polyline(self.points, pt)?;
        stroke_score(hit.distance, self.half_width, params)
    }
}

pub(crate) fn stroke_score(distance: f64, half_width: f64, params: &HitParams) -> Option<HitScore> {
    (distance <= half_width + params.stroke_tolerance).then_some(HitScore {
        distance,
        kind: HitKind::Stroke,
    })
}
