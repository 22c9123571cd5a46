// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segments of a computed route.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point};

use crate::{ALIGN_EPSILON, Axis};

/// Axis-aligned runs shorter than this cannot be dragged on their own.
pub const MIN_DRAGGABLE_LENGTH: f64 = 20.0;

/// One straight run of a computed route.
///
/// Segments are derived from a route's point list every render and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Position of the run in the route, starting at 0.
    pub index: usize,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Whether the run is horizontal (constant y).
    pub horizontal: bool,
    /// Whether the run is axis-aligned and long enough to drag.
    pub draggable: bool,
}

impl Segment {
    /// Classify the run from `start` to `end`.
    pub fn new(index: usize, start: Point, end: Point) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        let horizontal = dy < ALIGN_EPSILON && dx >= dy;
        let vertical = !horizontal && dx < ALIGN_EPSILON;
        let length = start.distance(end);
        Self {
            index,
            start,
            end,
            horizontal,
            draggable: (horizontal || vertical) && length >= MIN_DRAGGABLE_LENGTH,
        }
    }

    /// Whether the run is vertical (constant x).
    pub fn is_vertical(&self) -> bool {
        !self.horizontal && (self.end.x - self.start.x).abs() < ALIGN_EPSILON
    }

    /// Axis of the run, or `None` for diagonal runs.
    pub fn axis(&self) -> Option<Axis> {
        if self.horizontal {
            Some(Axis::Horizontal)
        } else if self.is_vertical() {
            Some(Axis::Vertical)
        } else {
            None
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Halfway point; used to place segment drag handles.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// The run as a [`Line`].
    pub fn line(&self) -> Line {
        Line::new(self.start, self.end)
    }
}

/// Split a polyline into its runs.
pub fn segments_from_points(points: &[Point]) -> Vec<Segment> {
    points
        .windows(2)
        .enumerate()
        .map(|(index, pair)| Segment::new(index, pair[0], pair[1]))
        .collect()
}
