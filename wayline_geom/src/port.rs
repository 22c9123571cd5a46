// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor sides of rectangular nodes.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

/// Orientation of a run or a port's stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Runs along x (constant y).
    Horizontal,
    /// Runs along y (constant x).
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// The coordinate that varies along this axis.
    #[inline]
    pub fn along(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    /// The coordinate that stays constant along this axis.
    #[inline]
    pub fn across(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.y,
            Self::Vertical => p.x,
        }
    }

    /// Build a point from an `along` and an `across` coordinate.
    #[inline]
    pub fn point(self, along: f64, across: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(along, across),
            Self::Vertical => Point::new(across, along),
        }
    }
}

/// One of the four sides of a node where a connector may attach.
///
/// Ports are sticky: the router only ever reads them. Changing a port is an
/// explicit user action on the connection record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Port {
    /// The top side; the normal points toward negative y.
    Top,
    /// The bottom side; the normal points toward positive y.
    Bottom,
    /// The left side; the normal points toward negative x.
    Left,
    /// The right side; the normal points toward positive x.
    Right,
}

impl Port {
    /// All ports in clockwise order starting at the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Outward unit normal of the side.
    pub const fn normal(self) -> Vec2 {
        match self {
            Self::Top => Vec2::new(0.0, -1.0),
            Self::Bottom => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Axis of the stub leaving this port: horizontal for left/right.
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// Whether the stub leaving this port runs horizontally.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// The side facing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Signed distance of `v` along the outward normal.
    #[inline]
    pub fn along(self, v: Vec2) -> f64 {
        v.dot(self.normal())
    }

    /// Point on this side of `rect` at `ratio` along it.
    ///
    /// The ratio runs left to right for top/bottom and top to bottom for
    /// left/right; it is clamped to `[0, 1]` and `0.5` is the side's centre.
    pub fn anchor(self, rect: Rect, ratio: f64) -> Point {
        let t = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.5
        };
        match self {
            Self::Top => Point::new(rect.x0 + rect.width() * t, rect.y0),
            Self::Bottom => Point::new(rect.x0 + rect.width() * t, rect.y1),
            Self::Left => Point::new(rect.x0, rect.y0 + rect.height() * t),
            Self::Right => Point::new(rect.x1, rect.y0 + rect.height() * t),
        }
    }

    /// Inverse of [`Port::anchor`]: the ratio along this side closest to `point`.
    pub fn ratio_of(self, rect: Rect, point: Point) -> f64 {
        let (start, extent, coord) = match self {
            Self::Top | Self::Bottom => (rect.x0, rect.width(), point.x),
            Self::Left | Self::Right => (rect.y0, rect.height(), point.y),
        };
        if extent <= 0.0 {
            return 0.5;
        }
        ((coord - start) / extent).clamp(0.0, 1.0)
    }

    /// Distance from `point` to this side of `rect` (treated as a segment).
    pub fn distance_to_side(self, rect: Rect, point: Point) -> f64 {
        let on_side = self.anchor(rect, self.ratio_of(rect, point));
        point.distance(on_side)
    }

    /// Port on the dominant axis pointing from `from` toward `to`.
    ///
    /// Used for free-floating endpoints, which have no side of their own.
    /// Horizontal wins ties.
    pub fn toward(from: Point, to: Point) -> Self {
        let d = to - from;
        if d.x.abs() >= d.y.abs() {
            if d.x >= 0.0 { Self::Right } else { Self::Left }
        } else if d.y >= 0.0 {
            Self::Bottom
        } else {
            Self::Top
        }
    }

    /// Whether a connector leaving `self` at `from` and entering `other` at `to`
    /// runs straight from one port into the other.
    pub fn faces(self, other: Self, from: Point, to: Point) -> bool {
        other == self.opposite() && self.along(to - from) > 0.0
    }
}
