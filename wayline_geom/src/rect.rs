// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers for node bounds and obstacles.

use kurbo::{Point, Rect, Size};

use crate::Axis;

/// Size used for nodes whose size the host has not resolved.
pub const DEFAULT_NODE_SIZE: Size = Size::new(120.0, 60.0);

/// Build a rect from origin and size; negative extents collapse to zero.
#[inline]
pub fn rect_from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width.max(0.0), y + height.max(0.0))
}

/// Grow `rect` by `amount` on every side.
#[inline]
pub fn pad(rect: Rect, amount: f64) -> Rect {
    rect.inflate(amount, amount)
}

/// Whether both coordinates are finite.
#[inline]
pub fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Whether all four edges are finite.
#[inline]
pub fn is_finite_rect(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

/// Whether the open x-ranges of two rects overlap.
#[inline]
pub fn x_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1
}

/// Whether the open y-ranges of two rects overlap.
#[inline]
pub fn y_overlap(a: Rect, b: Rect) -> bool {
    a.y0 < b.y1 && b.y0 < a.y1
}

/// Whether the interiors of two rects overlap. Shared edges do not count.
#[inline]
pub fn overlaps_strict(a: Rect, b: Rect) -> bool {
    x_overlap(a, b) && y_overlap(a, b)
}

/// `(lo, hi)` extent of `rect` along `axis`.
#[inline]
pub fn span(rect: Rect, axis: Axis) -> (f64, f64) {
    match axis {
        Axis::Horizontal => (rect.x0, rect.x1),
        Axis::Vertical => (rect.y0, rect.y1),
    }
}

/// Grow `seed` by every rect in `others` that overlaps it, transitively.
///
/// Used to treat clusters of touching obstacles as one so a detour around the
/// cluster does not immediately run into a neighbour.
pub fn merge_overlapping(seed: Rect, others: &[Rect]) -> Rect {
    let mut merged = seed;
    loop {
        let mut grown = false;
        for other in others {
            if overlaps_strict(merged, *other) && merged.union(*other) != merged {
                merged = merged.union(*other);
                grown = true;
            }
        }
        if !grown {
            return merged;
        }
    }
}
