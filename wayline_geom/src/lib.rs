// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayline Geom: geometry primitives for diagram connectors.
//!
//! This crate holds the small, allocation-light building blocks that the rest of
//! Wayline routes, hit-tests and renders with. Everything is expressed in
//! document coordinates using [`kurbo`] types; there is no notion of screens,
//! viewports or widgets here.
//!
//! - [`Port`] and [`Axis`]: the four anchor sides of a rectangular node, with
//!   their outward normals and the point at a given ratio along a side.
//! - Rectangle helpers ([`rect_from_xywh`], [`pad`], [`overlaps_strict`], …).
//!   Obstacles are padded on use; edges count as *outside* for every strict test,
//!   so a route may run along a padded boundary without "hitting" it.
//! - [`Segment`] and [`segments_from_points`]: the per-run view of a computed
//!   polyline, tagged with orientation and drag eligibility.
//! - [`line_intersection`], [`segments_cross`] and [`segment_intersects_rect`]:
//!   parametric intersection via cross products plus Liang–Barsky clipping.
//! - [`build_rounded_path`]: polyline to [`kurbo::BezPath`] with quadratic corner
//!   rounding, and [`build_gapped_path`] for the bridge variant.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{PathEl, Point};
//! use wayline_geom::{Port, build_rounded_path, rect_from_xywh};
//!
//! let node = rect_from_xywh(0.0, 0.0, 120.0, 60.0);
//! assert_eq!(Port::Right.anchor(node, 0.5), Point::new(120.0, 30.0));
//!
//! let path = build_rounded_path(
//!     &[Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 80.0)],
//!     8.0,
//! );
//! // Move, line up to the corner, quadratic corner, line to the end.
//! assert_eq!(path.elements().len(), 4);
//! assert!(matches!(path.elements()[2], PathEl::QuadTo(..)));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` for [`Port`] and enables `kurbo/serde`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod intersect;
mod path;
mod port;
mod rect;
mod segment;

pub use intersect::{
    LineHit, PARALLEL_EPSILON, line_intersection, segment_intersects_rect, segments_cross,
};
pub use path::{build_gapped_path, build_rounded_path, dedupe_points, simplify_polyline};
pub use port::{Axis, Port};
pub use rect::{
    DEFAULT_NODE_SIZE, is_finite_point, is_finite_rect, merge_overlapping, overlaps_strict, pad,
    rect_from_xywh, span, x_overlap, y_overlap,
};
pub use segment::{MIN_DRAGGABLE_LENGTH, Segment, segments_from_points};

/// Tolerance used when deciding whether two coordinates are aligned.
///
/// Computed orthogonal routes copy coordinates exactly, so this only matters
/// for host-supplied points (waypoints, free endpoints) that are "almost" aligned.
pub const ALIGN_EPSILON: f64 = 1.0;
