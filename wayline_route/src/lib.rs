// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayline Route: connector routing for diagram editors.
//!
//! Given node rectangles, obstacles and connection records, this crate decides
//! which side of each node a connector attaches to and computes the geometry
//! drawn between them.
//!
//! - [`ports::select_ports`] picks a source and target [`Port`] once, when a
//!   connection is created. Ports are sticky afterwards: nothing here
//!   reassigns them on its own.
//! - [`orthogonal::OrthogonalRouter`] produces axis-aligned routes that leave
//!   and enter their ports along the normal, detour around obstacles and
//!   snap to a straight line when the ports are nearly aligned.
//! - [`render::PathRenderer`] dispatches on [`LineStyle`] to straight, curved,
//!   arc, orthogonal or smart rendering.
//! - [`crossing::find_crossings`] locates crossings between orthogonal routes so
//!   one of them can be drawn with a bridge gap.
//! - [`style`] keeps per-stencil style overrides in session and saved layers.
//!
//! Every routing call is a pure function of its inputs. Bad input (non-finite
//! coordinates, missing nodes) never panics; it yields an empty
//! [`RouteResult`] or a default port pair instead.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use wayline_geom::{Port, rect_from_xywh};
//! use wayline_route::orthogonal::{OrthogonalRouter, RouteOptions};
//! use wayline_route::ports::select_ports;
//!
//! let a = rect_from_xywh(0.0, 0.0, 120.0, 60.0);
//! let b = rect_from_xywh(300.0, 0.0, 120.0, 60.0);
//! let ports = select_ports(a, b, &[]);
//! assert_eq!((ports.source, ports.target), (Port::Right, Port::Left));
//!
//! let route = OrthogonalRouter::default().route(
//!     ports.source.anchor(a, 0.5),
//!     ports.target.anchor(b, 0.5),
//!     ports.source,
//!     ports.target,
//!     &RouteOptions {
//!         source_bounds: Some(a),
//!         target_bounds: Some(b),
//!         ..RouteOptions::default()
//!     },
//! );
//! assert_eq!(route.points, [Point::new(120.0, 30.0), Point::new(300.0, 30.0)]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tracing`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: (de)serialization of connection records, nodes and styles.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use wayline_geom::{build_rounded_path, segments_from_points};
use wayline_hit::label::{LengthMetric, curve_midpoint, polyline_midpoint};
use wayline_hit::point_on_axis_segment;

pub mod crossing;
pub mod model;
pub mod orthogonal;
pub mod ports;
pub mod render;
pub mod style;

pub use model::{
    Connection, ConnectorStyle, End, Endpoint, LineStyle, LookupFn, Node, NodeLookup,
    ResolvedEndpoint,
};
pub use orthogonal::{OrthogonalRouter, RouteOptions, RouterConfig};
pub use ports::{PortPair, select_ports};
pub use render::{PathRenderer, RenderConfig, RenderRequest};
pub use wayline_geom::{Axis, Port, Segment};

/// Geometry of one drawn connector.
///
/// Fully derived from the connection and node data; recompute it rather than
/// storing it.
#[derive(Clone, Debug, Default)]
pub struct RouteResult {
    /// Drawable path.
    pub path: BezPath,
    /// Polyline the path was built from. For curves, just the two endpoints.
    pub points: Vec<Point>,
    /// One entry per polyline run. Empty for curves.
    pub segments: Vec<Segment>,
    /// Whether the route is axis-aligned and takes part in crossing detection.
    pub orthogonal: bool,
}

impl RouteResult {
    /// A result with nothing to draw.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Build the path and segments for a polyline, rounding corners by `radius`.
    pub fn from_points(points: Vec<Point>, radius: f64, orthogonal: bool) -> Self {
        Self {
            path: build_rounded_path(&points, radius),
            segments: segments_from_points(&points),
            points,
            orthogonal,
        }
    }

    /// The segment under `pt`, within `tolerance`.
    pub fn segment_at(&self, pt: Point, tolerance: f64) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| point_on_axis_segment(pt, s.start, s.end, tolerance))
    }

    /// Where a label on this connector should sit.
    ///
    /// Orthogonal routes use the halfway point by Manhattan length, single
    /// curves their parametric midpoint, other polylines the Euclidean
    /// halfway point.
    pub fn label_anchor(&self) -> Option<Point> {
        if self.orthogonal {
            return polyline_midpoint(&self.points, LengthMetric::Manhattan);
        }
        let mut segs = self.path.segments();
        if let (Some(seg), None) = (segs.next(), segs.next()) {
            return Some(curve_midpoint(&seg));
        }
        polyline_midpoint(&self.points, LengthMetric::Euclidean)
    }
}
