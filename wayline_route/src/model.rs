// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connection records and the node data they refer to.
//!
//! Nodes are read-only input supplied by the host every render. Connections
//! are owned by the host too; the only code in Wayline that writes to them is
//! an explicit port change ([`Connection::set_ports`],
//! [`Connection::reselect_ports`]) and the drag sessions in `wayline_drag`.

use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use wayline_geom::{DEFAULT_NODE_SIZE, Port, is_finite_rect, rect_from_xywh};

use crate::ports::{PortPair, select_ports};

/// A rectangular diagram node as seen by the router.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<K> {
    /// Host identifier.
    pub id: K,
    /// Top-left corner in document coordinates.
    pub origin: Point,
    /// Resolved size; `None` falls back to [`DEFAULT_NODE_SIZE`].
    pub size: Option<Size>,
}

impl<K> Node<K> {
    /// Create a node at `origin` with an optional size.
    pub fn new(id: K, origin: impl Into<Point>, size: Option<Size>) -> Self {
        Self {
            id,
            origin: origin.into(),
            size,
        }
    }

    /// Bounds of the node, using the fallback size when none was resolved.
    pub fn bounds(&self) -> Rect {
        let size = self.size.unwrap_or(DEFAULT_NODE_SIZE);
        rect_from_xywh(self.origin.x, self.origin.y, size.width, size.height)
    }
}

/// Source of node bounds by id.
///
/// Implemented for slices of [`Node`], for `hashbrown` maps from id to bounds,
/// and for any `Fn(&K) -> Option<Rect>` through [`LookupFn`].
pub trait NodeLookup<K> {
    /// Bounds of the node with `id`, or `None` when it does not exist.
    fn bounds(&self, id: &K) -> Option<Rect>;
}

impl<K: PartialEq> NodeLookup<K> for [Node<K>] {
    fn bounds(&self, id: &K) -> Option<Rect> {
        self.iter().find(|n| n.id == *id).map(Node::bounds)
    }
}

impl<K: Eq + Hash, S: BuildHasher> NodeLookup<K> for HashMap<K, Rect, S> {
    fn bounds(&self, id: &K) -> Option<Rect> {
        self.get(id).copied()
    }
}

/// Adapter turning a closure into a [`NodeLookup`].
///
/// Useful when node sizes come from a catalog the host resolves lazily.
#[derive(Clone, Copy, Debug)]
pub struct LookupFn<F>(pub F);

impl<K, F: Fn(&K) -> Option<Rect>> NodeLookup<K> for LookupFn<F> {
    fn bounds(&self, id: &K) -> Option<Rect> {
        (self.0)(id)
    }
}

/// One end of a connection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Endpoint<K> {
    /// Anchored to a side of a node.
    Attached {
        /// Node the endpoint is attached to.
        node: K,
        /// Side of the node; sticky once assigned.
        port: Port,
        /// Position along the side, `0.5` being its centre.
        ratio: f64,
    },
    /// Free-floating at a literal document position.
    Free(Point),
}

impl<K> Endpoint<K> {
    /// Attach to the centre of `port` on `node`.
    pub fn attached(node: K, port: Port) -> Self {
        Self::Attached {
            node,
            port,
            ratio: 0.5,
        }
    }

    /// A free endpoint at `position`.
    pub fn free(position: impl Into<Point>) -> Self {
        Self::Free(position.into())
    }

    /// The node this endpoint is attached to, if any.
    pub fn node(&self) -> Option<&K> {
        match self {
            Self::Attached { node, .. } => Some(node),
            Self::Free(_) => None,
        }
    }

    /// The port this endpoint is attached through, if any.
    pub fn port(&self) -> Option<Port> {
        match self {
            Self::Attached { port, .. } => Some(*port),
            Self::Free(_) => None,
        }
    }

    /// Resolve the endpoint against current node bounds.
    ///
    /// Returns `None` when the endpoint is attached to a node that `lookup`
    /// does not know about, or whose bounds are not finite.
    pub fn resolve<L: NodeLookup<K> + ?Sized>(&self, lookup: &L) -> Option<ResolvedEndpoint> {
        match self {
            Self::Attached { node, port, ratio } => {
                let bounds = lookup.bounds(node).filter(|b| is_finite_rect(*b))?;
                Some(ResolvedEndpoint {
                    point: port.anchor(bounds, *ratio),
                    port: Some(*port),
                    bounds: Some(bounds),
                })
            }
            Self::Free(position) => Some(ResolvedEndpoint {
                point: *position,
                port: None,
                bounds: None,
            }),
        }
    }
}

/// An endpoint with its position computed for the current render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedEndpoint {
    /// Document position of the endpoint.
    pub point: Point,
    /// Port, for attached endpoints.
    pub port: Option<Port>,
    /// Bounds of the attached node.
    pub bounds: Option<Rect>,
}

/// Which end of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum End {
    /// The source end.
    Source,
    /// The target end.
    Target,
}

/// How a connection is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum LineStyle {
    /// A straight line, or a polyline through the waypoints.
    Straight,
    /// A Bézier leaving and entering along the port normals.
    Curved,
    /// A symmetric bulging cubic.
    Arc,
    /// Axis-aligned runs with rounded corners.
    #[default]
    Orthogonal,
    /// Straight or curved when the direct line is clear, orthogonal otherwise.
    Smart,
}

/// Corner rounding radius used when a style does not specify one.
pub const DEFAULT_CORNER_RADIUS: f64 = 8.0;

/// Per-connection drawing options that affect geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ConnectorStyle {
    /// Requested corner radius for orthogonal routes.
    pub corner_radius: f64,
    /// Draw corners sharp regardless of `corner_radius`.
    pub sharp: bool,
    /// Stroke width, used to size the pick region.
    pub stroke_width: f64,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            corner_radius: DEFAULT_CORNER_RADIUS,
            sharp: false,
            stroke_width: 2.0,
        }
    }
}

/// A connector between two endpoints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection<K> {
    /// Host identifier.
    pub id: K,
    /// Where the connector starts.
    pub source: Endpoint<K>,
    /// Where the connector ends.
    pub target: Endpoint<K>,
    /// User-placed points the route passes through, ordered start to end.
    #[cfg_attr(feature = "serde", serde(default))]
    pub waypoints: Vec<Point>,
    /// Drawing style.
    #[cfg_attr(feature = "serde", serde(default))]
    pub line_style: LineStyle,
    /// Signed apex offset for curved and arc styles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub curve_amount: Option<f64>,
    /// Geometry-affecting style options.
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: ConnectorStyle,
}

impl<K> Connection<K> {
    /// A connection with no waypoints and the default style.
    pub fn new(id: K, source: Endpoint<K>, target: Endpoint<K>) -> Self {
        Self {
            id,
            source,
            target,
            waypoints: Vec::new(),
            line_style: LineStyle::default(),
            curve_amount: None,
            style: ConnectorStyle::default(),
        }
    }

    /// Set the line style.
    #[must_use]
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Set the waypoints.
    #[must_use]
    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// The endpoint at `end`.
    pub fn endpoint(&self, end: End) -> &Endpoint<K> {
        match end {
            End::Source => &self.source,
            End::Target => &self.target,
        }
    }

    /// Mutable access to the endpoint at `end`.
    pub fn endpoint_mut(&mut self, end: End) -> &mut Endpoint<K> {
        match end {
            End::Source => &mut self.source,
            End::Target => &mut self.target,
        }
    }

    /// Assign ports to the attached endpoints. Free endpoints are unaffected.
    pub fn set_ports(&mut self, source: Port, target: Port) {
        if let Endpoint::Attached { port, .. } = &mut self.source {
            *port = source;
        }
        if let Endpoint::Attached { port, .. } = &mut self.target {
            *port = target;
        }
    }
}

impl<K: PartialEq> Connection<K> {
    /// Create a connection between two nodes, choosing ports once.
    ///
    /// This is the only place ports are picked automatically; afterwards they
    /// stay put until [`Connection::reselect_ports`] or a drag changes them.
    /// Nodes missing from `nodes` fall back to [`PortPair::default`].
    pub fn connect(id: K, source: K, target: K, nodes: &[Node<K>]) -> Self {
        let ports = match (nodes.bounds(&source), nodes.bounds(&target)) {
            (Some(s), Some(t)) => {
                let obstacles: Vec<Rect> = nodes
                    .iter()
                    .filter(|n| n.id != source && n.id != target)
                    .map(Node::bounds)
                    .collect();
                select_ports(s, t, &obstacles)
            }
            _ => PortPair::default(),
        };
        Self::new(
            id,
            Endpoint::attached(source, ports.source),
            Endpoint::attached(target, ports.target),
        )
    }

    /// Whether either end is attached to `node`.
    pub fn involves(&self, node: &K) -> bool {
        self.source.node() == Some(node) || self.target.node() == Some(node)
    }

    /// Re-run port selection for the current layout and store the result.
    ///
    /// Only meaningful when both ends are attached; returns the new pair, or
    /// `None` (leaving the connection untouched) otherwise.
    pub fn reselect_ports(&mut self, nodes: &[Node<K>]) -> Option<PortPair> {
        let source = nodes.bounds(self.source.node()?)?;
        let target = nodes.bounds(self.target.node()?)?;
        let obstacles = obstacles_for(self, nodes);
        let ports = select_ports(source, target, &obstacles);
        self.set_ports(ports.source, ports.target);
        Some(ports)
    }
}

/// Bounds of every node except the connection's own source and target.
///
/// The rects are returned unpadded; the router pads them on use.
pub fn obstacles_for<K: PartialEq>(connection: &Connection<K>, nodes: &[Node<K>]) -> Vec<Rect> {
    nodes
        .iter()
        .filter(|n| !connection.involves(&n.id))
        .map(Node::bounds)
        .filter(|b| is_finite_rect(*b))
        .collect()
}
