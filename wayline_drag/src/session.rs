// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag session state machine.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use wayline_geom::{Axis, Port};
use wayline_route::{Connection, End, Endpoint, Node, RouteResult};

use crate::error::{DragError, Result};
use crate::snap::{nearest_anchor, snap_to_grid};

/// What is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    /// One end of the connector.
    Endpoint(End),
    /// The waypoint at this index.
    Waypoint(usize),
    /// The route segment at this index.
    Segment(usize),
    /// The curve handle of a curved or arc connector.
    CurveAmount,
}

/// Tunables for [`DragSession`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// Grid that dragged points snap to; zero disables snapping.
    pub grid_size: f64,
    /// How close a released endpoint must be to a node side to attach to it.
    pub capture_radius: f64,
    /// Largest curve amount as a fraction of the endpoint distance.
    pub curve_clamp: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            capture_radius: 25.0,
            curve_clamp: 0.75,
        }
    }
}

/// Coarse state of a [`DragSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    /// Nothing is being dragged.
    Idle,
    /// A drag is in progress.
    Dragging,
}

/// What [`DragSession::commit`] did to the connection.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome<K> {
    /// Waypoints or the curve amount keep their last dragged value.
    Updated,
    /// The endpoint attached to a node side.
    Attached {
        /// Which end moved.
        end: End,
        /// Node it attached to.
        node: K,
        /// Side of the node.
        port: Port,
    },
    /// The endpoint was released away from every node and is now free.
    Detached {
        /// Which end moved.
        end: End,
        /// Where it was released.
        position: Point,
    },
}

/// State captured when a drag begins, used to cancel it.
#[derive(Clone, Debug)]
enum Snapshot<K> {
    Endpoint(Endpoint<K>),
    Waypoints(Vec<Point>),
    CurveAmount(Option<f64>),
}

#[derive(Clone, Debug)]
struct ActiveDrag<K> {
    kind: DragKind,
    connection: K,
    start_pointer: Point,
    snapshot: Snapshot<K>,
    /// Route points at `begin`, for segment and curve drags.
    route: Vec<Point>,
    /// Where the dragged endpoint currently is.
    preview: Option<Point>,
}

/// Drives one drag gesture at a time over a connection record.
///
/// The session is independent of any input system: the host calls
/// [`begin`](Self::begin) on pointer down over a handle,
/// [`update`](Self::update) on every move, and [`commit`](Self::commit) or
/// [`cancel`](Self::cancel) on release or escape.
///
/// Waypoint, segment and curve drags write to the connection as they go, so the
/// next render already shows the new shape. An endpoint drag only moves a
/// [`preview`](Self::preview) until it is committed, because attaching depends
/// on where it is released.
#[derive(Clone, Debug)]
pub struct DragSession<K> {
    /// Tunables.
    pub config: DragConfig,
    active: Option<ActiveDrag<K>>,
}

impl<K> Default for DragSession<K> {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl<K> DragSession<K> {
    /// An idle session.
    pub const fn new(config: DragConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Whether a drag is in progress.
    pub fn state(&self) -> DragState {
        if self.active.is_some() {
            DragState::Dragging
        } else {
            DragState::Idle
        }
    }

    /// What is being dragged, if anything.
    pub fn kind(&self) -> Option<DragKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    /// Current position of a dragged endpoint.
    pub fn preview(&self) -> Option<Point> {
        self.active.as_ref().and_then(|a| a.preview)
    }
}

impl<K: Clone + PartialEq> DragSession<K> {
    /// Start dragging `kind` on `connection`, whose current geometry is `route`.
    ///
    /// Fails if a drag is already in progress, if the waypoint does not exist,
    /// or if the segment is missing or not draggable.
    pub fn begin(
        &mut self,
        connection: &Connection<K>,
        route: &RouteResult,
        kind: DragKind,
        pointer: Point,
    ) -> Result<()> {
        if self.active.is_some() {
            return Err(DragError::AlreadyActive);
        }
        let (snapshot, preview) = match kind {
            DragKind::Endpoint(end) => {
                let at = match end {
                    End::Source => route.points.first(),
                    End::Target => route.points.last(),
                };
                (
                    Snapshot::Endpoint(connection.endpoint(end).clone()),
                    Some(at.copied().unwrap_or(pointer)),
                )
            }
            DragKind::Waypoint(index) => {
                let len = connection.waypoints.len();
                if index >= len {
                    return Err(DragError::WaypointOutOfRange { index, len });
                }
                (Snapshot::Waypoints(connection.waypoints.clone()), None)
            }
            DragKind::Segment(index) => {
                let segment = route
                    .segments
                    .get(index)
                    .ok_or(DragError::NoSuchSegment { index })?;
                if !segment.draggable {
                    return Err(DragError::SegmentNotDraggable { index });
                }
                (Snapshot::Waypoints(connection.waypoints.clone()), None)
            }
            DragKind::CurveAmount => {
                if route.points.len() < 2 {
                    return Err(DragError::EmptyRoute);
                }
                (Snapshot::CurveAmount(connection.curve_amount), None)
            }
        };
        tracing::trace!(?kind, ?pointer, "drag started");
        self.active = Some(ActiveDrag {
            kind,
            connection: connection.id.clone(),
            start_pointer: pointer,
            snapshot,
            route: route.points.clone(),
            preview,
        });
        Ok(())
    }

    /// Follow the pointer.
    pub fn update(&mut self, connection: &mut Connection<K>, pointer: Point) -> Result<()> {
        let config = self.config;
        let active = self.active_for(connection)?;
        let delta = pointer - active.start_pointer;
        match active.kind {
            DragKind::Endpoint(_) => {
                active.preview = Some(snap_to_grid(pointer, config.grid_size));
            }
            DragKind::Waypoint(index) => {
                if let Snapshot::Waypoints(original) = &active.snapshot
                    && let (Some(from), Some(w)) = (original.get(index), connection.waypoints.get_mut(index))
                {
                    *w = snap_to_grid(*from + delta, config.grid_size);
                }
            }
            DragKind::Segment(index) => {
                connection.waypoints = dragged_segment(&active.route, index, delta, config.grid_size);
            }
            DragKind::CurveAmount => {
                let (s, t) = (active.route[0], active.route[active.route.len() - 1]);
                connection.curve_amount = Some(curve_amount_at(s, t, pointer, config.curve_clamp));
            }
        }
        tracing::trace!(?pointer, "drag updated");
        Ok(())
    }

    /// Finish the drag.
    ///
    /// A dragged endpoint attaches to the nearest side of a node in `nodes`
    /// within [`DragConfig::capture_radius`] of its last position and detaches
    /// to that position otherwise. Other drags keep their last value.
    pub fn commit(&mut self, connection: &mut Connection<K>, nodes: &[Node<K>]) -> Result<DragOutcome<K>> {
        let capture_radius = self.config.capture_radius;
        let active = self.active_for(connection)?;
        let outcome = match active.kind {
            DragKind::Endpoint(end) => {
                let position = active.preview.unwrap_or(active.start_pointer);
                match nearest_anchor(nodes, position, capture_radius) {
                    Some(anchor) => {
                        *connection.endpoint_mut(end) = Endpoint::Attached {
                            node: anchor.node.clone(),
                            port: anchor.port,
                            ratio: anchor.ratio,
                        };
                        DragOutcome::Attached {
                            end,
                            node: anchor.node,
                            port: anchor.port,
                        }
                    }
                    None => {
                        *connection.endpoint_mut(end) = Endpoint::Free(position);
                        DragOutcome::Detached { end, position }
                    }
                }
            }
            DragKind::Waypoint(_) | DragKind::Segment(_) | DragKind::CurveAmount => DragOutcome::Updated,
        };
        tracing::debug!(kind = ?active.kind, "drag committed");
        self.active = None;
        Ok(outcome)
    }

    /// Abandon the drag and restore what it changed.
    pub fn cancel(&mut self, connection: &mut Connection<K>) -> Result<()> {
        self.active_for(connection)?;
        let Some(active) = self.active.take() else {
            return Err(DragError::NotActive);
        };
        match active.snapshot {
            Snapshot::Endpoint(endpoint) => {
                if let DragKind::Endpoint(end) = active.kind {
                    *connection.endpoint_mut(end) = endpoint;
                }
            }
            Snapshot::Waypoints(waypoints) => connection.waypoints = waypoints,
            Snapshot::CurveAmount(amount) => connection.curve_amount = amount,
        }
        tracing::debug!(kind = ?active.kind, "drag cancelled");
        Ok(())
    }

    fn active_for(&mut self, connection: &Connection<K>) -> Result<&mut ActiveDrag<K>> {
        let active = self.active.as_mut().ok_or(DragError::NotActive)?;
        if active.connection != connection.id {
            return Err(DragError::ConnectionMismatch);
        }
        Ok(active)
    }
}

/// Interior points of `route` after moving segment `index` across its axis by
/// `delta`, snapped to the grid.
///
/// Segments touching an endpoint get a new elbow so the endpoint stays put.
fn dragged_segment(route: &[Point], index: usize, delta: Vec2, grid: f64) -> Vec<Point> {
    let (a, b) = (route[index], route[index + 1]);
    let axis = if (a.y - b.y).abs() <= (a.x - b.x).abs() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let across = axis.across(a) + axis.across(delta.to_point());
    let snapped = axis.across(snap_to_grid(axis.point(0.0, across), grid));
    let moved_a = axis.point(axis.along(a), snapped);
    let moved_b = axis.point(axis.along(b), snapped);

    let mut points = Vec::with_capacity(route.len() + 2);
    points.extend_from_slice(&route[..index]);
    if index == 0 {
        points.push(a);
    }
    points.push(moved_a);
    points.push(moved_b);
    if index + 2 == route.len() {
        points.push(b);
    }
    points.extend_from_slice(&route[(index + 2).min(route.len())..]);
    // Neighbouring runs stay perpendicular because they share the moved
    // coordinate; only the interior becomes waypoints.
    points[1..points.len() - 1].to_vec()
}

/// Signed distance of `pointer` from the chord `s -> t` along its left normal,
/// clamped to `clamp` times the chord length.
fn curve_amount_at(s: Point, t: Point, pointer: Point, clamp: f64) -> f64 {
    let d = t - s;
    let len = d.hypot();
    if len <= 0.0 {
        return 0.0;
    }
    let normal = Vec2::new(d.y, -d.x) / len;
    let limit = len * clamp;
    (pointer - s).dot(normal).clamp(-limit, limit)
}
