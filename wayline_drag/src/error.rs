// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by drag sessions.

/// Misuse of a [`DragSession`](crate::DragSession).
///
/// These are caller errors, not geometry failures: the session is left
/// unchanged when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    /// `begin` was called while another drag is in progress.
    #[error("a drag is already in progress")]
    AlreadyActive,
    /// `update`, `commit` or `cancel` was called with no drag in progress.
    #[error("no drag is in progress")]
    NotActive,
    /// The connection passed in is not the one being dragged.
    #[error("the connection does not belong to the active drag")]
    ConnectionMismatch,
    /// The waypoint index is past the end of the connection's waypoints.
    #[error("waypoint {index} is out of range for {len} waypoints")]
    WaypointOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of waypoints.
        len: usize,
    },
    /// The route has no segment at this index.
    #[error("route has no segment {index}")]
    NoSuchSegment {
        /// Requested index.
        index: usize,
    },
    /// The segment is diagonal or too short to drag.
    #[error("segment {index} cannot be dragged")]
    SegmentNotDraggable {
        /// Requested index.
        index: usize,
    },
    /// The route has nothing to drag, such as a curve handle on an empty route.
    #[error("the route is empty")]
    EmptyRoute,
}

/// Result type for drag operations.
pub type Result<T> = core::result::Result<T, DragError>;
