// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayline Drag: drag session state machines for connectors.
//!
//! A [`DragSession`] drives one gesture over a [`Connection`](wayline_route::Connection) record:
//!
//! ```text
//! Idle --begin--> Dragging --update--> Dragging
//!                    |--commit--> Idle
//!                    '--cancel--> Idle (snapshot restored)
//! ```
//!
//! Four things can be dragged ([`DragKind`]): an endpoint, a waypoint, a route
//! segment, and the curve handle. Dragged points snap to
//! [`DragConfig::grid_size`]. A dragged segment moves across its axis and the
//! route's interior points become the connection's waypoints. A released
//! endpoint attaches to a node side within [`DragConfig::capture_radius`] or
//! becomes free.
//!
//! Misuse, such as starting a second drag or dragging a segment that does not
//! exist, is reported as a [`DragError`] and leaves the session unchanged.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use wayline_drag::{DragKind, DragSession};
//! use wayline_geom::Port;
//! use wayline_route::{Connection, Endpoint, RouteResult};
//!
//! let mut connection = Connection::new(
//!     1_u32,
//!     Endpoint::attached(10, Port::Right),
//!     Endpoint::attached(20, Port::Left),
//! );
//! let route = RouteResult::from_points(
//!     vec![
//!         Point::new(120.0, 30.0),
//!         Point::new(210.0, 30.0),
//!         Point::new(210.0, 230.0),
//!         Point::new(300.0, 230.0),
//!     ],
//!     8.0,
//!     true,
//! );
//!
//! let mut session = DragSession::default();
//! session.begin(&connection, &route, DragKind::Segment(1), Point::new(210.0, 120.0)).unwrap();
//! session.update(&mut connection, Point::new(262.0, 130.0)).unwrap();
//! session.commit(&mut connection, &[]).unwrap();
//! assert_eq!(connection.waypoints, [Point::new(260.0, 30.0), Point::new(260.0, 230.0)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
pub mod session;
pub mod snap;

pub use error::{DragError, Result};
pub use session::{DragConfig, DragKind, DragOutcome, DragSession, DragState};
