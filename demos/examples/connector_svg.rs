// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route a small diagram and print it as an SVG document.
//!
//! This example:
//! - picks ports once per connection with `select_ports`,
//! - renders each connection in its own line style,
//! - finds crossings between orthogonal routes and draws bridges,
//! - drags a segment and shows the re-routed connector.
//!
//! Run:
//! - `cargo run -p wayline_demos --example connector_svg > diagram.svg`

use kurbo::{Size, Vec2};
use wayline_drag::{DragKind, DragSession};
use wayline_route::crossing::{CrossingPath, DEFAULT_BRIDGE_GAP, bridged_path, find_crossings, gaps_for};
use wayline_route::{Connection, LineStyle, Node, PathRenderer, RouteResult};

fn main() {
    let nodes = vec![
        Node::new("a", (0.0, 0.0), None),
        Node::new("b", (300.0, 0.0), Some(Size::new(120.0, 60.0))),
        Node::new("wall", (180.0, 240.0), Some(Size::new(40.0, 100.0))),
        Node::new("c", (0.0, 260.0), None),
        Node::new("d", (300.0, 260.0), None),
        Node::new("e", (150.0, -160.0), None),
    ];

    let mut connections = vec![
        // Facing nodes with a clear corridor: a single straight run.
        Connection::connect("a-b", "a", "b", &nodes),
        // The wall sits between c and d; the route detours around it.
        Connection::connect("c-d", "c", "d", &nodes),
        // Crosses the other two.
        Connection::connect("e-d", "e", "d", &nodes),
        Connection::connect("a-d", "a", "d", &nodes).with_line_style(LineStyle::Curved),
    ];

    let renderer = PathRenderer::default();
    let routes: Vec<RouteResult> = connections
        .iter()
        .map(|c| renderer.render_connection(c, &nodes))
        .collect();

    for (c, r) in connections.iter().zip(&routes) {
        eprintln!(
            "{}: {:?} -> {:?}, {} segment(s), label at {:?}",
            c.id,
            c.source.port(),
            c.target.port(),
            r.segments.len(),
            r.label_anchor(),
        );
    }

    let paths: Vec<CrossingPath<'_, &str>> = connections
        .iter()
        .zip(&routes)
        .map(|(c, r)| CrossingPath::from_route(c.id, r))
        .collect();
    let crossings = find_crossings(&paths);
    eprintln!("{} crossing(s)", crossings.len());

    println!(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-40 -200 520 560">"#);
    for node in &nodes {
        let b = node.bounds();
        println!(
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="gray"/>"#,
            b.x0,
            b.y0,
            b.width(),
            b.height()
        );
    }
    for (c, r) in connections.iter().zip(&routes) {
        let path = if r.orthogonal {
            let gaps = gaps_for(&crossings, &c.id);
            let radius = if c.style.sharp { 0.0 } else { c.style.corner_radius };
            bridged_path(&r.points, &gaps, radius, DEFAULT_BRIDGE_GAP)
        } else {
            r.path.clone()
        };
        println!(r#"  <path d="{}" fill="none" stroke="black"/>"#, path.to_svg());
    }

    // Drag the middle segment of the detour further down and re-render it.
    let route = &routes[1];
    if let Some(segment) = route.segments.iter().find(|s| s.draggable && s.horizontal && s.index > 0) {
        let mut session = DragSession::default();
        let grab = segment.midpoint();
        let dragged = &mut connections[1];
        let ok = session
            .begin(dragged, route, DragKind::Segment(segment.index), grab)
            .and_then(|()| session.update(dragged, grab + Vec2::new(0.0, 40.0)))
            .and_then(|()| session.commit(dragged, &nodes));
        match ok {
            Ok(outcome) => {
                let moved = renderer.render_connection(dragged, &nodes);
                eprintln!("dragged {}: {outcome:?}, waypoints {:?}", dragged.id, dragged.waypoints);
                println!(
                    r#"  <path d="{}" fill="none" stroke="steelblue" stroke-dasharray="4"/>"#,
                    moved.path.to_svg()
                );
            }
            Err(err) => eprintln!("drag failed: {err}"),
        }
    }
    println!("</svg>");
}
