// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid snapping and node-side capture for dragged points.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use wayline_geom::Port;
use wayline_route::Node;

/// Round `v` to the nearest multiple of `grid`.
///
/// A grid that is not a positive finite size disables snapping.
pub fn snap_value(v: f64, grid: f64) -> f64 {
    if grid.is_finite() && grid > 0.0 {
        (v / grid).round() * grid
    } else {
        v
    }
}

/// Snap both coordinates of `p` to the grid.
pub fn snap_to_grid(p: Point, grid: f64) -> Point {
    Point::new(snap_value(p.x, grid), snap_value(p.y, grid))
}

/// A node side a dragged endpoint can attach to.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor<K> {
    /// Node to attach to.
    pub node: K,
    /// Side of the node.
    pub port: Port,
    /// Position along the side.
    pub ratio: f64,
    /// Distance from the query point to the side.
    pub distance: f64,
}

/// The node side nearest to `pt`, if it lies within `capture_radius`.
///
/// The port a release would attach to is computed from `pt` itself: its ratio
/// is the projection of `pt` onto the side. The distance is measured to that
/// port, so a point anywhere alongside a side (not only near its centre) is
/// captured, and the returned ratio keeps the endpoint where it was dropped.
///
/// Sides are compared across all nodes; earlier nodes and then the port order
/// of [`Port::ALL`] win ties.
pub fn nearest_anchor<K: Clone>(nodes: &[Node<K>], pt: Point, capture_radius: f64) -> Option<Anchor<K>> {
    let mut best: Option<Anchor<K>> = None;
    for node in nodes {
        let bounds = node.bounds();
        for port in Port::ALL {
            let distance = port.distance_to_side(bounds, pt);
            if distance > capture_radius || best.as_ref().is_some_and(|b| b.distance <= distance) {
                continue;
            }
            best = Some(Anchor {
                node: node.id.clone(),
                port,
                ratio: port.ratio_of(bounds, pt),
                distance,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rounding() {
        assert_eq!(snap_to_grid(Point::new(14.0, 16.0), 10.0), Point::new(10.0, 20.0));
        assert_eq!(snap_to_grid(Point::new(-14.0, 5.5), 10.0), Point::new(-10.0, 10.0));
        assert_eq!(snap_to_grid(Point::new(14.0, 16.0), 0.0), Point::new(14.0, 16.0));
        assert_eq!(snap_value(7.0, f64::NAN), 7.0);
    }

    #[test]
    fn captures_the_nearest_side() {
        let nodes = [Node::new(1, (0.0, 0.0), None), Node::new(2, (300.0, 0.0), None)];
        // 10 right of node 1's right side, a quarter of the way down.
        let a = nearest_anchor(&nodes, Point::new(130.0, 15.0), 25.0).expect("within reach");
        assert_eq!((a.node, a.port), (1, Port::Right));
        assert_eq!(a.ratio, 0.25);
        assert_eq!(a.distance, 10.0);

        let a = nearest_anchor(&nodes, Point::new(360.0, -5.0), 25.0).expect("within reach");
        assert_eq!((a.node, a.port, a.ratio), (2, Port::Top, 0.5));

        assert!(nearest_anchor(&nodes, Point::new(210.0, 30.0), 25.0).is_none());
    }

    #[test]
    fn capture_measures_to_the_port_under_the_point() {
        let nodes = [Node::new(1, (0.0, 0.0), None)];
        // About 30 from the right side's centre, but 20 from the side itself.
        let a = nearest_anchor(&nodes, Point::new(140.0, 7.5), 25.0).expect("within reach");
        assert_eq!((a.port, a.distance, a.ratio), (Port::Right, 20.0, 0.125));
        assert_eq!(Port::Right.anchor(nodes[0].bounds(), a.ratio), Point::new(120.0, 7.5));

        // Past the corner the nearest port is the corner itself.
        let a = nearest_anchor(&nodes, Point::new(125.0, -10.0), 25.0).expect("within reach");
        assert_eq!((a.port, a.ratio), (Port::Top, 1.0));
        assert!((a.distance - 125.0_f64.sqrt()).abs() < 1e-12);
        assert!(nearest_anchor(&nodes, Point::new(140.0, -20.0), 25.0).is_none());
    }
}
