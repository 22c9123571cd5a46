// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Port selection for new connections.
//!
//! [`select_ports`] picks an anchor side on each of two nodes given the other
//! nodes in the way. It runs once, when a connection is created; the result is
//! stored on the connection and never silently recomputed.
//!
//! The decision is made on the relative placement of the two rects:
//!
//! - **Side by side** (separated horizontally, vertical ranges overlapping):
//!   facing `Right`/`Left` ports when the gap is at least
//!   [`MIN_FACING_CLEARANCE`] and the corridor between them is empty; otherwise
//!   `Top`/`Top` or `Bottom`/`Bottom`, whichever detour lane is closer.
//! - **Stacked**: the same with the axes swapped.
//! - **Overlapping or diagonal**: facing ports on the axis with more room.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;
use wayline_geom::{Axis, Port, is_finite_rect, overlaps_strict, span, x_overlap, y_overlap};

/// Minimum gap between two nodes for facing ports to be chosen.
pub const MIN_FACING_CLEARANCE: f64 = 50.0;

/// Padding added to the cross-axis span of a corridor before testing obstacles.
pub const CORRIDOR_PADDING: f64 = 15.0;

/// Clearance difference below which the horizontal axis is still preferred.
pub const AXIS_DEAD_BAND: f64 = 20.0;

/// Distance of a detour lane from the pair's outer edge.
const LANE_OFFSET: f64 = 30.0;

/// Clearance kept between a detour lane and an obstacle that pushes it.
const LANE_PADDING: f64 = 8.0;

/// Ports chosen for the two ends of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortPair {
    /// Port on the source node.
    pub source: Port,
    /// Port on the target node.
    pub target: Port,
}

impl PortPair {
    /// Create a pair.
    pub const fn new(source: Port, target: Port) -> Self {
        Self { source, target }
    }
}

impl Default for PortPair {
    /// `Right` to `Left`, the neutral answer for unusable input.
    fn default() -> Self {
        Self::new(Port::Right, Port::Left)
    }
}

bitflags::bitflags! {
    /// Detour lanes that obstacles pushed outward.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Blocked: u8 {
        /// Something straddles the lane above the pair.
        const ABOVE = 1 << 0;
        /// Something straddles the lane below the pair.
        const BELOW = 1 << 1;
        /// Something straddles the lane left of the pair.
        const LEFT = 1 << 2;
        /// Something straddles the lane right of the pair.
        const RIGHT = 1 << 3;
    }
}

/// Choose ports for a connection from `source` to `target`.
///
/// `obstacles` should hold every other node's bounds, unpadded. Non-finite
/// input yields [`PortPair::default`].
pub fn select_ports(source: Rect, target: Rect, obstacles: &[Rect]) -> PortPair {
    select_ports_detailed(source, target, obstacles).0
}

/// Like [`select_ports`], also reporting which detour lanes were blocked.
///
/// The flags are empty unless a detour lane had to be evaluated.
pub fn select_ports_detailed(source: Rect, target: Rect, obstacles: &[Rect]) -> (PortPair, Blocked) {
    if !is_finite_rect(source) || !is_finite_rect(target) {
        return (PortPair::default(), Blocked::empty());
    }
    let h_separated = !x_overlap(source, target);
    let v_separated = !y_overlap(source, target);
    match (h_separated, v_separated) {
        (true, false) => side_by_side(source, target, obstacles, Axis::Horizontal),
        (false, true) => side_by_side(source, target, obstacles, Axis::Vertical),
        _ => (diagonal(source, target, obstacles), Blocked::empty()),
    }
}

/// Rect from extents along `axis` and across it.
fn rect_from_spans(axis: Axis, along: (f64, f64), across: (f64, f64)) -> Rect {
    match axis {
        Axis::Horizontal => Rect::new(along.0, across.0, along.1, across.1),
        Axis::Vertical => Rect::new(across.0, along.0, across.1, along.1),
    }
}

fn center_along(rect: Rect, axis: Axis) -> f64 {
    let (lo, hi) = span(rect, axis);
    (lo + hi) * 0.5
}

/// Ports facing each other along `axis`.
fn facing(axis: Axis, forward: bool) -> PortPair {
    match (axis, forward) {
        (Axis::Horizontal, true) => PortPair::new(Port::Right, Port::Left),
        (Axis::Horizontal, false) => PortPair::new(Port::Left, Port::Right),
        (Axis::Vertical, true) => PortPair::new(Port::Bottom, Port::Top),
        (Axis::Vertical, false) => PortPair::new(Port::Top, Port::Bottom),
    }
}

/// Whether the target lies after the source along `axis`.
fn is_forward(source: Rect, target: Rect, axis: Axis) -> bool {
    center_along(target, axis) >= center_along(source, axis)
}

/// The space between the facing sides along `axis`, spanning both rects across
/// it plus [`CORRIDOR_PADDING`].
fn corridor(source: Rect, target: Rect, axis: Axis) -> Rect {
    let (s_lo, s_hi) = span(source, axis);
    let (t_lo, t_hi) = span(target, axis);
    let (a, b) = if is_forward(source, target, axis) {
        (s_hi, t_lo)
    } else {
        (t_hi, s_lo)
    };
    let cross = axis.cross();
    let (sc_lo, sc_hi) = span(source, cross);
    let (tc_lo, tc_hi) = span(target, cross);
    rect_from_spans(
        axis,
        (a.min(b), a.max(b)),
        (
            sc_lo.min(tc_lo) - CORRIDOR_PADDING,
            sc_hi.max(tc_hi) + CORRIDOR_PADDING,
        ),
    )
}

fn corridor_blocked(source: Rect, target: Rect, obstacles: &[Rect], axis: Axis) -> bool {
    let c = corridor(source, target, axis);
    obstacles.iter().any(|o| overlaps_strict(*o, c))
}

/// Gap between the facing sides along `axis`; negative when they overlap.
fn gap(source: Rect, target: Rect, axis: Axis) -> f64 {
    let (s_lo, s_hi) = span(source, axis);
    let (t_lo, t_hi) = span(target, axis);
    if is_forward(source, target, axis) {
        t_lo - s_hi
    } else {
        s_lo - t_hi
    }
}

/// A detour lane on one side of the pair: its distance from the pair's outer
/// edge and whether an obstacle pushed it.
fn lane(pair_along: (f64, f64), edge: f64, outward: f64, obstacles: &[Rect], axis: Axis) -> (f64, bool) {
    let cross = axis.cross();
    let mut lane = edge + outward * LANE_OFFSET;
    let mut pushed = false;
    // Each pass pushes past at least one obstacle, so `len + 1` passes suffice.
    for _ in 0..=obstacles.len() {
        let mut moved = false;
        for o in obstacles {
            let (o_lo, o_hi) = span(*o, axis);
            if o_hi <= pair_along.0 || o_lo >= pair_along.1 {
                continue;
            }
            let (c_lo, c_hi) = span(*o, cross);
            let (lo, hi) = (c_lo - LANE_PADDING, c_hi + LANE_PADDING);
            if lane > lo && lane < hi {
                lane = if outward < 0.0 { lo } else { hi };
                moved = true;
                pushed = true;
            }
        }
        if !moved {
            break;
        }
    }
    ((lane - edge).abs(), pushed)
}

fn side_by_side(source: Rect, target: Rect, obstacles: &[Rect], axis: Axis) -> (PortPair, Blocked) {
    let forward = is_forward(source, target, axis);
    if gap(source, target, axis) >= MIN_FACING_CLEARANCE
        && !corridor_blocked(source, target, obstacles, axis)
    {
        return (facing(axis, forward), Blocked::empty());
    }

    let cross = axis.cross();
    let (s_lo, s_hi) = span(source, axis);
    let (t_lo, t_hi) = span(target, axis);
    let extent = (s_lo.min(t_lo), s_hi.max(t_hi));
    let (sc_lo, sc_hi) = span(source, cross);
    let (tc_lo, tc_hi) = span(target, cross);
    let (before, before_pushed) = lane(extent, sc_lo.min(tc_lo), -1.0, obstacles, axis);
    let (after, after_pushed) = lane(extent, sc_hi.max(tc_hi), 1.0, obstacles, axis);

    let (before_flag, after_flag, before_port) = match axis {
        Axis::Horizontal => (Blocked::ABOVE, Blocked::BELOW, Port::Top),
        Axis::Vertical => (Blocked::LEFT, Blocked::RIGHT, Port::Left),
    };
    let mut blocked = Blocked::empty();
    blocked.set(before_flag, before_pushed);
    blocked.set(after_flag, after_pushed);

    let take_before = if before == after {
        center_along(source, cross) <= center_along(target, cross)
    } else {
        before < after
    };
    let port = if take_before {
        before_port
    } else {
        before_port.opposite()
    };
    (PortPair::new(port, port), blocked)
}

fn diagonal(source: Rect, target: Rect, obstacles: &[Rect]) -> PortPair {
    let clearance = |axis: Axis| {
        let half_sum = (span(source, axis).1 - span(source, axis).0
            + span(target, axis).1
            - span(target, axis).0)
            * 0.5;
        (center_along(target, axis) - center_along(source, axis)).abs() - half_sum
    };
    let (preferred, other) = if clearance(Axis::Vertical) > clearance(Axis::Horizontal) + AXIS_DEAD_BAND
    {
        (Axis::Vertical, Axis::Horizontal)
    } else {
        (Axis::Horizontal, Axis::Vertical)
    };
    let axis = if corridor_blocked(source, target, obstacles, preferred)
        && !corridor_blocked(source, target, obstacles, other)
    {
        other
    } else {
        preferred
    };
    facing(axis, is_forward(source, target, axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_geom::rect_from_xywh;

    const SOURCE: Rect = Rect::new(0.0, 0.0, 120.0, 60.0);
    const TARGET: Rect = Rect::new(300.0, 0.0, 420.0, 60.0);

    #[test]
    fn facing_ports_with_clear_corridor() {
        assert_eq!(select_ports(SOURCE, TARGET, &[]), PortPair::new(Port::Right, Port::Left));
        assert_eq!(select_ports(TARGET, SOURCE, &[]), PortPair::new(Port::Left, Port::Right));
    }

    #[test]
    fn facing_ports_hold_for_any_clear_horizontal_gap() {
        for gap in [50.0, 51.0, 80.0, 400.0] {
            for dy in [-40.0, 0.0, 25.0] {
                let target = rect_from_xywh(120.0 + gap, dy, 120.0, 60.0);
                assert_eq!(
                    select_ports(SOURCE, target, &[]),
                    PortPair::new(Port::Right, Port::Left),
                    "gap {gap}, dy {dy}"
                );
                assert_eq!(
                    select_ports(target, SOURCE, &[]),
                    PortPair::new(Port::Left, Port::Right),
                    "gap {gap}, dy {dy}"
                );
            }
        }
    }

    #[test]
    fn obstacle_in_corridor_moves_to_top_or_bottom() {
        let obstacle = rect_from_xywh(180.0, -20.0, 40.0, 100.0);
        let (ports, blocked) = select_ports_detailed(SOURCE, TARGET, &[obstacle]);
        // Both lanes clear the obstacle; equal centres fall back to the top.
        assert_eq!(ports, PortPair::new(Port::Top, Port::Top));
        assert!(blocked.is_empty());
    }

    #[test]
    fn blocked_lane_picks_the_other_side() {
        let wall = rect_from_xywh(180.0, -20.0, 40.0, 100.0);
        let above = rect_from_xywh(100.0, -60.0, 200.0, 30.0);
        let (ports, blocked) = select_ports_detailed(SOURCE, TARGET, &[wall, above]);
        assert_eq!(ports, PortPair::new(Port::Bottom, Port::Bottom));
        assert_eq!(blocked, Blocked::ABOVE);
    }

    #[test]
    fn narrow_gap_detours() {
        let target = rect_from_xywh(150.0, 10.0, 120.0, 60.0);
        // Source centre is higher, so the pair detours over the top.
        assert_eq!(select_ports(SOURCE, target, &[]), PortPair::new(Port::Top, Port::Top));
        assert_eq!(select_ports(target, SOURCE, &[]), PortPair::new(Port::Bottom, Port::Bottom));
    }

    #[test]
    fn stacked_pairs() {
        let below = rect_from_xywh(0.0, 200.0, 120.0, 60.0);
        assert_eq!(select_ports(SOURCE, below, &[]), PortPair::new(Port::Bottom, Port::Top));
        assert_eq!(select_ports(below, SOURCE, &[]), PortPair::new(Port::Top, Port::Bottom));

        let blocker = rect_from_xywh(20.0, 100.0, 80.0, 40.0);
        assert_eq!(select_ports(SOURCE, below, &[blocker]), PortPair::new(Port::Left, Port::Left));
    }

    #[test]
    fn diagonal_prefers_the_roomier_axis() {
        // Far to the right, slightly below: horizontal.
        let right = rect_from_xywh(400.0, 100.0, 120.0, 60.0);
        assert_eq!(select_ports(SOURCE, right, &[]), PortPair::new(Port::Right, Port::Left));
        // Far below, slightly right: vertical.
        let down = rect_from_xywh(150.0, 400.0, 120.0, 60.0);
        assert_eq!(select_ports(SOURCE, down, &[]), PortPair::new(Port::Bottom, Port::Top));
        // Within the dead band horizontal still wins.
        let close = rect_from_xywh(170.0, 120.0, 120.0, 60.0);
        assert_eq!(select_ports(SOURCE, close, &[]), PortPair::new(Port::Right, Port::Left));
    }

    #[test]
    fn diagonal_switches_axis_around_blocked_corridor() {
        let right = rect_from_xywh(400.0, 100.0, 120.0, 60.0);
        // Blocks the horizontal corridor but not the vertical one.
        let blocker = rect_from_xywh(200.0, 110.0, 40.0, 60.0);
        assert_eq!(select_ports(SOURCE, right, &[blocker]), PortPair::new(Port::Bottom, Port::Top));
    }

    #[test]
    fn non_finite_input_is_neutral() {
        let bad = Rect::new(f64::NAN, 0.0, 10.0, 10.0);
        assert_eq!(select_ports(bad, TARGET, &[]), PortPair::default());
        assert_eq!(select_ports(SOURCE, bad, &[]), PortPair::default());
    }
}
