// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orthogonal routing: axis-aligned polylines between two ports.
//!
//! [`OrthogonalRouter::route`] runs a fixed pipeline over an evolving point
//! list:
//!
//! 1. Guard against non-finite input (empty result).
//! 2. Snap to a single straight run when the ports face each other and are
//!    nearly aligned.
//! 3. Build a skeleton from a case table on the port pair (same side, opposite
//!    sides in order or reversed, perpendicular) or through the waypoints.
//! 4. Correct both approaches so each end leaves its port along the normal for
//!    at least [`RouterConfig::min_stub`].
//! 5. Drop runs that double back on themselves.
//! 6. Detour middle runs around the endpoints' own padded bounds.
//! 7. Detour around external obstacles, a bounded number of times.
//! 8. Pull back U-turns that overshoot the target's final coordinate.
//! 9. Correct the approaches again and clean up.
//! 10. If the result still leaves a port backwards or short, runs through an
//!     endpoint node or enters an obstacle, search a lane grid instead (see
//!     `grid`).
//!
//! User-placed waypoints pin the route: detours then keep every run's ends in
//! place, U-turns are left alone since they may be what the user drew, and
//! the grid search is not used.
//!
//! Everything here is best effort. When the avoidance budget runs out and the
//! grid search finds nothing better, the current route is returned as is, even
//! if it still crosses an obstacle.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;
use wayline_geom::{
    ALIGN_EPSILON, Axis, Port, is_finite_point, is_finite_rect, pad, segment_intersects_rect,
    simplify_polyline, span,
};

use crate::RouteResult;
use crate::model::DEFAULT_CORNER_RADIUS;

mod avoid;
mod cleanup;
mod grid;

/// Tunables for [`OrthogonalRouter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouterConfig {
    /// Coordinates closer than this are treated as aligned.
    pub align_epsilon: f64,
    /// Largest cross-axis deviation that still snaps to a straight line.
    pub snap_threshold: f64,
    /// Minimum length of the perpendicular run at each port.
    pub min_stub: f64,
    /// Padding around external obstacles.
    pub obstacle_padding: f64,
    /// Padding around the endpoints' own nodes.
    pub self_padding: f64,
    /// Maximum number of external detours per route.
    pub max_iterations: usize,
    /// Weight of the direction bias when picking a detour side, in `[0, 1]`.
    pub bias_weight: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            align_epsilon: ALIGN_EPSILON,
            snap_threshold: 15.0,
            min_stub: 30.0,
            obstacle_padding: 8.0,
            self_padding: 15.0,
            max_iterations: 10,
            bias_weight: 0.3,
        }
    }
}

/// Per-route inputs besides the endpoints and ports.
#[derive(Clone, Copy, Debug)]
pub struct RouteOptions<'a> {
    /// User-placed points, ordered start to end.
    pub waypoints: &'a [Point],
    /// Bounds of the source node, when attached.
    pub source_bounds: Option<Rect>,
    /// Bounds of the target node, when attached.
    pub target_bounds: Option<Rect>,
    /// Other nodes' bounds, unpadded.
    pub obstacles: &'a [Rect],
    /// Draw corners sharp.
    pub sharp: bool,
    /// Requested corner radius.
    pub corner_radius: f64,
}

impl Default for RouteOptions<'_> {
    fn default() -> Self {
        Self {
            waypoints: &[],
            source_bounds: None,
            target_bounds: None,
            obstacles: &[],
            sharp: false,
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }
}

/// Computes orthogonal routes. Stateless apart from its configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrthogonalRouter {
    /// Tunables.
    pub config: RouterConfig,
}

impl OrthogonalRouter {
    /// Create a router with the given configuration.
    pub const fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Route from `source` leaving through `source_port` to `target` entering
    /// through `target_port`.
    ///
    /// Ports are taken as given; free endpoints should pass a port inferred from
    /// the direction to the other end. Returns [`RouteResult::empty`] for
    /// non-finite input.
    pub fn route(
        &self,
        source: Point,
        target: Point,
        source_port: Port,
        target_port: Port,
        options: &RouteOptions<'_>,
    ) -> RouteResult {
        let points = self.route_points(source, target, source_port, target_port, options);
        if points.is_empty() {
            return RouteResult::empty();
        }
        let radius = if options.sharp {
            0.0
        } else {
            options.corner_radius
        };
        RouteResult::from_points(points, radius, true)
    }

    /// The point list of [`OrthogonalRouter::route`], without path assembly.
    pub fn route_points(
        &self,
        source: Point,
        target: Point,
        source_port: Port,
        target_port: Port,
        options: &RouteOptions<'_>,
    ) -> Vec<Point> {
        let Some(plan) = self.plan(source, target, source_port, target_port, options) else {
            return Vec::new();
        };
        if !plan.pinned
            && let Some(points) = plan.snap_to_straight()
        {
            tracing::debug!(?source, ?target, "snapped orthogonal route to a straight run");
            return points;
        }

        let skeleton = if plan.pinned {
            plan.through_waypoints(options.waypoints)
        } else {
            plan.skeleton()
        };
        let mut points = simplify_polyline(&skeleton);
        cleanup::correct_approach(&mut points, &plan);
        points = simplify_polyline(&points);

        avoid::avoid_own_bounds(&mut points, &plan);
        let detours = avoid::avoid_obstacles(&mut points, &plan);
        tracing::trace!(detours, points = points.len(), "obstacle avoidance finished");
        if !plan.pinned {
            cleanup::remove_backtracks(&mut points, &plan);
        }

        cleanup::correct_approach(&mut points, &plan);
        let points = simplify_polyline(&points);
        if plan.pinned || plan.acceptable(&points) {
            return points;
        }
        match plan.searched_route() {
            Some(searched) => {
                tracing::debug!(points = searched.len(), "replaced heuristic route with grid search");
                searched
            }
            None => points,
        }
    }

    fn plan<'a>(
        &'a self,
        source: Point,
        target: Point,
        source_port: Port,
        target_port: Port,
        options: &RouteOptions<'_>,
    ) -> Option<Plan<'a>> {
        let finite = is_finite_point(source)
            && is_finite_point(target)
            && options.waypoints.iter().all(|w| is_finite_point(*w));
        if !finite {
            return None;
        }
        let config = &self.config;
        Some(Plan {
            config,
            source,
            target,
            source_port,
            target_port,
            source_bounds: options.source_bounds.filter(|b| is_finite_rect(*b)),
            target_bounds: options.target_bounds.filter(|b| is_finite_rect(*b)),
            obstacles: options
                .obstacles
                .iter()
                .filter(|r| is_finite_rect(**r))
                .map(|r| pad(*r, config.obstacle_padding))
                .collect(),
            pinned: !options.waypoints.is_empty(),
        })
    }
}

/// Whether an endpoint at cross coordinate `from` may move to `to` so that a
/// run along `axis` can leave it straight.
///
/// Free endpoints always may. Attached ones may only slide along their own
/// side, so the run has to leave along the port's axis and `to` has to stay
/// within the side.
pub(crate) fn can_slide(port: Option<Port>, bounds: Option<Rect>, axis: Axis, from: f64, to: f64) -> bool {
    if from == to {
        return true;
    }
    let Some(bounds) = bounds else {
        return true;
    };
    match port {
        Some(port) if port.axis() == axis => {
            let (lo, hi) = span(bounds, axis.cross());
            (lo..=hi).contains(&to)
        }
        _ => false,
    }
}

/// Axis a run from `a` to `b` mostly follows.
pub(crate) fn run_axis(a: Point, b: Point) -> Axis {
    if (b.y - a.y).abs() <= (b.x - a.x).abs() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Which endpoint node a padded own-bounds rect belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Own {
    Source,
    Target,
}

/// One route's inputs, normalized for the pipeline stages.
#[derive(Debug)]
struct Plan<'a> {
    config: &'a RouterConfig,
    source: Point,
    target: Point,
    source_port: Port,
    target_port: Port,
    source_bounds: Option<Rect>,
    target_bounds: Option<Rect>,
    /// External obstacles, padded.
    obstacles: Vec<Rect>,
    /// The route passes through user-placed waypoints.
    pinned: bool,
}

impl Plan<'_> {
    fn source_stub(&self) -> Point {
        self.source + self.source_port.normal() * self.config.min_stub
    }

    fn target_stub(&self) -> Point {
        self.target + self.target_port.normal() * self.config.min_stub
    }

    /// The endpoints' own bounds padded for self-avoidance.
    fn own_bounds(&self) -> SmallVec<[(Rect, Own); 2]> {
        let pad_by = self.config.self_padding;
        let mut own = SmallVec::new();
        if let Some(b) = self.source_bounds {
            own.push((pad(b, pad_by), Own::Source));
        }
        if let Some(b) = self.target_bounds {
            own.push((pad(b, pad_by), Own::Target));
        }
        own
    }

    /// Unit vector pointing the way the route is heading: the blend of the
    /// overall direction and the source port's normal.
    fn bias(&self) -> Vec2 {
        let d = self.target - self.source;
        let len = d.hypot();
        let dir = if len > 0.0 { d / len } else { Vec2::ZERO };
        let sum = dir + self.source_port.normal();
        let len = sum.hypot();
        if len > 1e-9 { sum / len } else { Vec2::ZERO }
    }

    /// Whether a run stays clear of external obstacles.
    fn obstacle_clear(&self, a: Point, b: Point) -> bool {
        !self.obstacles.iter().any(|o| segment_intersects_rect(a, b, *o))
    }

    /// Whether an interior run stays clear of external obstacles and of the
    /// endpoints' own padded bounds.
    fn leg_clear(&self, a: Point, b: Point) -> bool {
        self.obstacle_clear(a, b)
            && !self
                .own_bounds()
                .iter()
                .any(|(r, _)| segment_intersects_rect(a, b, *r))
    }

    /// Whether a run enters either endpoint's unpadded bounds.
    fn enters_own(&self, a: Point, b: Point) -> bool {
        [self.source_bounds, self.target_bounds]
            .into_iter()
            .flatten()
            .any(|r| segment_intersects_rect(a, b, r))
    }

    /// Whether every run avoids the unpadded endpoint bounds, except the first
    /// run against the source and the last against the target.
    fn clean(&self, points: &[Point]) -> bool {
        let last = points.len().saturating_sub(2);
        points.windows(2).enumerate().all(|(i, w)| {
            let hits = |b: Option<Rect>| b.is_some_and(|b| segment_intersects_rect(w[0], w[1], b));
            !(i != 0 && hits(self.source_bounds)) && !(i != last && hits(self.target_bounds))
        })
    }

    /// Whether `points` is axis aligned, leaves the source and enters the
    /// target along their normals for at least a stub, is
    /// [`clean`](Self::clean), and stays clear of every padded obstacle.
    fn acceptable(&self, points: &[Point]) -> bool {
        let n = points.len();
        if n < 2 {
            return false;
        }
        let eps = self.config.align_epsilon;
        let stub_ok = |end: Point, next: Point, port: Port| {
            let axis = port.axis();
            (axis.across(next) - axis.across(end)).abs() < eps
                && port.along(next - end) >= self.config.min_stub - eps
        };
        let aligned = points
            .windows(2)
            .all(|w| (w[0].x - w[1].x).abs() < eps || (w[0].y - w[1].y).abs() < eps);
        aligned
            && stub_ok(points[0], points[1], self.source_port)
            && stub_ok(points[n - 1], points[n - 2], self.target_port)
            && self.clean(points)
            && points.windows(2).all(|w| self.obstacle_clear(w[0], w[1]))
    }

    /// A grid-searched route between the stubs, if one exists and is
    /// [`acceptable`](Self::acceptable).
    fn searched_route(&self) -> Option<Vec<Point>> {
        let lanes = grid::search(self)?;
        let mut points = Vec::with_capacity(lanes.len() + 2);
        points.push(self.source);
        points.extend(lanes);
        points.push(self.target);
        let points = simplify_polyline(&points);
        self.acceptable(&points).then_some(points)
    }

    fn snap_to_straight(&self) -> Option<Vec<Point>> {
        let config = self.config;
        if !self
            .source_port
            .faces(self.target_port, self.source, self.target)
        {
            return None;
        }
        let axis = self.source_port.axis();
        let (s_across, t_across) = (axis.across(self.source), axis.across(self.target));
        if (t_across - s_across).abs() > config.snap_threshold {
            return None;
        }

        let own = [self.source_bounds, self.target_bounds];
        if own.iter().any(Option::is_some) {
            let (exit, entry) = (self.source_stub(), self.target_stub());
            let crosses_own = own
                .iter()
                .flatten()
                .any(|b| segment_intersects_rect(exit, entry, pad(*b, config.obstacle_padding)));
            if crosses_own {
                return None;
            }
        }

        let across = if s_across == t_across {
            s_across
        } else {
            [s_across, t_across].into_iter().find(|&c| {
                can_slide(Some(self.source_port), self.source_bounds, axis, s_across, c)
                    && can_slide(Some(self.target_port), self.target_bounds, axis, t_across, c)
            })?
        };
        let a = axis.point(axis.along(self.source), across);
        let b = axis.point(axis.along(self.target), across);
        if self.obstacles.iter().any(|o| segment_intersects_rect(a, b, *o)) {
            return None;
        }
        Some(vec![a, b])
    }

    fn skeleton(&self) -> Vec<Point> {
        let (s, t) = (self.source, self.target);
        let (ps, pt) = (self.source_port, self.target_port);
        let (big_s, big_t) = (self.source_stub(), self.target_stub());
        let axis = ps.axis();

        if ps == pt {
            // Out past whichever stub reaches further, then across.
            let far = if ps.along(big_t - big_s) > 0.0 {
                axis.along(big_t)
            } else {
                axis.along(big_s)
            };
            vec![s, axis.point(far, axis.across(s)), axis.point(far, axis.across(t)), t]
        } else if ps == pt.opposite() {
            if ps.along(big_t - big_s) >= 0.0 {
                let mid = (axis.along(big_s) + axis.along(big_t)) * 0.5;
                vec![s, axis.point(mid, axis.across(s)), axis.point(mid, axis.across(t)), t]
            } else {
                let lane = self.reversed_lane(axis);
                vec![
                    s,
                    big_s,
                    axis.point(axis.along(big_s), lane),
                    axis.point(axis.along(big_t), lane),
                    big_t,
                    t,
                ]
            }
        } else {
            self.perpendicular(big_s, big_t)
        }
    }

    /// Cross coordinate of the run joining two stubs that point away from each
    /// other: the gap between the nodes if it is wide enough, otherwise one stub
    /// beyond the nearer outer edge of both.
    fn reversed_lane(&self, axis: Axis) -> f64 {
        let cross = axis.cross();
        let mid = (axis.across(self.source) + axis.across(self.target)) * 0.5;
        let bounds = [self.source_bounds, self.target_bounds];
        if let [Some(sb), Some(tb)] = bounds {
            let (s_lo, s_hi) = span(sb, cross);
            let (t_lo, t_hi) = span(tb, cross);
            // A gap narrower than both nodes' self padding has no room for a
            // lane that clears them.
            let room = 2.0 * self.config.self_padding;
            if t_lo - s_hi >= room {
                return (s_hi + t_lo) * 0.5;
            }
            if s_lo - t_hi >= room {
                return (t_hi + s_lo) * 0.5;
            }
        }
        let (lo, hi) = bounds
            .into_iter()
            .flatten()
            .map(|b| span(b, cross))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            });
        if lo > hi {
            return mid;
        }
        if mid - lo <= hi - mid {
            lo - self.config.min_stub
        } else {
            hi + self.config.min_stub
        }
    }

    fn perpendicular(&self, big_s: Point, big_t: Point) -> Vec<Point> {
        let (s, t) = (self.source, self.target);
        let axis = self.source_port.axis();
        let stub = self.config.min_stub;

        let corner = axis.point(axis.along(t), axis.across(s));
        let ell = vec![s, corner, t];
        if self.source_port.along(corner - s) >= stub
            && self.target_port.along(corner - t) >= stub
            && self.clean(&ell)
        {
            return ell;
        }

        let exit_first = vec![
            s,
            big_s,
            axis.point(axis.along(big_s), axis.across(big_t)),
            big_t,
            t,
        ];
        if self.clean(&exit_first) {
            return exit_first;
        }
        let across_first = vec![
            s,
            big_s,
            axis.point(axis.along(big_t), axis.across(big_s)),
            big_t,
            t,
        ];
        if self.clean(&across_first) {
            return across_first;
        }
        exit_first
    }

    fn through_waypoints(&self, waypoints: &[Point]) -> Vec<Point> {
        let eps = self.config.align_epsilon;
        let mut points = Vec::with_capacity(waypoints.len() * 2 + 4);
        points.push(self.source);
        points.push(self.source_stub());
        for next in waypoints
            .iter()
            .copied()
            .chain(core::iter::once(self.target_stub()))
        {
            let prev = points[points.len() - 1];
            let aligned = (prev.y - next.y).abs() < eps || (prev.x - next.x).abs() < eps;
            if !aligned {
                let before = points[points.len() - 2];
                points.push(self.elbow(before, prev, next));
            }
            points.push(next);
        }
        points.push(self.target);
        points
    }

    /// Corner joining `prev` to `next`, given the run `before -> prev`.
    ///
    /// Turning off the current run first is preferred; the other corner is
    /// used when the first one would cut through an endpoint node or double
    /// back over the current run and the other does neither.
    fn elbow(&self, before: Point, prev: Point, next: Point) -> Point {
        let run = run_axis(before, prev);
        let heading = prev - before;
        let turn_first = run.point(run.along(prev), run.across(next));
        let follow_first = run.point(run.along(next), run.across(prev));
        let fits = |corner: Point| {
            (corner - prev).dot(heading) >= 0.0
                && !self.enters_own(prev, corner)
                && !self.enters_own(corner, next)
        };
        if !fits(turn_first) && fits(follow_first) {
            follow_first
        } else {
            turn_first
        }
    }
}
