// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style dispatch: turning a connection into a path.
//!
//! [`PathRenderer::render`] matches on [`LineStyle`] and builds the path for
//! that style:
//!
//! | Style | Path |
//! |---|---|
//! | `Straight` | polyline through the waypoints, or one line (snapped when nearly aligned) |
//! | `Curved` | cubic leaving and entering along the port normals, or a quadratic for an explicit curve amount |
//! | `Arc` | symmetric cubic bulging `distance * 0.4` to the left of the chord |
//! | `Orthogonal` | [`OrthogonalRouter`] |
//! | `Smart` | straight or curved when the direct line is clear, orthogonal otherwise |
//!
//! A curve amount is the signed offset of the curve's apex from the chord
//! midpoint, measured along the chord's left normal.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, CubicBez, ParamCurve, PathSeg, Point, QuadBez, Rect, Vec2};
use wayline_geom::{Axis, Port, is_finite_point, pad, segment_intersects_rect};

use crate::model::{Connection, DEFAULT_CORNER_RADIUS, LineStyle, Node, obstacles_for};
use crate::orthogonal::{OrthogonalRouter, RouteOptions, can_slide};
use crate::RouteResult;

/// Tunables for [`PathRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Control-point offset of curved connectors as a fraction of the distance.
    pub curve_offset_ratio: f64,
    /// Upper bound on the curved control-point offset.
    pub max_curve_offset: f64,
    /// Default arc bulge as a fraction of the distance.
    pub arc_bulge_ratio: f64,
    /// Curve amounts tried, as fractions of the distance, when the default
    /// curve runs into an obstacle. Each is tried with both signs.
    pub trial_scales: [f64; 3],
    /// Samples taken along a curve when testing it against obstacles.
    pub curve_samples: usize,
    /// Padding around obstacles for curve and smart-style tests.
    pub obstacle_padding: f64,
    /// Largest deviation a straight connector snaps away.
    pub snap_threshold: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            curve_offset_ratio: 0.5,
            max_curve_offset: 80.0,
            arc_bulge_ratio: 0.4,
            trial_scales: [0.25, 0.5, 0.75],
            curve_samples: 24,
            obstacle_padding: 8.0,
            snap_threshold: 15.0,
        }
    }
}

/// Everything needed to draw one connector.
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    /// Drawing style.
    pub style: LineStyle,
    /// Source position.
    pub source: Point,
    /// Target position.
    pub target: Point,
    /// Source port; inferred from the direction when `None`.
    pub source_port: Option<Port>,
    /// Target port; inferred from the direction when `None`.
    pub target_port: Option<Port>,
    /// Source node bounds, when attached.
    pub source_bounds: Option<Rect>,
    /// Target node bounds, when attached.
    pub target_bounds: Option<Rect>,
    /// User-placed points.
    pub waypoints: &'a [Point],
    /// Other nodes' bounds, unpadded.
    pub obstacles: &'a [Rect],
    /// Explicit signed curve amount for curved and arc styles.
    pub curve_amount: Option<f64>,
    /// Requested corner radius for orthogonal routes.
    pub corner_radius: f64,
    /// Draw orthogonal corners sharp.
    pub sharp: bool,
}

impl RenderRequest<'_> {
    /// A request between two free points with no obstacles.
    pub fn new(style: LineStyle, source: Point, target: Point) -> Self {
        Self {
            style,
            source,
            target,
            source_port: None,
            target_port: None,
            source_bounds: None,
            target_bounds: None,
            waypoints: &[],
            obstacles: &[],
            curve_amount: None,
            corner_radius: DEFAULT_CORNER_RADIUS,
            sharp: false,
        }
    }

    fn ports(&self) -> (Port, Port) {
        (
            self.source_port
                .unwrap_or_else(|| Port::toward(self.source, self.target)),
            self.target_port
                .unwrap_or_else(|| Port::toward(self.target, self.source)),
        )
    }
}

/// Builds paths for every line style.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathRenderer {
    /// Router used by the orthogonal and smart styles.
    pub router: OrthogonalRouter,
    /// Tunables for the other styles.
    pub config: RenderConfig,
}

impl PathRenderer {
    /// Create a renderer.
    pub const fn new(router: OrthogonalRouter, config: RenderConfig) -> Self {
        Self { router, config }
    }

    /// Draw `request`. Non-finite endpoints yield an empty result.
    pub fn render(&self, request: &RenderRequest<'_>) -> RouteResult {
        if !is_finite_point(request.source) || !is_finite_point(request.target) {
            return RouteResult::empty();
        }
        match request.style {
            LineStyle::Straight => self.straight(request),
            LineStyle::Curved => self.curved(request),
            LineStyle::Arc => self.arc(request),
            LineStyle::Orthogonal => self.orthogonal(request),
            LineStyle::Smart => self.smart(request),
        }
    }

    /// Resolve `connection` against `nodes` and draw it.
    ///
    /// Every node other than the connection's own is an obstacle. A connection
    /// attached to a missing node yields an empty result.
    pub fn render_connection<K: PartialEq>(
        &self,
        connection: &Connection<K>,
        nodes: &[Node<K>],
    ) -> RouteResult {
        let (Some(source), Some(target)) = (
            connection.source.resolve(nodes),
            connection.target.resolve(nodes),
        ) else {
            return RouteResult::empty();
        };
        let obstacles = obstacles_for(connection, nodes);
        self.render(&RenderRequest {
            style: connection.line_style,
            source: source.point,
            target: target.point,
            source_port: source.port,
            target_port: target.port,
            source_bounds: source.bounds,
            target_bounds: target.bounds,
            waypoints: &connection.waypoints,
            obstacles: &obstacles,
            curve_amount: connection.curve_amount,
            corner_radius: connection.style.corner_radius,
            sharp: connection.style.sharp,
        })
    }

    fn straight(&self, request: &RenderRequest<'_>) -> RouteResult {
        let (s, t) = (request.source, request.target);
        if !request.waypoints.is_empty() {
            let mut points = Vec::with_capacity(request.waypoints.len() + 2);
            points.push(s);
            points.extend_from_slice(request.waypoints);
            points.push(t);
            return RouteResult::from_points(points, 0.0, false);
        }
        let (a, b) = self.snap_straight(request);
        RouteResult::from_points(vec![a, b], 0.0, false)
    }

    /// Endpoints of a straight connector, nudged onto a shared axis when they
    /// are nearly aligned and the nudged end stays on its side.
    fn snap_straight(&self, request: &RenderRequest<'_>) -> (Point, Point) {
        let (s, t) = (request.source, request.target);
        let d = t - s;
        let axis = if d.x.abs() >= d.y.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let (sa, ta) = (axis.across(s), axis.across(t));
        if (ta - sa).abs() > self.config.snap_threshold || sa == ta {
            return (s, t);
        }
        if can_slide(request.target_port, request.target_bounds, axis, ta, sa) {
            (s, axis.point(axis.along(t), sa))
        } else if can_slide(request.source_port, request.source_bounds, axis, sa, ta) {
            (axis.point(axis.along(s), ta), t)
        } else {
            (s, t)
        }
    }

    fn curved(&self, request: &RenderRequest<'_>) -> RouteResult {
        let (s, t) = (request.source, request.target);
        if let Some(amount) = request.curve_amount.filter(|a| a.is_finite()) {
            return curve_result(quad_with_amount(s, t, amount), s, t);
        }
        let (ps, pt) = request.ports();
        let offset = (s.distance(t) * self.config.curve_offset_ratio).min(self.config.max_curve_offset);
        let default = CubicBez::new(s, s + ps.normal() * offset, t + pt.normal() * offset, t);
        let padded = self.padded(request.obstacles);
        if self.curve_clear(&default, &padded) {
            return curve_result(default, s, t);
        }
        let distance = s.distance(t);
        for amount in self.trial_amounts(distance) {
            let quad = quad_with_amount(s, t, amount);
            if self.curve_clear(&quad, &padded) {
                return curve_result(quad, s, t);
            }
        }
        curve_result(default, s, t)
    }

    fn arc(&self, request: &RenderRequest<'_>) -> RouteResult {
        let (s, t) = (request.source, request.target);
        if let Some(amount) = request.curve_amount.filter(|a| a.is_finite()) {
            return curve_result(arc_with_amount(s, t, amount), s, t);
        }
        let distance = s.distance(t);
        let default = arc_with_bulge(s, t, distance * self.config.arc_bulge_ratio);
        let padded = self.padded(request.obstacles);
        if self.curve_clear(&default, &padded) {
            return curve_result(default, s, t);
        }
        for amount in self.trial_amounts(distance) {
            let arc = arc_with_amount(s, t, amount);
            if self.curve_clear(&arc, &padded) {
                return curve_result(arc, s, t);
            }
        }
        curve_result(default, s, t)
    }

    fn orthogonal(&self, request: &RenderRequest<'_>) -> RouteResult {
        let (ps, pt) = request.ports();
        self.router.route(
            request.source,
            request.target,
            ps,
            pt,
            &RouteOptions {
                waypoints: request.waypoints,
                source_bounds: request.source_bounds,
                target_bounds: request.target_bounds,
                obstacles: request.obstacles,
                sharp: request.sharp,
                corner_radius: request.corner_radius,
            },
        )
    }

    fn smart(&self, request: &RenderRequest<'_>) -> RouteResult {
        if !request.waypoints.is_empty() {
            return self.orthogonal(request);
        }
        let (s, t) = (request.source, request.target);
        let blocked = self
            .padded(request.obstacles)
            .iter()
            .chain(request.source_bounds.iter())
            .chain(request.target_bounds.iter())
            .any(|r| segment_intersects_rect(s, t, *r));
        if blocked {
            return self.orthogonal(request);
        }
        let d = t - s;
        if d.x.abs() <= self.config.snap_threshold || d.y.abs() <= self.config.snap_threshold {
            self.straight(request)
        } else {
            self.curved(request)
        }
    }

    fn padded(&self, obstacles: &[Rect]) -> Vec<Rect> {
        obstacles
            .iter()
            .map(|r| pad(*r, self.config.obstacle_padding))
            .collect()
    }

    /// Signed curve amounts to try, smallest first, positive before negative.
    fn trial_amounts(&self, distance: f64) -> impl Iterator<Item = f64> + '_ {
        self.config
            .trial_scales
            .iter()
            .flat_map(move |scale| [scale * distance, -scale * distance])
    }

    /// Whether the polyline through `curve_samples` samples of `curve` stays
    /// clear of every rect.
    fn curve_clear<C: ParamCurve>(&self, curve: &C, padded: &[Rect]) -> bool {
        if padded.is_empty() {
            return true;
        }
        let n = self.config.curve_samples.max(1);
        let mut prev = curve.eval(0.0);
        for i in 1..=n {
            #[allow(
                clippy::cast_precision_loss,
                reason = "sample counts are small; precision loss is irrelevant."
            )]
            let p = curve.eval(i as f64 / n as f64);
            if padded.iter().any(|r| segment_intersects_rect(prev, p, *r)) {
                return false;
            }
            prev = p;
        }
        true
    }
}

/// Unit left normal of the chord `s -> t`, or zero for a degenerate chord.
fn left_normal(s: Point, t: Point) -> Vec2 {
    let d = t - s;
    let len = d.hypot();
    if len > 0.0 {
        Vec2::new(d.y, -d.x) / len
    } else {
        Vec2::ZERO
    }
}

/// Quadratic whose apex sits `amount` from the chord midpoint.
pub fn quad_with_amount(s: Point, t: Point, amount: f64) -> QuadBez {
    let control = s.midpoint(t) + left_normal(s, t) * (2.0 * amount);
    QuadBez::new(s, control, t)
}

/// Symmetric cubic whose controls sit `bulge` off the chord at each end.
///
/// The apex of such a cubic lies `0.75 * bulge` from the chord.
pub fn arc_with_bulge(s: Point, t: Point, bulge: f64) -> CubicBez {
    let n = left_normal(s, t) * bulge;
    CubicBez::new(s, s + n, t + n, t)
}

/// Symmetric cubic whose apex sits `amount` from the chord midpoint.
pub fn arc_with_amount(s: Point, t: Point, amount: f64) -> CubicBez {
    arc_with_bulge(s, t, amount * 4.0 / 3.0)
}

fn curve_result(seg: impl Into<PathSeg>, s: Point, t: Point) -> RouteResult {
    RouteResult {
        path: BezPath::from_path_segments(core::iter::once(seg.into())),
        points: vec![s, t],
        segments: Vec::new(),
        orthogonal: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Endpoint;
    use kurbo::{PathEl, Size};
    use wayline_geom::rect_from_xywh;

    #[test]
    fn straight_snaps_when_nearly_aligned() {
        let renderer = PathRenderer::default();
        let r = renderer.render(&RenderRequest::new(
            LineStyle::Straight,
            Point::new(0.0, 0.0),
            Point::new(200.0, 10.0),
        ));
        assert_eq!(r.points, [Point::new(0.0, 0.0), Point::new(200.0, 0.0)]);
        assert!(!r.orthogonal);

        let r = renderer.render(&RenderRequest::new(
            LineStyle::Straight,
            Point::new(0.0, 0.0),
            Point::new(200.0, 40.0),
        ));
        assert_eq!(r.points, [Point::new(0.0, 0.0), Point::new(200.0, 40.0)]);
    }

    #[test]
    fn straight_snap_keeps_attached_ends_on_their_side() {
        let renderer = PathRenderer::default();
        let request = RenderRequest {
            source_port: Some(Port::Right),
            source_bounds: Some(Rect::new(0.0, 0.0, 120.0, 60.0)),
            target_port: Some(Port::Top),
            target_bounds: Some(Rect::new(300.0, 40.0, 420.0, 100.0)),
            ..RenderRequest::new(LineStyle::Straight, Point::new(120.0, 30.0), Point::new(360.0, 40.0))
        };
        // A top port cannot slide up or down; the right port can, within its side.
        let r = renderer.render(&request);
        assert_eq!(r.points, [Point::new(120.0, 40.0), Point::new(360.0, 40.0)]);
    }

    #[test]
    fn straight_through_waypoints() {
        let renderer = PathRenderer::default();
        let waypoints = [Point::new(50.0, 80.0)];
        let request = RenderRequest {
            waypoints: &waypoints,
            ..RenderRequest::new(LineStyle::Straight, Point::new(0.0, 0.0), Point::new(100.0, 0.0))
        };
        let r = renderer.render(&request);
        assert_eq!(r.points.len(), 3);
        assert_eq!(r.segments.len(), 2);
        assert_eq!(r.path.elements().len(), 3);
    }

    #[test]
    fn curved_uses_port_normals() {
        let renderer = PathRenderer::default();
        let request = RenderRequest {
            source_port: Some(Port::Right),
            target_port: Some(Port::Left),
            ..RenderRequest::new(LineStyle::Curved, Point::new(0.0, 0.0), Point::new(300.0, 100.0))
        };
        let r = renderer.render(&request);
        // Offset capped at 80.
        assert_eq!(
            r.path.elements()[1],
            PathEl::CurveTo(Point::new(80.0, 0.0), Point::new(220.0, 100.0), Point::new(300.0, 100.0))
        );
    }

    #[test]
    fn curve_amount_is_the_apex_offset() {
        let renderer = PathRenderer::default();
        let request = RenderRequest {
            curve_amount: Some(20.0),
            ..RenderRequest::new(LineStyle::Curved, Point::new(0.0, 0.0), Point::new(100.0, 0.0))
        };
        let r = renderer.render(&request);
        let PathEl::QuadTo(c, end) = r.path.elements()[1] else {
            panic!("expected a quadratic, got {:?}", r.path.elements());
        };
        let quad = QuadBez::new(Point::new(0.0, 0.0), c, end);
        // Left of a rightward chord is up (negative y).
        assert_eq!(quad.eval(0.5), Point::new(50.0, -20.0));

        let arc = arc_with_amount(Point::new(0.0, 0.0), Point::new(100.0, 0.0), -30.0);
        let apex = arc.eval(0.5);
        assert!((apex.y - 30.0).abs() < 1e-9, "{apex:?}");
    }

    #[test]
    fn arc_default_bulge() {
        let renderer = PathRenderer::default();
        let r = renderer.render(&RenderRequest::new(
            LineStyle::Arc,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        ));
        assert_eq!(
            r.path.elements()[1],
            PathEl::CurveTo(Point::new(0.0, -40.0), Point::new(100.0, -40.0), Point::new(100.0, 0.0))
        );
    }

    #[test]
    fn blocked_curves_try_alternatives() {
        let renderer = PathRenderer::default();
        // Sits on the default arc's apex (y = -30), leaving the other side free.
        let obstacles = [rect_from_xywh(40.0, -40.0, 20.0, 20.0)];
        let request = RenderRequest {
            obstacles: &obstacles,
            ..RenderRequest::new(LineStyle::Arc, Point::new(0.0, 0.0), Point::new(100.0, 0.0))
        };
        let r = renderer.render(&request);
        let PathEl::CurveTo(c1, c2, _) = r.path.elements()[1] else {
            panic!("expected a cubic");
        };
        let arc = CubicBez::new(Point::new(0.0, 0.0), c1, c2, Point::new(100.0, 0.0));
        assert!(renderer.curve_clear(&arc, &renderer.padded(&obstacles)));
        assert!(arc.eval(0.5).y > 0.0, "the curve should flip below the chord");
    }

    #[test]
    fn smart_picks_by_clearance() {
        let renderer = PathRenderer::default();
        let aligned = renderer.render(&RenderRequest::new(
            LineStyle::Smart,
            Point::new(0.0, 0.0),
            Point::new(200.0, 5.0),
        ));
        assert_eq!(aligned.path.elements().len(), 2);
        assert!(!aligned.orthogonal);

        let diagonal = renderer.render(&RenderRequest::new(
            LineStyle::Smart,
            Point::new(0.0, 0.0),
            Point::new(200.0, 100.0),
        ));
        assert!(matches!(diagonal.path.elements()[1], PathEl::CurveTo(..)));

        let obstacles = [rect_from_xywh(80.0, 20.0, 40.0, 40.0)];
        let request = RenderRequest {
            obstacles: &obstacles,
            ..RenderRequest::new(LineStyle::Smart, Point::new(0.0, 0.0), Point::new(200.0, 100.0))
        };
        let blocked = renderer.render(&request);
        assert!(blocked.orthogonal);
    }

    #[test]
    fn render_connection_resolves_nodes() {
        let renderer = PathRenderer::default();
        let nodes = [
            Node::new(1, (0.0, 0.0), None),
            Node::new(2, (300.0, 0.0), Some(Size::new(120.0, 60.0))),
            Node::new(3, (180.0, -20.0), Some(Size::new(40.0, 100.0))),
        ];
        let c = Connection::new(9, Endpoint::attached(1, Port::Right), Endpoint::attached(2, Port::Left));
        let r = renderer.render_connection(&c, &nodes);
        assert!(r.orthogonal);
        assert!(r.points.len() > 2, "node 3 is in the way");

        let dangling = Connection::new(9, Endpoint::attached(1, Port::Right), Endpoint::attached(7, Port::Left));
        assert!(renderer.render_connection(&dangling, &nodes).is_empty());
    }

    #[test]
    fn non_finite_endpoints_are_empty() {
        let renderer = PathRenderer::default();
        for style in [
            LineStyle::Straight,
            LineStyle::Curved,
            LineStyle::Arc,
            LineStyle::Orthogonal,
            LineStyle::Smart,
        ] {
            let r = renderer.render(&RenderRequest::new(style, Point::new(f64::NAN, 0.0), Point::ZERO));
            assert!(r.is_empty());
        }
    }
}
