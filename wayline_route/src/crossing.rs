// Copyright 2025 the Wayline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossings between orthogonal connectors, and bridge rendering.
//!
//! Every pair of distinct connectors is checked run against run, so the cost
//! grows with the square of both the connector count and the run count per
//! route. Runs whose bounding boxes do not touch are skipped before the
//! intersection test.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Rect};
use wayline_geom::{ALIGN_EPSILON, build_gapped_path, segments_cross};

use crate::RouteResult;

/// Fraction of each run excluded at both ends, so runs that merely meet at
/// an endpoint do not count as crossing.
pub const CROSSING_MARGIN: f64 = 0.01;

/// Default width of the gap drawn at a bridge.
pub const DEFAULT_BRIDGE_GAP: f64 = 10.0;

/// One connector's polyline as seen by [`find_crossings`].
#[derive(Clone, Copy, Debug)]
pub struct CrossingPath<'a, K> {
    /// Connector identity.
    pub id: K,
    /// Route polyline.
    pub points: &'a [Point],
    /// Only orthogonal routes take part.
    pub orthogonal: bool,
}

impl<'a, K> CrossingPath<'a, K> {
    /// View a computed route.
    pub fn from_route(id: K, route: &'a RouteResult) -> Self {
        Self {
            id,
            points: &route.points,
            orthogonal: route.orthogonal,
        }
    }
}

/// Where two connectors cross.
#[derive(Clone, Debug, PartialEq)]
pub struct Crossing<K> {
    /// Crossing position.
    pub point: Point,
    /// Whether the first connector's run is horizontal there.
    pub first_horizontal: bool,
    /// First connector.
    pub first: K,
    /// Second connector.
    pub second: K,
    /// Run index on the first connector.
    pub first_segment: usize,
    /// Run index on the second connector.
    pub second_segment: usize,
}

impl<K> Crossing<K> {
    /// The connector and run drawn with a gap: always the one that is not
    /// horizontal, so horizontal runs pass over vertical ones.
    pub fn gapped(&self) -> (&K, usize) {
        if self.first_horizontal {
            (&self.second, self.second_segment)
        } else {
            (&self.first, self.first_segment)
        }
    }
}

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// All crossings between distinct orthogonal connectors in `paths`.
///
/// Pairs are reported once, in input order. Paths sharing an id are never
/// compared.
pub fn find_crossings<K: Clone + PartialEq>(paths: &[CrossingPath<'_, K>]) -> Vec<Crossing<K>> {
    let mut out = Vec::new();
    for (i, a) in paths.iter().enumerate() {
        if !a.orthogonal {
            continue;
        }
        for b in paths[i + 1..].iter().filter(|b| b.orthogonal && b.id != a.id) {
            for (ka, wa) in a.points.windows(2).enumerate() {
                let box_a = Rect::from_points(wa[0], wa[1]);
                for (kb, wb) in b.points.windows(2).enumerate() {
                    if !touches(box_a, Rect::from_points(wb[0], wb[1])) {
                        continue;
                    }
                    let Some(hit) = segments_cross(wa[0], wa[1], wb[0], wb[1], CROSSING_MARGIN)
                    else {
                        continue;
                    };
                    out.push(Crossing {
                        point: hit.point,
                        first_horizontal: (wa[0].y - wa[1].y).abs() < ALIGN_EPSILON,
                        first: a.id.clone(),
                        second: b.id.clone(),
                        first_segment: ka,
                        second_segment: kb,
                    });
                }
            }
        }
    }
    if !out.is_empty() {
        tracing::trace!(crossings = out.len(), "found connector crossings");
    }
    out
}

/// Crossing points where connector `id` should leave a gap.
pub fn gaps_for<K: PartialEq>(crossings: &[Crossing<K>], id: &K) -> Vec<Point> {
    crossings
        .iter()
        .filter(|c| c.gapped().0 == id)
        .map(|c| c.point)
        .collect()
}

/// A rounded polyline with a `gap`-wide break at each point in `gaps`.
///
/// Only gaps that fit wholly on a straight part of a run are drawn. A gap
/// point inside a rounded corner, or closer than half a gap to where the
/// corner's curve starts, is skipped and the line is drawn unbroken there.
pub fn bridged_path(points: &[Point], gaps: &[Point], radius: f64, gap: f64) -> BezPath {
    build_gapped_path(points, radius, gaps, gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    const H: [Point; 2] = [Point::new(0.0, 50.0), Point::new(100.0, 50.0)];
    const V: [Point; 2] = [Point::new(50.0, 0.0), Point::new(50.0, 100.0)];

    fn path<'a>(id: u32, points: &'a [Point]) -> CrossingPath<'a, u32> {
        CrossingPath {
            id,
            points,
            orthogonal: true,
        }
    }

    #[test]
    fn crossing_in_the_middle() {
        let crossings = find_crossings(&[path(1, &H), path(2, &V)]);
        assert_eq!(
            crossings,
            [Crossing {
                point: Point::new(50.0, 50.0),
                first_horizontal: true,
                first: 1,
                second: 2,
                first_segment: 0,
                second_segment: 0,
            }]
        );
        assert_eq!(crossings[0].gapped(), (&2, 0));
        assert_eq!(gaps_for(&crossings, &2), [Point::new(50.0, 50.0)]);
        assert!(gaps_for(&crossings, &1).is_empty());
    }

    #[test]
    fn shared_endpoints_do_not_cross() {
        let a = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let b = [Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
        assert!(find_crossings(&[path(1, &a), path(2, &b)]).is_empty());
    }

    #[test]
    fn only_distinct_orthogonal_paths_take_part() {
        assert!(find_crossings(&[path(1, &H), path(1, &V)]).is_empty());
        let curve = CrossingPath {
            id: 2,
            points: &V[..],
            orthogonal: false,
        };
        assert!(find_crossings(&[path(1, &H), curve]).is_empty());
    }

    #[test]
    fn multi_run_routes_report_run_indices() {
        let a = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 40.0),
            Point::new(200.0, 40.0),
        ];
        let b = [
            Point::new(100.0, -20.0),
            Point::new(100.0, 10.0),
            Point::new(150.0, 10.0),
            Point::new(150.0, 90.0),
        ];
        let crossings = find_crossings(&[path(7, &b), path(3, &a)]);
        assert_eq!(crossings.len(), 1);
        let c = &crossings[0];
        assert_eq!(c.point, Point::new(150.0, 40.0));
        assert!(!c.first_horizontal);
        assert_eq!((c.first_segment, c.second_segment), (2, 1));
        assert_eq!(c.gapped(), (&7, 2));
    }

    #[test]
    fn bridge_breaks_the_vertical_run() {
        let path = bridged_path(&V, &[Point::new(50.0, 50.0)], 8.0, DEFAULT_BRIDGE_GAP);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(50.0, 0.0)),
                PathEl::LineTo(Point::new(50.0, 45.0)),
                PathEl::MoveTo(Point::new(50.0, 55.0)),
                PathEl::LineTo(Point::new(50.0, 100.0)),
            ]
        );
    }

    #[test]
    fn gap_inside_a_rounded_corner_is_skipped() {
        let l = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
        // The corner's curve starts at x = 80; (95, 0) lies inside it.
        let path = bridged_path(&l, &[Point::new(95.0, 0.0)], 20.0, DEFAULT_BRIDGE_GAP);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(80.0, 0.0)),
                PathEl::QuadTo(Point::new(100.0, 0.0), Point::new(100.0, 20.0)),
                PathEl::LineTo(Point::new(100.0, 100.0)),
            ]
        );
    }
}
