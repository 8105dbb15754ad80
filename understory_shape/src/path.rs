// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbitrary paths built from move/line/quad/cubic/arc/close commands.
//!
//! Paths are plain [`BezPath`]s. Arcs are appended as cubic Béziers with
//! [`append_arc`]. A path is filled (non-zero rule) only when every subpath
//! ends with `ClosePath`; otherwise it is an outline and never contains a
//! point.

use alloc::vec::Vec;

use kurbo::{Arc, BezPath, Line, PathEl, Point, Rect, Shape, Vec2};

use crate::outline::{self, FLATTEN_TOLERANCE};
use crate::{CONTAINS_TOLERANCE, NoNormal, SpatialQuery};

/// Append `arc` to `path` the way a canvas `arc` command does.
///
/// If `path` has an open subpath, a straight line joins its current point to
/// the start of the arc; otherwise the arc begins a new subpath.
pub fn append_arc(path: &mut BezPath, arc: &Arc) {
    let mut elements = arc.path_elements(FLATTEN_TOLERANCE);
    let Some(PathEl::MoveTo(start)) = elements.next() else {
        return;
    };
    let open = path
        .elements()
        .last()
        .is_some_and(|el| !matches!(el, PathEl::ClosePath));
    if open {
        path.line_to(start);
    } else {
        path.move_to(start);
    }
    for el in elements {
        path.push(el);
    }
}

pub(crate) fn every_subpath_closed(path: &BezPath) -> bool {
    let mut drawing = false;
    let mut open = false;
    for el in path.elements() {
        match el {
            PathEl::MoveTo(_) => {
                if open {
                    return false;
                }
            }
            PathEl::LineTo(_) | PathEl::QuadTo(..) | PathEl::CurveTo(..) => {
                drawing = true;
                open = true;
            }
            PathEl::ClosePath => open = false,
        }
    }
    drawing && !open
}

impl SpatialQuery for BezPath {
    fn contains_point(&self, pt: Point) -> bool {
        every_subpath_closed(self)
            && (Shape::winding(self, pt) != 0 || self.distance_to(pt) <= CONTAINS_TOLERANCE)
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        outline::nearest(self.segments(), pt).map(|n| n.point)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        let near = outline::nearest(self.segments(), pt).ok_or(NoNormal)?;
        let filled = every_subpath_closed(self);
        outline::normal_at(near, pt, filled, |p| Shape::winding(self, p) != 0).ok_or(NoNormal)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect(self.segments(), line)
    }

    fn bounds(&self) -> Rect {
        Shape::bounding_box(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn square(close: bool) -> BezPath {
        let mut p = BezPath::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 0.0));
        p.line_to((10.0, 10.0));
        p.line_to((0.0, 10.0));
        if close {
            p.close_path();
        }
        p
    }

    /// A "D": a vertical edge closed by a half circle bulging to the right.
    fn half_disk() -> BezPath {
        let mut p = BezPath::new();
        p.move_to((0.0, 10.0));
        p.line_to((0.0, -10.0));
        append_arc(
            &mut p,
            &Arc {
                center: Point::ZERO,
                radii: Vec2::new(10.0, 10.0),
                start_angle: -PI / 2.0,
                sweep_angle: PI,
                x_rotation: 0.0,
            },
        );
        p.close_path();
        p
    }

    #[test]
    fn closed_path_contains() {
        let p = square(true);
        assert!(p.contains_point(Point::new(5.0, 5.0)));
        assert!(p.contains_point(Point::new(10.0, 5.0)));
        assert!(!p.contains_point(Point::new(15.0, 5.0)));
    }

    #[test]
    fn unclosed_path_never_contains() {
        let p = square(false);
        assert!(!p.contains_point(Point::new(5.0, 5.0)));
        // The missing closing edge is not part of the outline either, so the
        // nearest boundary points are the corners (0, 0) and (0, 10).
        assert!((p.distance_to(Point::new(-3.0, 5.0)) - 34_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn any_open_subpath_disables_fill() {
        let mut p = square(true);
        p.move_to((20.0, 0.0));
        p.line_to((30.0, 0.0));
        assert!(!p.contains_point(Point::new(5.0, 5.0)));
    }

    #[test]
    fn arc_joins_the_open_subpath() {
        let p = half_disk();
        // move, line, then the arc continues with a line to its start point.
        assert!(matches!(p.elements()[2], PathEl::LineTo(_)));
        assert!(p.contains_point(Point::new(5.0, 0.0)));
        assert!(!p.contains_point(Point::new(-1.0, 0.0)));
        assert!((p.distance_to(Point::new(20.0, 0.0)) - 10.0).abs() < 0.01);
    }

    #[test]
    fn normals_point_out_of_the_fill() {
        let p = half_disk();
        let n = p.closest_normal_to(Point::new(1.0, 0.0)).unwrap();
        assert!((n - Vec2::new(-1.0, 0.0)).hypot() < 1e-9);
        let n = p.closest_normal_to(Point::new(9.0, 0.0)).unwrap();
        assert!((n - Vec2::new(1.0, 0.0)).hypot() < 1e-2);
    }

    #[test]
    fn segment_crosses_line_and_curve() {
        let p = half_disk();
        let hits = p.intersects_segment(-5.0, 0.0, 15.0, 0.0);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].x.abs() < 1e-9);
        assert!((hits[1].x - 10.0).abs() < 0.01);
    }

    #[test]
    fn empty_path() {
        let p = BezPath::new();
        assert_eq!(p.closest_point_to(Point::ZERO), None);
        assert_eq!(p.closest_normal_to(Point::ZERO), Err(NoNormal));
        assert!(!p.contains_point(Point::ZERO));
        assert!(p.intersects_segment(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
