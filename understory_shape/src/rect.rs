// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned rectangles.

use alloc::vec::Vec;

use kurbo::{Line, PathSeg, Point, Rect, Vec2};

use crate::outline;
use crate::{CONTAINS_TOLERANCE, NoNormal, SpatialQuery};

/// Extents with `x1 < x0` or `y1 < y0` collapse to zero width or height.
fn clamped(r: &Rect) -> Rect {
    Rect::new(r.x0, r.y0, r.x1.max(r.x0), r.y1.max(r.y0))
}

fn edges(r: Rect) -> [PathSeg; 4] {
    [
        PathSeg::Line(Line::new((r.x0, r.y0), (r.x1, r.y0))),
        PathSeg::Line(Line::new((r.x1, r.y0), (r.x1, r.y1))),
        PathSeg::Line(Line::new((r.x1, r.y1), (r.x0, r.y1))),
        PathSeg::Line(Line::new((r.x0, r.y1), (r.x0, r.y0))),
    ]
}

/// Closest boundary point and the outward normal there.
///
/// The normal is `None` only for a zero-size rectangle queried at its corner.
fn nearest_side(r: Rect, pt: Point) -> (Point, Option<Vec2>) {
    let clamped = Point::new(pt.x.clamp(r.x0, r.x1), pt.y.clamp(r.y0, r.y1));
    if clamped != pt {
        let away = pt - clamped;
        return (clamped, Some(away.normalize()));
    }
    // Inside (or on the boundary): project onto the nearest edge.
    // Ties resolve left, right, top, bottom.
    let candidates = [
        (pt.x - r.x0, Point::new(r.x0, pt.y), Vec2::new(-1.0, 0.0)),
        (r.x1 - pt.x, Point::new(r.x1, pt.y), Vec2::new(1.0, 0.0)),
        (pt.y - r.y0, Point::new(pt.x, r.y0), Vec2::new(0.0, -1.0)),
        (r.y1 - pt.y, Point::new(pt.x, r.y1), Vec2::new(0.0, 1.0)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.0 < best.0 {
            best = *c;
        }
    }
    if r.width() == 0.0 && r.height() == 0.0 {
        return (best.1, None);
    }
    (best.1, Some(best.2))
}

/// Rectangles are filled and keyed by their top-left corner `(x0, y0)`.
impl SpatialQuery for Rect {
    fn contains_point(&self, pt: Point) -> bool {
        let r = clamped(self);
        pt.x >= r.x0 - CONTAINS_TOLERANCE
            && pt.x <= r.x1 + CONTAINS_TOLERANCE
            && pt.y >= r.y0 - CONTAINS_TOLERANCE
            && pt.y <= r.y1 + CONTAINS_TOLERANCE
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        Some(nearest_side(clamped(self), pt).0)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        nearest_side(clamped(self), pt).1.ok_or(NoNormal)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect(edges(clamped(self)), line)
    }

    fn bounds(&self) -> Rect {
        clamped(self)
    }
}
