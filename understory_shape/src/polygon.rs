// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygons and polylines.

use alloc::vec::Vec;

use kurbo::{Line, PathSeg, Point, Rect, Vec2};

use crate::outline;
use crate::{CONTAINS_TOLERANCE, NoNormal, SpatialQuery};

/// A sequence of points joined by straight edges.
///
/// A closed polygon adds an edge from the last point back to the first and
/// fills its interior with the non-zero winding rule. An open polygon (a
/// polyline) is only an outline and never contains a point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    /// Vertices in order.
    pub points: Vec<Point>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl Polygon {
    /// A closed, filled polygon.
    pub fn closed(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            closed: true,
        }
    }

    /// An open polyline.
    pub fn open(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            closed: false,
        }
    }

    /// The edges of the outline, including the closing edge when closed.
    pub fn segments(&self) -> impl Iterator<Item = PathSeg> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 2 => {
                Some(PathSeg::Line(Line::new(last, first)))
            }
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| PathSeg::Line(Line::new(w[0], w[1])))
            .chain(closing)
    }

    /// Non-zero winding number of the closed outline around `pt`.
    pub fn winding(&self, pt: Point) -> i32 {
        let n = self.points.len();
        let mut winding = 0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let cross = (b - a).cross(pt - a);
            if a.y <= pt.y {
                if b.y > pt.y && cross > 0.0 {
                    winding += 1;
                }
            } else if b.y <= pt.y && cross < 0.0 {
                winding -= 1;
            }
        }
        winding
    }

    fn is_filled(&self) -> bool {
        self.closed && self.points.len() >= 3
    }
}

impl SpatialQuery for Polygon {
    fn contains_point(&self, pt: Point) -> bool {
        self.is_filled() && (self.winding(pt) != 0 || self.distance_to(pt) <= CONTAINS_TOLERANCE)
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => outline::nearest(self.segments(), pt).map(|n| n.point),
        }
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        let near = outline::nearest(self.segments(), pt).ok_or(NoNormal)?;
        let filled = self.is_filled();
        outline::normal_at(near, pt, filled, |p| self.winding(p) != 0).ok_or(NoNormal)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect(self.segments(), line)
    }

    fn bounds(&self) -> Rect {
        let mut it = self.points.iter().copied();
        let Some(first) = it.next() else {
            return Rect::ZERO;
        };
        it.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p))
    }
}
