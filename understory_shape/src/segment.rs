// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight segments.
//!
//! A segment has no interior, so [`SpatialQuery::contains_point`] is always
//! `false`. Its normal is perpendicular to the segment and faces the query
//! point, which also holds past either endpoint.

use alloc::vec::Vec;

use kurbo::{Line, ParamCurveNearest, PathSeg, Point, Rect, Vec2};

use crate::outline::{self, NEAREST_ACCURACY};
use crate::{NoNormal, SpatialQuery};

impl SpatialQuery for Line {
    fn contains_point(&self, _pt: Point) -> bool {
        false
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        if self.p0 == self.p1 {
            return Some(self.p0);
        }
        let t = self.nearest(pt, NEAREST_ACCURACY).t;
        Some(self.p0.lerp(self.p1, t))
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        let closest = self.closest_point_to(pt).ok_or(NoNormal)?;
        let dir = outline::tangent(PathSeg::Line(*self), 0.0).ok_or(NoNormal)?;
        Ok(outline::orient_toward(
            outline::perpendicular(dir),
            closest,
            pt,
        ))
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect([PathSeg::Line(*self)], line)
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }
}
