// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open curves: quadratic and cubic Béziers, and elliptical arcs.
//!
//! Béziers use kurbo's nearest-point projection and curve/line intersection
//! directly. Arcs are flattened to cubic Béziers first; the flattening
//! tolerance bounds the error of every query.

use alloc::vec::Vec;

use kurbo::{
    Arc, CubicBez, Line, ParamCurveExtrema, PathSeg, Point, QuadBez, Rect, Shape, Vec2,
};

use crate::outline::{self, FLATTEN_TOLERANCE};
use crate::{NoNormal, SpatialQuery};

fn closest(segs: impl IntoIterator<Item = PathSeg>, pt: Point) -> Option<Point> {
    outline::nearest(segs, pt).map(|n| n.point)
}

fn open_normal(segs: impl IntoIterator<Item = PathSeg>, pt: Point) -> Result<Vec2, NoNormal> {
    let near = outline::nearest(segs, pt).ok_or(NoNormal)?;
    outline::normal_at(near, pt, false, |_| false).ok_or(NoNormal)
}

impl SpatialQuery for QuadBez {
    fn contains_point(&self, _pt: Point) -> bool {
        false
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        closest([PathSeg::Quad(*self)], pt)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        open_normal([PathSeg::Quad(*self)], pt)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect([PathSeg::Quad(*self)], line)
    }

    fn bounds(&self) -> Rect {
        ParamCurveExtrema::bounding_box(self)
    }
}

impl SpatialQuery for CubicBez {
    fn contains_point(&self, _pt: Point) -> bool {
        false
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        closest([PathSeg::Cubic(*self)], pt)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        open_normal([PathSeg::Cubic(*self)], pt)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect([PathSeg::Cubic(*self)], line)
    }

    fn bounds(&self) -> Rect {
        ParamCurveExtrema::bounding_box(self)
    }
}

/// Arcs are outlines only. A zero sweep or zero radii collapse to a point,
/// which still has a closest point but no normal.
impl SpatialQuery for Arc {
    fn contains_point(&self, _pt: Point) -> bool {
        false
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        closest(self.to_path(FLATTEN_TOLERANCE).segments(), pt)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        open_normal(self.to_path(FLATTEN_TOLERANCE).segments(), pt)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        outline::intersect(self.to_path(FLATTEN_TOLERANCE).segments(), line)
    }

    fn bounds(&self) -> Rect {
        Shape::bounding_box(self)
    }
}
