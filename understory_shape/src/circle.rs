// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circles, answered analytically.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Line, ParamCurve, Point, Rect, Vec2};

use crate::outline::sorted_along;
use crate::{CONTAINS_TOLERANCE, NoNormal, SpatialQuery};

/// Unit direction from `center` toward `pt`; `+x` when they coincide.
fn radial(center: Point, pt: Point) -> Vec2 {
    let d = pt - center;
    if d.hypot2() > 0.0 {
        d.normalize()
    } else {
        Vec2::new(1.0, 0.0)
    }
}

/// Parameters in `[0, 1]` where `line` crosses the circle `|p - center| = radius`.
pub(crate) fn line_circle_params(line: Line, center: Point, radius: f64) -> Vec<f64> {
    let d = line.p1 - line.p0;
    let f = line.p0 - center;
    let a = d.dot(d);
    if a <= 0.0 || radius <= 0.0 {
        return Vec::new();
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)]
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .collect()
}

/// Circles are filled disks. A negative radius is treated as zero.
impl SpatialQuery for Circle {
    fn contains_point(&self, pt: Point) -> bool {
        pt.distance(self.center) <= self.radius.max(0.0) + CONTAINS_TOLERANCE
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        Some(self.center + radial(self.center, pt) * self.radius.max(0.0))
    }

    fn distance_to(&self, pt: Point) -> f64 {
        (pt.distance(self.center) - self.radius.max(0.0)).abs()
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        if self.radius <= 0.0 {
            return Err(NoNormal);
        }
        Ok(radial(self.center, pt))
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        let hits = line_circle_params(line, self.center, self.radius)
            .into_iter()
            .map(|t| (t, line.eval(t)))
            .collect();
        sorted_along(hits)
    }

    fn bounds(&self) -> Rect {
        let r = self.radius.max(0.0);
        Rect::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }
}
