// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ellipses.
//!
//! Queries run in the ellipse's own frame (centered, unrotated), where the
//! boundary is `(rx·cos θ, ry·sin θ)`. The closest point is found by sampling
//! θ and refining with a golden-section search, which converges for every
//! radius pair including zero radii.

use alloc::vec::Vec;
use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Ellipse, Line, ParamCurve, Point, Rect, Shape, Vec2};

use crate::circle::line_circle_params;
use crate::outline::sorted_along;
use crate::{CONTAINS_TOLERANCE, NoNormal, SpatialQuery};

const SAMPLES: usize = 64;
const REFINE_STEPS: usize = 60;

/// Center, clamped radii, and the rigid frame mapping ellipse space to local space.
fn frame(e: &Ellipse) -> (f64, f64, Affine) {
    let radii = e.radii();
    let frame = Affine::translate(e.center().to_vec2()) * Affine::rotate(e.rotation());
    (radii.x.max(0.0), radii.y.max(0.0), frame)
}

fn on_boundary(rx: f64, ry: f64, theta: f64) -> Point {
    let (s, c) = theta.sin_cos();
    Point::new(rx * c, ry * s)
}

/// Parametric angle of the boundary point closest to `q` (ellipse space).
fn closest_angle(rx: f64, ry: f64, q: Point) -> f64 {
    let dist = |theta: f64| on_boundary(rx, ry, theta).distance_squared(q);
    let step = TAU / SAMPLES as f64;
    let mut best = 0.0;
    let mut best_d = dist(0.0);
    for i in 1..SAMPLES {
        let theta = step * i as f64;
        let d = dist(theta);
        if d < best_d {
            best = theta;
            best_d = d;
        }
    }
    // Golden-section search on the bracket around the best sample.
    let ratio = 0.5 * (5.0_f64.sqrt() - 1.0);
    let (mut lo, mut hi) = (best - step, best + step);
    for _ in 0..REFINE_STEPS {
        let m1 = hi - ratio * (hi - lo);
        let m2 = lo + ratio * (hi - lo);
        if dist(m1) < dist(m2) {
            hi = m2;
        } else {
            lo = m1;
        }
    }
    let refined = 0.5 * (lo + hi);
    if dist(refined) <= best_d {
        refined
    } else {
        best
    }
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// Ellipses are filled. Negative radii are treated as zero.
impl SpatialQuery for Ellipse {
    fn contains_point(&self, pt: Point) -> bool {
        let (rx, ry, frame) = frame(self);
        if rx > 0.0 && ry > 0.0 {
            let q = frame.inverse() * pt;
            if (q.x / rx).powi(2) + (q.y / ry).powi(2) <= 1.0 {
                return true;
            }
        }
        self.distance_to(pt) <= CONTAINS_TOLERANCE
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        let (rx, ry, frame) = frame(self);
        let q = frame.inverse() * pt;
        Some(frame * on_boundary(rx, ry, closest_angle(rx, ry, q)))
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        let (rx, ry, frame) = frame(self);
        if rx <= 0.0 || ry <= 0.0 {
            return Err(NoNormal);
        }
        let q = frame.inverse() * pt;
        let c = on_boundary(rx, ry, closest_angle(rx, ry, q));
        let gradient = Vec2::new(c.x / (rx * rx), c.y / (ry * ry));
        if gradient.hypot2() == 0.0 {
            return Err(NoNormal);
        }
        Ok(rotate(gradient.normalize(), self.rotation()))
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        let (rx, ry, frame) = frame(self);
        if rx <= 0.0 || ry <= 0.0 {
            return Vec::new();
        }
        // Squash the ellipse into the unit circle; line parameters survive
        // any affine map, so they apply to the original segment unchanged.
        let to_unit = Affine::scale_non_uniform(1.0 / rx, 1.0 / ry) * frame.inverse();
        let unit_line = Line::new(to_unit * line.p0, to_unit * line.p1);
        let hits = line_circle_params(unit_line, Point::ZERO, 1.0)
            .into_iter()
            .map(|t| (t, line.eval(t)))
            .collect();
        sorted_along(hits)
    }

    fn bounds(&self) -> Rect {
        self.bounding_box()
    }
}
