// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine and vector helpers on top of [`kurbo`].
//!
//! Kurbo multiplies right to left: `a * b` applies `b` first. The helpers
//! here take their arguments in application order instead, so that
//! `compose(local, parent_world)` reads the way a transform stack is walked.

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// The matrix has no inverse.
///
/// Returned by [`invert`] when the determinant is within [`f64::EPSILON`] of
/// zero (or not finite). Callers treat this as "no inverse transform
/// available"; hit testing, for example, reports a miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Singular;

impl fmt::Display for Singular {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("matrix is singular and has no inverse")
    }
}

impl core::error::Error for Singular {}

/// The matrix that applies `first`, then `then`.
#[inline]
pub fn compose(first: Affine, then: Affine) -> Affine {
    then * first
}

/// Invert `m`, failing with [`Singular`] when it has no inverse.
pub fn invert(m: Affine) -> Result<Affine, Singular> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= f64::EPSILON {
        return Err(Singular);
    }
    Ok(m.inverse())
}

/// Apply `m` to `pt`.
#[inline]
pub fn transform_point(m: Affine, pt: Point) -> Point {
    m * pt
}

/// Reflect `incident` about `normal`: `incident − 2·(incident·normal)·normal`.
///
/// `normal` is expected to be unit length. A non-unit normal is not an error
/// but produces an unnormalized (and generally wrong-length) result.
#[inline]
pub fn reflect(incident: Vec2, normal: Vec2) -> Vec2 {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Map a surface normal through `m` and renormalize it.
///
/// Normals transform with the inverse transpose of the linear part, so that
/// they stay perpendicular under non-uniform scale and skew. Returns `None`
/// when `m` is singular or the result vanishes.
pub fn normal_transform(m: Affine, normal: Vec2) -> Option<Vec2> {
    let [a, b, c, d, _, _] = m.as_coeffs();
    let det = a * d - b * c;
    if !det.is_finite() || det.abs() <= f64::EPSILON {
        return None;
    }
    let n = Vec2::new(d * normal.x - b * normal.y, a * normal.y - c * normal.x) * det.signum();
    let len = n.hypot();
    (len > 0.0 && len.is_finite()).then(|| n / len)
}
