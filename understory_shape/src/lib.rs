// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_shape --heading-base-level=0

//! Understory Shape: spatial queries over 2D shapes in local coordinates.
//!
//! This crate provides the geometry model used by `understory_scene`: a set of
//! primitive shapes plus a composite, all answering the same questions about a
//! query point or segment, built on top of [`kurbo`]. It is intentionally
//! decoupled from any particular scene tree or event router; shapes never
//! reference nodes.
//!
//! # Key types
//!
//! - [`SpatialQuery`] – the query contract: containment, distance, closest
//!   point, closest normal, segment intersection and bounds.
//! - [`Geometry`] – a closed enum over every supported shape, with clamping
//!   constructors.
//! - [`Polygon`] – open or closed polyline.
//! - [`Composite`] – ordered children, each with its own local transform.
//! - [`math`] – affine and vector helpers (`compose`, `invert`, `reflect`).
//!
//! # Shapes and scope
//!
//! [`SpatialQuery`] is implemented directly for these [`kurbo`] primitives:
//!
//! - [`Line`] – a segment. Never contains.
//! - [`Circle`] – analytic distance and intersections.
//! - [`Rect`] – keyed by its top-left corner; inverted extents clamp to zero size.
//! - [`Ellipse`] – analytic intersections, refined parametric projection.
//! - [`Arc`] – flattened to cubic Béziers. Never contains.
//! - [`QuadBez`] and [`CubicBez`] – kurbo's nearest-point projection. Never contain.
//! - [`BezPath`] – fills with the non-zero rule, but only when every subpath is closed.
//!
//! Open shapes report normals oriented toward the query point; closed shapes
//! report outward normals.
//!
//! # Example
//!
//! Reflect a ray off the closest circle of a composite:
//!
//! ```
//! use kurbo::{Affine, Line, Point, Vec2};
//! use understory_shape::{Composite, Geometry, SpatialQuery, math};
//!
//! let mut rings = Composite::new();
//! for r in [10.0, 20.0, 30.0] {
//!     rings.push(Geometry::circle((100.0, 100.0), r), Affine::IDENTITY);
//! }
//! let rings = Geometry::from(rings);
//!
//! let hits = rings.intersects_segment(0.0, 0.0, 200.0, 200.0);
//! assert_eq!(hits.len(), 6);
//!
//! // The ray meets the outer ring head on and bounces straight back out.
//! let first = hits[0];
//! let normal = rings.closest_normal_to(first).unwrap();
//! let incident = Vec2::new(1.0, 1.0).normalize();
//! let bounced = math::reflect(incident, normal);
//! assert!(bounced.dot(normal) > 0.0);
//! assert!((bounced + incident).hypot() < 1e-6);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Line, Point, Rect, Vec2};

pub mod math;

mod circle;
mod composite;
mod curve;
mod ellipse;
mod geometry;
mod outline;
mod path;
mod polygon;
mod rect;
mod segment;

pub use composite::{Composite, CompositeChild};
pub use geometry::{Geometry, arc_sweep};
pub use path::append_arc;
pub use polygon::Polygon;

#[doc(no_inline)]
pub use kurbo::{Arc, BezPath, Circle, CubicBez, Ellipse, QuadBez};

/// Tolerance in local units under which a point on the boundary of a filled
/// shape still counts as contained.
pub const CONTAINS_TOLERANCE: f64 = 1e-6;

/// The shape has no well-defined normal at the closest point.
///
/// Returned by [`SpatialQuery::closest_normal_to`] for degenerate geometry
/// such as a zero-length segment, a zero-radius circle, coincident curve
/// control points, or an empty path. Callers skip whatever effect needed the
/// normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoNormal;

impl fmt::Display for NoNormal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("geometry is degenerate at the query point and has no normal")
    }
}

impl core::error::Error for NoNormal {}

/// Spatial queries answered in the shape's local coordinate space.
///
/// Callers transform points into the shape's space first (for example with
/// the inverse of a node's world matrix).
pub trait SpatialQuery {
    /// Returns `true` if `pt` lies on or inside the filled shape, within
    /// [`CONTAINS_TOLERANCE`].
    ///
    /// Open shapes always return `false`.
    fn contains_point(&self, pt: Point) -> bool;

    /// The boundary point closest to `pt`, or `None` if the shape is empty.
    fn closest_point_to(&self, pt: Point) -> Option<Point>;

    /// Minimum distance from `pt` to the boundary.
    ///
    /// This is the distance to the outline even when `pt` is inside a filled
    /// shape. Empty shapes report [`f64::INFINITY`].
    fn distance_to(&self, pt: Point) -> f64 {
        self.closest_point_to(pt)
            .map_or(f64::INFINITY, |closest| closest.distance(pt))
    }

    /// Unit normal at the boundary point closest to `pt`.
    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal>;

    /// All boundary intersections with `line`, ordered by increasing distance
    /// from `line.p0`.
    fn intersect_line(&self, line: Line) -> Vec<Point>;

    /// All boundary intersections with the segment `(x0, y0)`–`(x1, y1)`,
    /// ordered by increasing distance from `(x0, y0)`.
    fn intersects_segment(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        self.intersect_line(Line::new((x0, y0), (x1, y1)))
    }

    /// Conservative local-space bounds.
    fn bounds(&self) -> Rect;
}
