// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of shapes a node can carry.

use alloc::vec::Vec;
use core::f64::consts::TAU;

use kurbo::{Arc, BezPath, Circle, CubicBez, Ellipse, Line, Point, QuadBez, Rect, Size, Vec2};

use crate::composite::Composite;
use crate::path::every_subpath_closed;
use crate::polygon::Polygon;
use crate::{NoNormal, SpatialQuery};

/// Any supported shape.
///
/// Constructors clamp invalid ranges instead of failing: negative radii,
/// widths and heights become zero.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// A straight segment.
    Segment(Line),
    /// A filled circle.
    Circle(Circle),
    /// A filled axis-aligned rectangle.
    Rect(Rect),
    /// A filled, possibly rotated ellipse.
    Ellipse(Ellipse),
    /// A closed polygon or an open polyline.
    Polygon(Polygon),
    /// An elliptical arc outline.
    Arc(Arc),
    /// A quadratic Bézier outline.
    Quad(QuadBez),
    /// A cubic Bézier outline.
    Cubic(CubicBez),
    /// A path, filled when every subpath is closed.
    Path(BezPath),
    /// Child shapes with their own transforms.
    Composite(Composite),
}

impl Geometry {
    /// A segment from `p0` to `p1`.
    pub fn segment(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self::Segment(Line::new(p0, p1))
    }

    /// A circle around `center`.
    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        Self::Circle(Circle::new(center, radius.max(0.0)))
    }

    /// A rectangle with its top-left corner at `(x, y)`.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect(Rect::from_origin_size(
            (x, y),
            Size::new(width.max(0.0), height.max(0.0)),
        ))
    }

    /// An axis-aligned ellipse around `center`.
    pub fn ellipse(center: impl Into<Point>, rx: f64, ry: f64) -> Self {
        Self::Ellipse(Ellipse::new(center, (rx.max(0.0), ry.max(0.0)), 0.0))
    }

    /// A closed, filled polygon.
    pub fn polygon(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self::Polygon(Polygon::closed(points))
    }

    /// An open polyline.
    pub fn polyline(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self::Polygon(Polygon::open(points))
    }

    /// A circular arc from `start` to `end` (radians), canvas style.
    ///
    /// See [`arc_sweep`] for how the direction flag picks the sweep.
    pub fn arc(
        center: impl Into<Point>,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) -> Self {
        let radius = radius.max(0.0);
        Self::Arc(Arc {
            center: center.into(),
            radii: Vec2::new(radius, radius),
            start_angle: start,
            sweep_angle: arc_sweep(start, end, anticlockwise),
            x_rotation: 0.0,
        })
    }

    /// A quadratic Bézier curve.
    pub fn quad(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self::Quad(QuadBez::new(p0.into(), p1.into(), p2.into()))
    }

    /// A cubic Bézier curve.
    pub fn cubic(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self::Cubic(CubicBez::new(p0.into(), p1.into(), p2.into(), p3.into()))
    }

    /// Whether the shape has an interior that can contain points.
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Circle(_) | Self::Rect(_) | Self::Ellipse(_) => true,
            Self::Composite(c) => c.children().iter().any(|c| c.geometry.is_closed()),
            Self::Polygon(p) => p.closed,
            Self::Path(p) => every_subpath_closed(p),
            Self::Segment(_) | Self::Arc(_) | Self::Quad(_) | Self::Cubic(_) => false,
        }
    }

    fn as_query(&self) -> &dyn SpatialQuery {
        match self {
            Self::Segment(s) => s,
            Self::Circle(c) => c,
            Self::Rect(r) => r,
            Self::Ellipse(e) => e,
            Self::Polygon(p) => p,
            Self::Arc(a) => a,
            Self::Quad(q) => q,
            Self::Cubic(c) => c,
            Self::Path(p) => p,
            Self::Composite(c) => c,
        }
    }
}

/// Signed sweep of a canvas-style arc from `start` to `end`.
///
/// Angles grow clockwise on a y-down surface. A clockwise arc sweeps
/// positively and an anticlockwise one negatively. A span of a full turn or
/// more in the drawing direction gives a full circle; anything less is
/// reduced modulo a full turn.
pub fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    let span = if anticlockwise { start - end } else { end - start };
    let sweep = if span >= TAU {
        TAU
    } else {
        let r = span % TAU;
        if r < 0.0 { r + TAU } else { r }
    };
    if anticlockwise { -sweep } else { sweep }
}

impl SpatialQuery for Geometry {
    fn contains_point(&self, pt: Point) -> bool {
        self.as_query().contains_point(pt)
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        self.as_query().closest_point_to(pt)
    }

    fn distance_to(&self, pt: Point) -> f64 {
        self.as_query().distance_to(pt)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        self.as_query().closest_normal_to(pt)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        self.as_query().intersect_line(line)
    }

    fn bounds(&self) -> Rect {
        self.as_query().bounds()
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Geometry {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    Line => Segment,
    Circle => Circle,
    Rect => Rect,
    Ellipse => Ellipse,
    Polygon => Polygon,
    Arc => Arc,
    QuadBez => Quad,
    CubicBez => Cubic,
    BezPath => Path,
    Composite => Composite,
}
