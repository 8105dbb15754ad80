// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite geometry: ordered children, each placed by its own transform.

use alloc::vec::Vec;

use kurbo::{Affine, Line, Point, Rect, Vec2};

use crate::geometry::Geometry;
use crate::math::{self, normal_transform};
use crate::{NoNormal, SpatialQuery};

/// One child of a [`Composite`].
#[derive(Clone, Debug)]
pub struct CompositeChild {
    /// The child's shape, in its own local space.
    pub geometry: Geometry,
    /// Maps the child's local space into the composite's space.
    pub transform: Affine,
}

/// A shape built from child shapes.
///
/// A point is contained when any child contains it. Closest-point queries
/// pick the nearest child, with ties going to the earliest child. Children
/// whose transform is singular take no part in point queries.
///
/// Closest points are computed in each child's space and measured in
/// composite space, so under non-uniform scale or skew they are the nearest
/// point of the child's own projection rather than an exact projection.
#[derive(Clone, Debug, Default)]
pub struct Composite {
    children: Vec<CompositeChild>,
}

impl Composite {
    /// An empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child, drawn above the existing ones.
    pub fn push(&mut self, geometry: impl Into<Geometry>, transform: Affine) {
        self.children.push(CompositeChild {
            geometry: geometry.into(),
            transform,
        });
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, geometry: impl Into<Geometry>, transform: Affine) -> Self {
        self.push(geometry, transform);
        self
    }

    /// The children in insertion order.
    pub fn children(&self) -> &[CompositeChild] {
        &self.children
    }

    /// Whether the composite has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children whose transform can be inverted, with that inverse.
    fn invertible(&self) -> impl Iterator<Item = (&CompositeChild, Affine)> {
        self.children
            .iter()
            .filter_map(|c| math::invert(c.transform).ok().map(|inv| (c, inv)))
    }

    /// The nearest child, the query in its space, and the closest point in composite space.
    fn nearest_child(&self, pt: Point) -> Option<(&CompositeChild, Point, Point)> {
        let mut best: Option<(&CompositeChild, Point, Point, f64)> = None;
        for (child, inv) in self.invertible() {
            let q = inv * pt;
            let Some(c) = child.geometry.closest_point_to(q) else {
                continue;
            };
            let c = child.transform * c;
            let d = c.distance_squared(pt);
            if best.as_ref().is_none_or(|b| d < b.3) {
                best = Some((child, q, c, d));
            }
        }
        best.map(|(child, q, c, _)| (child, q, c))
    }
}

impl SpatialQuery for Composite {
    fn contains_point(&self, pt: Point) -> bool {
        self.invertible()
            .any(|(child, inv)| child.geometry.contains_point(inv * pt))
    }

    fn closest_point_to(&self, pt: Point) -> Option<Point> {
        self.nearest_child(pt).map(|(_, _, c)| c)
    }

    fn closest_normal_to(&self, pt: Point) -> Result<Vec2, NoNormal> {
        let (child, q, _) = self.nearest_child(pt).ok_or(NoNormal)?;
        let n = child.geometry.closest_normal_to(q)?;
        normal_transform(child.transform, n).ok_or(NoNormal)
    }

    fn intersect_line(&self, line: Line) -> Vec<Point> {
        let dir = line.p1 - line.p0;
        let len_sq = dir.hypot2();
        let mut hits = Vec::new();
        for (child, inv) in self.invertible() {
            // Line parameters survive affine maps, but the child reports
            // points, so recover each one's position along the query line.
            let local = Line::new(inv * line.p0, inv * line.p1);
            for p in child.geometry.intersect_line(local) {
                let p = child.transform * p;
                let t = if len_sq > 0.0 {
                    (p - line.p0).dot(dir) / len_sq
                } else {
                    0.0
                };
                hits.push((t, p));
            }
        }
        // Each child already merged its own duplicates; coincident hits from
        // different children are kept.
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, p)| p).collect()
    }

    fn bounds(&self) -> Rect {
        self.children
            .iter()
            .map(|c| c.transform.transform_rect_bbox(c.geometry.bounds()))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }
}
