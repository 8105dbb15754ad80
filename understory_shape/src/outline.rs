// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared queries over outlines made of [`PathSeg`]s.

use alloc::vec::Vec;

use kurbo::{Line, ParamCurve, ParamCurveDeriv, ParamCurveNearest, PathSeg, Point, Vec2};

/// Accuracy passed to kurbo's nearest-point projection.
pub(crate) const NEAREST_ACCURACY: f64 = 1e-9;

/// Tolerance used when flattening arcs and ellipses into cubic Béziers.
pub(crate) const FLATTEN_TOLERANCE: f64 = 1e-3;

/// Intersections closer than this along the query segment are merged.
const MERGE_EPSILON: f64 = 1e-9;

/// Squared tangent length below which a tangent is considered degenerate.
const DEGENERATE_SQ: f64 = 1e-24;

/// Offset used to probe which side of a closed outline is inside.
const PROBE_DISTANCE: f64 = 1e-4;

/// The segment and parameter of the closest point on an outline.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SegNearest {
    pub(crate) seg: PathSeg,
    pub(crate) t: f64,
    pub(crate) point: Point,
}

/// Closest point over a sequence of segments; ties go to the first segment.
pub(crate) fn nearest(segs: impl IntoIterator<Item = PathSeg>, pt: Point) -> Option<SegNearest> {
    let mut best: Option<(SegNearest, f64)> = None;
    for seg in segs {
        let n = seg.nearest(pt, NEAREST_ACCURACY);
        if best.as_ref().is_none_or(|(_, d)| n.distance_sq < *d) {
            best = Some((
                SegNearest {
                    seg,
                    t: n.t,
                    point: seg.eval(n.t),
                },
                n.distance_sq,
            ));
        }
    }
    best.map(|(n, _)| n)
}

/// Unit tangent of `seg` at `t`, or `None` where the segment is degenerate.
pub(crate) fn tangent(seg: PathSeg, t: f64) -> Option<Vec2> {
    let d = match seg {
        PathSeg::Line(l) => l.p1 - l.p0,
        PathSeg::Quad(q) => q.deriv().eval(t).to_vec2(),
        PathSeg::Cubic(c) => c.deriv().eval(t).to_vec2(),
    };
    if d.hypot2() > DEGENERATE_SQ {
        return Some(d.normalize());
    }
    // The derivative vanishes at cusps and at endpoints with coincident
    // control points; a short chord still gives the direction there.
    let t0 = (t - 1e-3).max(0.0);
    let t1 = (t + 1e-3).min(1.0);
    let chord = seg.eval(t1) - seg.eval(t0);
    (chord.hypot2() > DEGENERATE_SQ).then(|| chord.normalize())
}

/// Rotate a direction by a quarter turn.
#[inline]
pub(crate) fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Flip `normal` so it points from `on` toward `toward` (open outlines).
pub(crate) fn orient_toward(normal: Vec2, on: Point, toward: Point) -> Vec2 {
    if (toward - on).dot(normal) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Flip `normal` so it points out of a filled region (closed outlines).
pub(crate) fn orient_outward(normal: Vec2, on: Point, inside: impl Fn(Point) -> bool) -> Vec2 {
    let ahead = inside(on + normal * PROBE_DISTANCE);
    let behind = inside(on - normal * PROBE_DISTANCE);
    if ahead && !behind { -normal } else { normal }
}

/// Normal at the closest point of an outline, oriented by `closed`.
pub(crate) fn normal_at(
    near: SegNearest,
    query: Point,
    closed: bool,
    inside: impl Fn(Point) -> bool,
) -> Option<Vec2> {
    let n = perpendicular(tangent(near.seg, near.t)?);
    Some(if closed {
        orient_outward(n, near.point, inside)
    } else {
        orient_toward(n, near.point, query)
    })
}

/// Intersections of every segment with `line`, sorted along the line.
pub(crate) fn intersect(segs: impl IntoIterator<Item = PathSeg>, line: Line) -> Vec<Point> {
    let mut hits = Vec::new();
    for seg in segs {
        for hit in seg.intersect_line(line) {
            hits.push((hit.line_t, line.eval(hit.line_t)));
        }
    }
    sorted_along(hits)
}

/// Sort `(t, point)` pairs by `t` and merge near-coincident points.
pub(crate) fn sorted_along(mut hits: Vec<(f64, Point)>) -> Vec<Point> {
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut out: Vec<Point> = Vec::with_capacity(hits.len());
    for (_, p) in hits {
        if out.last().is_none_or(|last| last.distance(p) > MERGE_EPSILON) {
            out.push(p);
        }
    }
    out
}
