// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-shape cost of the spatial queries, over a fixed grid of probe points.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Arc, BezPath, Point};
use understory_shape::{Composite, Geometry, SpatialQuery, append_arc};

fn probes() -> Vec<Point> {
    let mut out = Vec::with_capacity(400);
    for i in 0..20 {
        for j in 0..20 {
            out.push(Point::new(-10.0 + f64::from(i) * 6.0, -10.0 + f64::from(j) * 6.0));
        }
    }
    out
}

fn shapes() -> Vec<(&'static str, Geometry)> {
    let mut d = BezPath::new();
    d.move_to((50.0, 0.0));
    let half = Arc::new((50.0, 50.0), (50.0, 50.0), -FRAC_PI_2, PI, 0.0);
    append_arc(&mut d, &half);
    d.close_path();

    let mut rings = Composite::new();
    for r in [10.0, 25.0, 40.0] {
        rings.push(Geometry::circle((50.0, 50.0), r), Affine::IDENTITY);
    }
    rings.push(
        Geometry::rect(0.0, 0.0, 30.0, 10.0),
        Affine::rotate_about(0.4, Point::new(50.0, 50.0)),
    );

    let star: Vec<Point> = (0..10)
        .map(|k| {
            let a = f64::from(k) * TAU / 10.0;
            let r = if k % 2 == 0 { 50.0 } else { 20.0 };
            Point::new(50.0 + r * a.cos(), 50.0 + r * a.sin())
        })
        .collect();

    vec![
        ("segment", Geometry::segment((0.0, 0.0), (100.0, 80.0))),
        ("circle", Geometry::circle((50.0, 50.0), 40.0)),
        ("rect", Geometry::rect(10.0, 20.0, 80.0, 60.0)),
        ("ellipse", Geometry::ellipse((50.0, 50.0), 45.0, 20.0)),
        ("polygon", Geometry::polygon(star)),
        ("arc", Geometry::arc((50.0, 50.0), 40.0, 0.0, 4.0, false)),
        ("quad", Geometry::quad((0.0, 100.0), (50.0, -50.0), (100.0, 100.0))),
        (
            "cubic",
            Geometry::cubic((0.0, 50.0), (30.0, -40.0), (70.0, 140.0), (100.0, 50.0)),
        ),
        ("path", Geometry::Path(d)),
        ("composite", Geometry::from(rings)),
    ]
}

fn bench_queries(c: &mut Criterion) {
    let probes = probes();
    let shapes = shapes();

    let mut group = c.benchmark_group("shape_queries");
    for (name, shape) in &shapes {
        group.bench_with_input(BenchmarkId::new("contains", name), shape, |b, s| {
            b.iter(|| probes.iter().filter(|p| s.contains_point(**p)).count());
        });
        group.bench_with_input(BenchmarkId::new("closest_point", name), shape, |b, s| {
            b.iter(|| {
                for p in &probes {
                    black_box(s.closest_point_to(*p));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("closest_normal", name), shape, |b, s| {
            b.iter(|| {
                for p in &probes {
                    black_box(s.closest_normal_to(*p).ok());
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("intersect_segment", name), shape, |b, s| {
            b.iter(|| {
                for p in probes.iter().step_by(7) {
                    black_box(s.intersects_segment(p.x, p.y, 100.0 - p.x, 100.0 - p.y));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
