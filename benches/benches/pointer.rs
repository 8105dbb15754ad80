// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cost of a full pointer turn: hit testing, state updates and listener delivery.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_pointer::{
    Listeners, Outcome, PointerDispatcher, PointerEventKind, PointerId, RawKind, RawPointerEvent,
};
use understory_scene::Scene;
use understory_shape::Geometry;

fn bench_pointer(c: &mut Criterion) {
    let mut scene = Scene::<()>::new();
    let root = scene.insert_container();
    scene.set_size(root, 1000.0, 1000.0);
    let mut listeners = Listeners::new();
    for i in 0..100 {
        let button = scene.insert();
        scene.add_child(root, button).unwrap();
        scene.set_position(button, Point::new((i % 10) as f64 * 100.0, (i / 10) as f64 * 100.0));
        scene.set_geometry(button, Some(Geometry::circle((50.0, 50.0), 40.0)));
        for kind in [PointerEventKind::Move, PointerEventKind::Click] {
            listeners.on(button, kind, |ev, _| {
                black_box(ev.position);
                Outcome::Continue
            });
        }
    }

    let path: Vec<Point> = (0..200)
        .map(|i| Point::new(f64::from(i) * 5.0, 500.0 + 20.0 * (f64::from(i) * 0.1).sin()))
        .collect();

    let mut group = c.benchmark_group("pointer");
    group.bench_function("hover_sweep", |b| {
        let mut d = PointerDispatcher::new(root);
        let mut t = 0;
        b.iter(|| {
            for p in &path {
                t += 1;
                let raw = RawPointerEvent::new(PointerId(0), RawKind::Move, *p, t);
                black_box(d.process(&scene, &mut listeners, raw));
            }
        });
    });
    group.bench_function("click", |b| {
        let mut d = PointerDispatcher::new(root);
        let at = Point::new(150.0, 150.0);
        let mut t = 0;
        b.iter(|| {
            t += 2;
            let down = RawPointerEvent::new(PointerId(1), RawKind::Down, at, t);
            let up = RawPointerEvent::new(PointerId(1), RawKind::Up, at, t + 1);
            d.process(&scene, &mut listeners, down);
            black_box(d.process(&scene, &mut listeners, up));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_pointer);
criterion_main!(benches);
