// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-matrix recomputation and hit testing on a synthetic widget tree.
//!
//! The tree is a root holding `groups` rotated panels, each holding `leaves`
//! shaped children laid out on a grid.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_scene::{NodeId, Scene};
use understory_shape::Geometry;

struct Built {
    scene: Scene,
    root: NodeId,
    groups: Vec<NodeId>,
    leaves: Vec<NodeId>,
}

fn build(groups: usize, leaves: usize) -> Built {
    let mut scene = Scene::new();
    let root = scene.insert_container();
    scene.set_size(root, 4000.0, 4000.0);
    scene.set_interactive(root, false);
    let mut group_ids = Vec::with_capacity(groups);
    let mut leaf_ids = Vec::with_capacity(groups * leaves);
    for g in 0..groups {
        let group = scene.insert_container();
        scene.add_child(root, group).unwrap();
        let gx = (g % 16) as f64 * 240.0;
        let gy = (g / 16) as f64 * 240.0;
        scene.set_position(group, Point::new(gx + 100.0, gy + 100.0));
        scene.set_pivot(group, Point::new(100.0, 100.0));
        scene.set_rotation(group, 0.05 * g as f64);
        scene.set_size(group, 200.0, 200.0);
        for l in 0..leaves {
            let leaf = scene.insert();
            scene.add_child(group, leaf).unwrap();
            let lx = (l % 8) as f64 * 25.0;
            let ly = (l / 8) as f64 * 25.0;
            scene.set_position(leaf, Point::new(lx, ly));
            let shape = if l % 2 == 0 {
                Geometry::circle((10.0, 10.0), 10.0)
            } else {
                Geometry::polygon([(0.0, 0.0), (20.0, 0.0), (10.0, 20.0)])
            };
            scene.set_geometry(leaf, Some(shape));
            leaf_ids.push(leaf);
        }
        group_ids.push(group);
    }
    Built {
        scene,
        root,
        groups: group_ids,
        leaves: leaf_ids,
    }
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    for &(groups, leaves) in &[(16_usize, 16_usize), (64, 64)] {
        let label = format!("{groups}x{leaves}");

        group.bench_function(BenchmarkId::new("world_matrix_cold", &label), |b| {
            b.iter_batched(
                || build(groups, leaves),
                |built| {
                    for leaf in &built.leaves {
                        black_box(built.scene.world_matrix(*leaf));
                    }
                    built
                },
                BatchSize::LargeInput,
            );
        });

        let built = build(groups, leaves);
        for leaf in &built.leaves {
            built.scene.world_matrix(*leaf);
        }
        group.bench_function(BenchmarkId::new("world_matrix_warm", &label), |b| {
            b.iter(|| {
                for leaf in &built.leaves {
                    black_box(built.scene.world_matrix(*leaf));
                }
            });
        });

        group.bench_function(BenchmarkId::new("rotate_groups_then_read", &label), |b| {
            b.iter_batched(
                || build(groups, leaves),
                |mut built| {
                    for (i, g) in built.groups.iter().enumerate() {
                        built.scene.set_rotation(*g, 0.01 * i as f64);
                    }
                    for leaf in &built.leaves {
                        black_box(built.scene.world_matrix(*leaf));
                    }
                    built
                },
                BatchSize::LargeInput,
            );
        });

        let probes: Vec<Point> = (0..256)
            .map(|i| Point::new((i * 37 % 3840) as f64, (i * 53 % 1000) as f64))
            .collect();
        group.bench_function(BenchmarkId::new("hit_test", &label), |b| {
            b.iter(|| {
                probes
                    .iter()
                    .filter_map(|p| built.scene.hit_test(built.root, *p))
                    .count()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scene);
criterion_main!(benches);
