// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties that must hold for any sequence of edits.

use kurbo::{Affine, Point};
use understory_scene::{NodeId, Scene, Transform2D};
use understory_shape::math::compose;

/// Small deterministic generator so the edit sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn unit(&mut self) -> f64 {
        (self.next() % 10_000) as f64 / 10_000.0
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    fn pick(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

fn close(a: Affine, b: Affine) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() <= 1e-9 * (1.0 + x.abs().max(y.abs())))
}

/// World matrix derived from parameters alone, without any cache.
fn expected_world(scene: &Scene, id: NodeId) -> Affine {
    scene
        .path_to_root(id)
        .iter()
        .fold(Affine::IDENTITY, |world, n| {
            compose(scene.transform(*n).unwrap().to_affine(), world)
        })
}

fn build_chain(scene: &mut Scene, depth: usize) -> Vec<NodeId> {
    let mut nodes = vec![scene.insert_container()];
    for _ in 1..depth {
        let n = scene.insert_container();
        scene.add_child(*nodes.last().unwrap(), n).unwrap();
        nodes.push(n);
    }
    nodes
}

#[test]
fn cached_world_matrices_match_parameters() {
    let mut rng = Lcg(7);
    let mut scene = Scene::new();
    let mut nodes = build_chain(&mut scene, 4);
    let side = scene.insert_container();
    scene.add_child(nodes[1], side).unwrap();
    nodes.push(side);

    for round in 0..200 {
        // A burst of writes to random nodes...
        for _ in 0..3 {
            let n = nodes[rng.pick(nodes.len())];
            match rng.pick(5) {
                0 => scene.set_position(n, Point::new(rng.range(-50.0, 50.0), rng.range(-50.0, 50.0))),
                1 => scene.set_rotation(n, rng.range(-3.0, 3.0)),
                2 => scene.set_scale(n, rng.range(0.2, 3.0), rng.range(0.2, 3.0)),
                3 => scene.set_skew(n, rng.range(-0.5, 0.5), rng.range(-0.5, 0.5)),
                _ => scene.set_pivot(n, Point::new(rng.range(-10.0, 10.0), rng.range(-10.0, 10.0))),
            }
        }
        // ...occasionally a structural edit...
        if round % 17 == 0 {
            let target = if round % 34 == 0 { nodes[0] } else { nodes[2] };
            if !scene.is_ancestor_or_self(side, target) {
                scene.add_child(target, side).unwrap();
            }
        }
        // ...then a read of a random node, and every node must agree.
        let _ = scene.world_matrix(nodes[rng.pick(nodes.len())]);
        for &n in &nodes {
            let cached = scene.world_matrix(n).unwrap();
            assert!(close(cached, expected_world(&scene, n)), "round {round}, node {n:?}");
        }
    }
}

#[test]
fn rect_containment_survives_any_transform() {
    let mut rng = Lcg(42);
    for _ in 0..100 {
        let mut scene = Scene::new();
        let nodes = build_chain(&mut scene, 3);
        for &n in &nodes {
            scene.set_transform(
                n,
                Transform2D {
                    position: Point::new(rng.range(-100.0, 100.0), rng.range(-100.0, 100.0)),
                    pivot: Point::new(rng.range(0.0, 20.0), rng.range(0.0, 20.0)),
                    scale: (rng.range(0.5, 2.0), rng.range(0.5, 2.0)).into(),
                    skew: (rng.range(-0.3, 0.3), 0.0).into(),
                    rotation: rng.range(-3.0, 3.0),
                },
            );
            scene.set_interactive(n, false);
        }
        let leaf = scene.insert();
        scene.add_child(nodes[2], leaf).unwrap();
        scene.set_size(leaf, 40.0, 30.0);

        // Points inside the leaf's box, mapped out to scene space, hit the leaf.
        let inside = Point::new(rng.range(1.0, 39.0), rng.range(1.0, 29.0));
        let scene_pt = scene.to_world(leaf, inside).unwrap();
        let hit = scene.hit_test(nodes[0], scene_pt).expect("inside point must hit");
        assert_eq!(hit.node, leaf);
        assert!((hit.local - inside).hypot() < 1e-6);

        // Points outside the box miss it.
        let outside = Point::new(rng.range(41.0, 80.0), rng.range(-30.0, -1.0));
        let scene_pt = scene.to_world(leaf, outside).unwrap();
        assert_eq!(scene.hit_test(nodes[0], scene_pt), None);
    }
}

#[test]
fn hit_test_is_idempotent() {
    let mut scene = Scene::<()>::new();
    let root = scene.insert_container();
    scene.set_size(root, 100.0, 100.0);
    let a = scene.insert();
    scene.add_child(root, a).unwrap();
    scene.set_size(a, 30.0, 30.0);
    scene.set_rotation(a, 0.4);
    scene.set_position(a, Point::new(40.0, 40.0));

    for pt in [Point::new(45.0, 50.0), Point::new(5.0, 5.0), Point::new(200.0, 0.0)] {
        let first = scene.hit_test(root, pt);
        let second = scene.hit_test(root, pt);
        assert_eq!(first, second);
    }
}

#[test]
fn to_local_inverts_to_world() {
    let mut scene = Scene::new();
    let nodes = build_chain(&mut scene, 3);
    scene.set_rotation(nodes[0], 0.7);
    scene.set_scale(nodes[1], 2.0, 0.5);
    scene.set_position(nodes[2], Point::new(10.0, -4.0));
    let p = Point::new(3.0, 9.0);
    let world = scene.to_world(nodes[2], p).unwrap();
    let back = scene.to_local(nodes[2], world).unwrap();
    assert!((back - p).hypot() < 1e-9);
}
