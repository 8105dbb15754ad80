// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scene --heading-base-level=0

//! Understory Scene: a retained 2D scene graph with shape-precise hit testing.
//!
//! A [`Scene`] is a tree of positioned, transformable nodes for canvas-style
//! editors, diagram tools and custom widgets. Each node has transform
//! parameters ([`Transform2D`]), an optional [`Geometry`](understory_shape::Geometry)
//! from `understory_shape`, and an optional paint payload the scene carries
//! for an external renderer.
//!
//! ## Matrices are caches
//!
//! Writing a transform parameter only marks that node [`DirtyFlags::TRANSFORM`].
//! Reading [`Scene::world_matrix`] walks the parent chain and recomposes every
//! matrix that is stale, so a burst of writes costs nothing until the next
//! read. The world matrix of a node is always
//! `compose(local(node), world(parent))`, with the identity above a root.
//!
//! ## Hit testing
//!
//! [`Scene::hit_test`] maps a scene point into each node's local space and
//! asks its geometry (or its `(0, 0)–(width, height)` box) whether the point
//! is inside. The topmost node wins: siblings are searched from the highest
//! z-index down, and children are searched before their container.
//!
//! ```
//! use kurbo::Point;
//! use understory_scene::Scene;
//! use understory_shape::Geometry;
//!
//! let mut scene = Scene::<()>::new();
//! let root = scene.insert_container();
//! scene.set_size(root, 400.0, 300.0);
//!
//! let button = scene.insert();
//! scene.add_child(root, button).unwrap();
//! scene.set_position(button, Point::new(200.0, 150.0));
//! scene.set_pivot(button, Point::new(20.0, 20.0));
//! scene.set_geometry(button, Some(Geometry::circle((20.0, 20.0), 20.0)));
//! scene.set_scale(button, 2.0, 2.0);
//!
//! let hit = scene.hit_test(root, Point::new(230.0, 150.0)).unwrap();
//! assert_eq!(hit.node, button);
//! assert!((hit.local - Point::new(35.0, 20.0)).hypot() < 1e-9);
//!
//! // Outside the scaled circle, the root box is hit instead.
//! let hit = scene.hit_test(root, Point::new(250.0, 190.0)).unwrap();
//! assert_eq!(hit.node, root);
//! ```
//!
//! ## Identity and errors
//!
//! Nodes are addressed by generational [`NodeId`]s; removing a node makes its
//! id stale and setters on stale ids do nothing. Structural edits that would
//! break the tree return a [`SceneError`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hit;
mod tree;
mod types;

pub use hit::Hit;
pub use tree::{PaintItem, Scene};
pub use types::{DirtyFlags, NodeFlags, NodeId, NodeKind, SCALE_EPSILON, SceneError, Transform2D};
