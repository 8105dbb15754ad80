// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, transform parameters and errors.

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// Scale components of exactly zero are replaced by this value so that every
/// local matrix stays invertible.
pub const SCALE_EPSILON: f64 = 1e-6;

/// Identifier for a node in a [`Scene`](crate::Scene).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed and every `NodeId` pointing at it becomes stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale `NodeId`s never alias a different live node. Use
/// [`Scene::is_alive`](crate::Scene::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Whether a node can hold children.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// A leaf.
    Element,
    /// A node with an ordered list of children.
    Container,
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are painted and hit tested.
        const VISIBLE = 0b0000_0001;
        /// Node itself can be the target of a hit test.
        const INTERACTIVE = 0b0000_0010;
        /// Children of a container are searched during hit testing.
        const INTERACTIVE_CHILDREN = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::all()
    }
}

bitflags::bitflags! {
    /// Cached values of a node that are out of date.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// Transform parameters changed; the local matrix must be rebuilt.
        const TRANSFORM = 0b0000_0001;
        /// The node moved in the hierarchy; the world matrix must be recomposed.
        const WORLD = 0b0000_0010;
        /// Something a renderer draws changed.
        const VISUAL = 0b0000_0100;
    }
}

/// Transform parameters of a node.
///
/// The local matrix translates to `position`, rotates, skews, scales and
/// finally shifts by `-pivot`. Points are transformed in the reverse order,
/// so `pivot` is the local point that lands on `position`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform2D {
    /// Where the pivot lands in parent space.
    pub position: Point,
    /// Local point that rotation, skew and scale are applied around.
    pub pivot: Point,
    /// Per-axis scale factors.
    pub scale: Vec2,
    /// Skew angles in radians along x and y.
    pub skew: Vec2,
    /// Rotation in radians, clockwise on a y-down surface.
    pub rotation: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            pivot: Point::ZERO,
            scale: Vec2::new(1.0, 1.0),
            skew: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    /// A pure translation.
    pub fn from_position(position: impl Into<Point>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// Replace zero scale components with [`SCALE_EPSILON`].
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.scale = Vec2::new(clamp_scale(self.scale.x), clamp_scale(self.scale.y));
        self
    }

    /// The local matrix described by these parameters.
    pub fn to_affine(&self) -> Affine {
        let t = self.clamped();
        Affine::translate(t.position.to_vec2())
            * Affine::rotate(t.rotation)
            * Affine::skew(t.skew.x.tan(), t.skew.y.tan())
            * Affine::scale_non_uniform(t.scale.x, t.scale.y)
            * Affine::translate(-t.pivot.to_vec2())
    }
}

fn clamp_scale(s: f64) -> f64 {
    if s == 0.0 { SCALE_EPSILON } else { s }
}

/// Structural edits rejected by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// Linking `child` under `parent` would make `child` its own ancestor.
    CycleDetected {
        /// The node being moved.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
    /// The requested parent is an element and cannot hold children.
    NotAContainer(NodeId),
    /// The id refers to a removed node.
    StaleNode(NodeId),
    /// The node's world matrix has no inverse.
    Singular(NodeId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { child, parent } => write!(
                f,
                "linking {child:?} under {parent:?} would make it its own ancestor"
            ),
            Self::NotAContainer(id) => write!(f, "{id:?} is not a container"),
            Self::StaleNode(id) => write!(f, "{id:?} does not refer to a live node"),
            Self::Singular(id) => write!(f, "world matrix of {id:?} is not invertible"),
        }
    }
}

impl core::error::Error for SceneError {}
