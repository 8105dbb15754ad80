// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing over a scene subtree.

use kurbo::{Point, Rect};
use tracing::trace;
use understory_shape::SpatialQuery;
use understory_shape::math;

use crate::tree::{Node, Scene};
use crate::types::{NodeFlags, NodeId, NodeKind};

/// Result of a successful [`Scene::hit_test`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// The topmost node under the point.
    pub node: NodeId,
    /// The query point in `node`'s local space.
    pub local: Point,
}

impl<P> Scene<P> {
    /// Find the topmost interactive node of the subtree at `root` under `pt`.
    ///
    /// `pt` is in scene space, the space `root`'s world matrix maps into.
    ///
    /// - Children are searched from the top of the paint order down (highest
    ///   z-index first, then most recently added), and a container's children
    ///   are searched before the container itself.
    /// - Hidden nodes are skipped together with their subtrees.
    /// - A node without [`NodeFlags::INTERACTIVE`] is never the result, but
    ///   its children are still searched unless it also clears
    ///   [`NodeFlags::INTERACTIVE_CHILDREN`].
    /// - A node with geometry is hit where the geometry contains the point;
    ///   otherwise it is hit inside `(0, 0)–(width, height)`.
    /// - A subtree whose matrix cannot be inverted is missed.
    pub fn hit_test(&self, root: NodeId, pt: Point) -> Option<Hit> {
        let world = self.world_matrix(root)?;
        let Ok(inv) = math::invert(world) else {
            trace!(?root, "hit test root has a singular world matrix");
            return None;
        };
        let hit = self.hit_node(root, inv * pt);
        trace!(?pt, node = ?hit.map(|h| h.node), "hit test");
        hit
    }

    fn hit_node(&self, id: NodeId, local: Point) -> Option<Hit> {
        let node = self.node(id);
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return None;
        }
        if node.kind == NodeKind::Container && node.flags.contains(NodeFlags::INTERACTIVE_CHILDREN)
        {
            for child in self.children_in_paint_order(id).into_iter().rev() {
                let Ok(inv) = math::invert(self.node(child).local_matrix()) else {
                    continue;
                };
                if let Some(hit) = self.hit_node(child, inv * local) {
                    return Some(hit);
                }
            }
        }
        (node.flags.contains(NodeFlags::INTERACTIVE) && contains_local(node, local))
            .then_some(Hit { node: id, local })
    }
}

fn contains_local<P>(node: &Node<P>, local: Point) -> bool {
    match &node.geometry {
        Some(geometry) => {
            geometry.bounds().contains_point(local) && geometry.contains_point(local)
        }
        None => Rect::from_origin_size(Point::ZERO, node.size).contains_point(local),
    }
}
