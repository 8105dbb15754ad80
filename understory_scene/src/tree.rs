// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene: node storage, hierarchy edits and lazily resolved matrices.

use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::{Affine, Point, Size, Vec2};
use tracing::{debug, trace};
use understory_shape::Geometry;
use understory_shape::math::{self, compose};

use crate::types::{DirtyFlags, NodeFlags, NodeId, NodeKind, SceneError, Transform2D};

/// A retained tree of transformable nodes.
///
/// Nodes live in generational slots and are addressed by [`NodeId`]. Every
/// node carries its transform parameters and, optionally, a [`Geometry`] and
/// an opaque paint payload `P` that the scene stores but never interprets.
///
/// Local and world matrices are caches. Writes only mark the written node
/// dirty; reads walk the parent chain and recompute whatever is stale. Reads
/// therefore take `&self`, and the caches use [`Cell`], so a `Scene` is not
/// `Sync`.
///
/// Setters and getters on stale ids are no-ops that return nothing.
#[derive(Debug)]
pub struct Scene<P = ()> {
    nodes: Vec<Option<Node<P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Source of world-matrix stamps; strictly increasing.
    clock: Cell<u64>,
}

impl<P> Default for Scene<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            clock: Cell::new(0),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node<P> {
    generation: u32,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) transform: Transform2D,
    pub(crate) size: Size,
    pub(crate) alpha: f64,
    pub(crate) z_index: i32,
    pub(crate) flags: NodeFlags,
    pub(crate) geometry: Option<Geometry>,
    paint: Option<P>,
    local: Cell<Affine>,
    world: Cell<Affine>,
    dirty: Cell<DirtyFlags>,
    /// Stamp of the last world-matrix recomputation.
    stamp: Cell<u64>,
    /// Parent stamp the cached world matrix was composed from.
    parent_stamp: Cell<u64>,
}

impl<P> Node<P> {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            kind,
            parent: None,
            children: Vec::new(),
            transform: Transform2D::default(),
            size: Size::ZERO,
            alpha: 1.0,
            z_index: 0,
            flags: NodeFlags::default(),
            geometry: None,
            paint: None,
            local: Cell::new(Affine::IDENTITY),
            world: Cell::new(Affine::IDENTITY),
            dirty: Cell::new(DirtyFlags::all()),
            stamp: Cell::new(0),
            parent_stamp: Cell::new(0),
        }
    }

    fn mark(&self, flags: DirtyFlags) {
        self.dirty.set(self.dirty.get() | flags);
    }

    /// The local matrix, rebuilt from parameters if they changed.
    pub(crate) fn local_matrix(&self) -> Affine {
        let dirty = self.dirty.get();
        if dirty.contains(DirtyFlags::TRANSFORM) {
            self.local.set(self.transform.to_affine());
            // The world matrix was composed from the old local matrix.
            self.dirty
                .set((dirty - DirtyFlags::TRANSFORM) | DirtyFlags::WORLD);
        }
        self.local.get()
    }
}

/// One entry of [`Scene::paint_list`].
#[derive(Debug)]
pub struct PaintItem<'a, P> {
    /// The node being painted.
    pub node: NodeId,
    /// Maps the node's local space to scene space.
    pub world: Affine,
    /// Product of the alphas from the traversal root down to this node.
    pub alpha: f64,
    /// Size of the node's default bounds.
    pub size: Size,
    /// The node's shape, if any.
    pub geometry: Option<&'a Geometry>,
    /// The node's paint payload, if any.
    pub paint: Option<&'a P>,
}

impl<P> Scene<P> {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, kind: NodeKind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    /// Insert a detached leaf element.
    pub fn insert(&mut self) -> NodeId {
        self.allocate(NodeKind::Element)
    }

    /// Insert a detached container.
    pub fn insert_container(&mut self) -> NodeId {
        self.allocate(NodeKind::Container)
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node<P>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<P>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }

    /// Access a node whose liveness was already checked; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<P> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<P> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn mark_subtree_dirty(&self, id: NodeId, flags: DirtyFlags) {
        let node = self.node(id);
        node.mark(flags);
        for &child in &node.children {
            self.mark_subtree_dirty(child, flags);
        }
    }

    // --- hierarchy ---

    /// Append `child` to `parent`'s children, moving it from its current parent if any.
    ///
    /// # Errors
    ///
    /// - [`SceneError::StaleNode`] if either id is stale.
    /// - [`SceneError::NotAContainer`] if `parent` is an element.
    /// - [`SceneError::CycleDetected`] if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.reparent(child, Some(parent))
    }

    /// Move `id` under `new_parent`, or detach it when `new_parent` is `None`.
    ///
    /// The node is unlinked from its old parent before it is linked into the
    /// new one, and its whole subtree is marked for world recomputation.
    ///
    /// # Errors
    ///
    /// Same as [`add_child`](Self::add_child). On error the tree is unchanged.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleNode(id));
        }
        if let Some(parent) = new_parent {
            let Some(p) = self.node_opt(parent) else {
                return Err(SceneError::StaleNode(parent));
            };
            if p.kind != NodeKind::Container {
                return Err(SceneError::NotAContainer(parent));
            }
            if self.is_ancestor_or_self(id, parent) {
                debug!(?id, ?parent, "rejected reparent that would create a cycle");
                return Err(SceneError::CycleDetected { child: id, parent });
            }
        }
        if let Some(old) = self.node(id).parent {
            self.unlink_parent(id, old);
        }
        if let Some(parent) = new_parent {
            self.link_parent(id, parent);
            self.node(parent).mark(DirtyFlags::VISUAL);
        }
        self.mark_subtree_dirty(id, DirtyFlags::WORLD | DirtyFlags::VISUAL);
        debug!(?id, ?new_parent, "reparented node");
        Ok(())
    }

    /// Detach `id` from its parent, making it the root of its own subtree.
    pub fn detach(&mut self, id: NodeId) {
        if self.parent_of(id).is_some() {
            // Detaching a live node cannot fail.
            let _ = self.reparent(id, None);
        }
    }

    /// Detach `child` if, and only if, its parent is `parent`.
    ///
    /// Returns whether anything was detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.is_alive(parent) && self.parent_of(child) == Some(parent) {
            self.detach(child);
            true
        } else {
            false
        }
    }

    /// Remove a node and its whole subtree, dropping their geometry and paint payloads.
    ///
    /// Returns every removed id, so that hosts can release per-node resources
    /// such as event listeners. Removing a stale id returns an empty list.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        if !self.is_alive(id) {
            return removed;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
            self.node(parent).mark(DirtyFlags::VISUAL);
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes[next.idx()].take() {
                stack.extend(node.children.iter().copied());
                self.free_list.push(next.idx());
                removed.push(next);
            }
        }
        debug!(?id, count = removed.len(), "removed subtree");
        removed
    }

    /// Returns true if `ancestor` is `id` or lies on the path from `id` to its root.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent_of(n);
        }
        false
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order; empty for elements and stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Children of `id` from bottom to top: ascending z-index, then insertion order.
    pub fn children_in_paint_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.children_of(id).to_vec();
        children.sort_by_key(|c| self.node(*c).z_index);
        children
    }

    /// The path from the root of `id`'s tree down to `id`, inclusive.
    ///
    /// Empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.is_alive(id).then_some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.node(n).parent;
        }
        out.reverse();
        out
    }

    // --- setters ---

    fn edit_transform(&mut self, id: NodeId, f: impl FnOnce(&mut Transform2D)) {
        if let Some(n) = self.node_opt_mut(id) {
            f(&mut n.transform);
            n.transform = n.transform.clamped();
            n.mark(DirtyFlags::TRANSFORM | DirtyFlags::VISUAL);
        }
    }

    fn edit_visual(&mut self, id: NodeId, f: impl FnOnce(&mut Node<P>)) {
        if let Some(n) = self.node_opt_mut(id) {
            f(n);
            n.mark(DirtyFlags::VISUAL);
        }
    }

    /// Set where the pivot lands in parent space.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.edit_transform(id, |t| t.position = position);
    }

    /// Set the local point that rotation, skew and scale are applied around.
    pub fn set_pivot(&mut self, id: NodeId, pivot: Point) {
        self.edit_transform(id, |t| t.pivot = pivot);
    }

    /// Set per-axis scale. Zero components are clamped to [`SCALE_EPSILON`](crate::SCALE_EPSILON).
    pub fn set_scale(&mut self, id: NodeId, sx: f64, sy: f64) {
        self.edit_transform(id, |t| t.scale = Vec2::new(sx, sy));
    }

    /// Set skew angles in radians.
    pub fn set_skew(&mut self, id: NodeId, kx: f64, ky: f64) {
        self.edit_transform(id, |t| t.skew = Vec2::new(kx, ky));
    }

    /// Set rotation in radians.
    pub fn set_rotation(&mut self, id: NodeId, radians: f64) {
        self.edit_transform(id, |t| t.rotation = radians);
    }

    /// Replace all transform parameters at once.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform2D) {
        self.edit_transform(id, |t| *t = transform);
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        self.edit_visual(id, |n| n.alpha = alpha.max(0.0).min(1.0));
    }

    /// Set stacking order among siblings; higher is drawn on top.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        self.edit_visual(id, |n| n.z_index = z);
    }

    /// Show or hide a node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.edit_visual(id, |n| n.flags.set(NodeFlags::VISIBLE, visible));
    }

    /// Whether the node itself can be hit.
    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(NodeFlags::INTERACTIVE, interactive);
        }
    }

    /// Whether hit testing descends into a container's children.
    pub fn set_interactive_children(&mut self, id: NodeId, interactive: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(NodeFlags::INTERACTIVE_CHILDREN, interactive);
        }
    }

    /// Replace all flags at once.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.edit_visual(id, |n| n.flags = flags);
    }

    /// Set the size of the default bounds `(0, 0)–(width, height)`.
    ///
    /// Negative extents are clamped to zero.
    pub fn set_size(&mut self, id: NodeId, width: f64, height: f64) {
        self.edit_visual(id, |n| n.size = Size::new(width.max(0.0), height.max(0.0)));
    }

    /// Attach or clear the node's shape.
    pub fn set_geometry(&mut self, id: NodeId, geometry: Option<Geometry>) {
        self.edit_visual(id, |n| n.geometry = geometry);
    }

    /// Attach or clear the node's paint payload.
    pub fn set_paint(&mut self, id: NodeId, paint: Option<P>) {
        self.edit_visual(id, |n| n.paint = paint);
    }

    // --- getters ---

    /// Whether `id` is an element or a container.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node_opt(id).map(|n| n.kind)
    }

    /// Transform parameters of a live node.
    pub fn transform(&self, id: NodeId) -> Option<Transform2D> {
        self.node_opt(id).map(|n| n.transform)
    }

    /// Opacity of a live node.
    pub fn alpha(&self, id: NodeId) -> Option<f64> {
        self.node_opt(id).map(|n| n.alpha)
    }

    /// Z-index of a live node.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|n| n.z_index)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Default bounds size of a live node.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.node_opt(id).map(|n| n.size)
    }

    /// Shape of a live node.
    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.node_opt(id).and_then(|n| n.geometry.as_ref())
    }

    /// Paint payload of a live node.
    pub fn paint(&self, id: NodeId) -> Option<&P> {
        self.node_opt(id).and_then(|n| n.paint.as_ref())
    }

    /// Mutable paint payload of a live node. Marks the node visually dirty.
    pub fn paint_mut(&mut self, id: NodeId) -> Option<&mut P> {
        let n = self.node_opt_mut(id)?;
        n.mark(DirtyFlags::VISUAL);
        n.paint.as_mut()
    }

    /// Whether the node changed visually since the last [`clear_visual_dirty`](Self::clear_visual_dirty).
    pub fn is_visual_dirty(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.dirty.get().contains(DirtyFlags::VISUAL))
    }

    /// Acknowledge that the node's visual changes have been painted.
    pub fn clear_visual_dirty(&mut self, id: NodeId) {
        if let Some(n) = self.node_opt_mut(id) {
            n.dirty.set(n.dirty.get() - DirtyFlags::VISUAL);
        }
    }

    /// Currently pending dirty flags of a live node.
    pub fn dirty_flags(&self, id: NodeId) -> Option<DirtyFlags> {
        self.node_opt(id).map(|n| n.dirty.get())
    }

    // --- matrices ---

    fn next_stamp(&self) -> u64 {
        let s = self.clock.get() + 1;
        self.clock.set(s);
        s
    }

    /// The matrix mapping the node's local space into its parent's space.
    pub fn local_matrix(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(Node::local_matrix)
    }

    /// The matrix mapping the node's local space into scene space.
    ///
    /// Walks from the root down and recomputes only what is stale: a node is
    /// recomposed when its own parameters or position in the tree changed, or
    /// when its parent's world matrix was recomputed after its own.
    pub fn world_matrix(&self, id: NodeId) -> Option<Affine> {
        let mut parent_world = Affine::IDENTITY;
        let mut parent_stamp = 0;
        let path = self.path_to_root(id);
        for &n in &path {
            let node = self.node(n);
            let local = node.local_matrix();
            let dirty = node.dirty.get();
            if dirty.contains(DirtyFlags::WORLD) || node.parent_stamp.get() != parent_stamp {
                node.world.set(compose(local, parent_world));
                node.parent_stamp.set(parent_stamp);
                node.stamp.set(self.next_stamp());
                node.dirty.set(dirty - DirtyFlags::WORLD);
                trace!(node = ?n, "recomputed world matrix");
            }
            parent_world = node.world.get();
            parent_stamp = node.stamp.get();
        }
        (!path.is_empty()).then_some(parent_world)
    }

    /// Product of the alphas along the path from the root to `id`.
    pub fn world_alpha(&self, id: NodeId) -> Option<f64> {
        let path = self.path_to_root(id);
        (!path.is_empty()).then(|| path.iter().map(|n| self.node(*n).alpha).product())
    }

    /// Map a scene-space point into the node's local space.
    ///
    /// # Errors
    ///
    /// [`SceneError::StaleNode`] for stale ids, [`SceneError::Singular`] when
    /// the world matrix cannot be inverted.
    pub fn to_local(&self, id: NodeId, pt: Point) -> Result<Point, SceneError> {
        let world = self.world_matrix(id).ok_or(SceneError::StaleNode(id))?;
        let inv = math::invert(world).map_err(|_| SceneError::Singular(id))?;
        Ok(inv * pt)
    }

    /// Map a point in the node's local space into scene space.
    pub fn to_world(&self, id: NodeId, pt: Point) -> Option<Point> {
        self.world_matrix(id).map(|m| m * pt)
    }

    // --- traversal ---

    /// Visible nodes of the subtree at `root` in paint order (bottom to top).
    ///
    /// Parents come before their children, siblings are ordered by
    /// [`children_in_paint_order`](Self::children_in_paint_order), and hidden
    /// nodes are skipped along with their subtrees. Alpha is accumulated from
    /// `root`, which is treated as a scene root.
    pub fn paint_list(&self, root: NodeId) -> Vec<PaintItem<'_, P>> {
        let mut out = Vec::new();
        if let Some(world) = self.world_matrix(root) {
            self.collect_paint(root, world, 1.0, &mut out);
        }
        out
    }

    fn collect_paint<'a>(
        &'a self,
        id: NodeId,
        world: Affine,
        parent_alpha: f64,
        out: &mut Vec<PaintItem<'a, P>>,
    ) {
        let node = self.node(id);
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return;
        }
        let alpha = parent_alpha * node.alpha;
        out.push(PaintItem {
            node: id,
            world,
            alpha,
            size: node.size,
            geometry: node.geometry.as_ref(),
            paint: node.paint.as_ref(),
        });
        for child in self.children_in_paint_order(id) {
            let local = self.node(child).local_matrix();
            self.collect_paint(child, compose(local, world), alpha, out);
        }
    }
}
