// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns raw pointer samples into semantic events.
//!
//! ## Per-pointer state machine
//!
//! - Without a press, every sample hit tests the scene. When the node under
//!   the pointer changes, the old one gets [`Leave`](PointerEventKind::Leave)
//!   and the new one [`Enter`](PointerEventKind::Enter).
//! - [`Down`](PointerEventKind::Down) on a node captures the pointer: until
//!   release, every sample is routed to that node without hit testing.
//! - Moving a pressed pointer farther than the drag threshold from where it
//!   was pressed emits [`DragStart`](PointerEventKind::DragStart) once and
//!   rules out a click for that press.
//! - Release emits [`Up`](PointerEventKind::Up), then
//!   [`Click`](PointerEventKind::Click) unless the press became a drag, and
//!   queues a [`DeferredClick`](PointerEventKind::DeferredClick) for
//!   [`PointerDispatcher::take_deferred`].
//! - Release and cancel both end the pointer: the hovered node gets `Leave`
//!   and the pointer's record is dropped. Cancel never clicks. The next
//!   sample for that id starts a fresh record, entering whatever is under it.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use tracing::{debug, trace};
use understory_scene::{NodeId, Scene};

use crate::config::PointerConfig;
use crate::event::{PointerEvent, PointerEventKind, PointerId, RawKind, RawPointerEvent};
use crate::listeners::{DispatchReport, Listeners};
use crate::state::{PointerState, Press};

/// Tracks every pointer over one scene subtree.
#[derive(Debug)]
pub struct PointerDispatcher {
    root: NodeId,
    config: PointerConfig,
    pointers: HashMap<PointerId, PointerState>,
    deferred: Vec<PointerEvent>,
}

impl PointerDispatcher {
    /// A dispatcher hit testing the subtree at `root` with the default config.
    pub fn new(root: NodeId) -> Self {
        Self::with_config(root, PointerConfig::default())
    }

    /// A dispatcher with an explicit config.
    pub fn with_config(root: NodeId, config: PointerConfig) -> Self {
        Self {
            root,
            config,
            pointers: HashMap::new(),
            deferred: Vec::new(),
        }
    }

    /// The subtree being hit tested.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Hit test a different subtree from now on. Pointer state is kept.
    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Current tuning.
    pub fn config(&self) -> PointerConfig {
        self.config
    }

    /// Replace the tuning. A press in progress uses the new threshold for its next move.
    pub fn set_config(&mut self, config: PointerConfig) {
        self.config = config;
    }

    /// The record for `pointer`, if it has been seen since its last release,
    /// cancel or reset.
    pub fn state(&self, pointer: PointerId) -> Option<&PointerState> {
        self.pointers.get(&pointer)
    }

    /// Node hovered by `pointer`.
    pub fn hover(&self, pointer: PointerId) -> Option<NodeId> {
        self.state(pointer).and_then(|s| s.hover)
    }

    /// Node that captured `pointer`.
    pub fn captured(&self, pointer: PointerId) -> Option<NodeId> {
        self.state(pointer).and_then(PointerState::captured)
    }

    /// Whether `pointer`'s press has become a drag.
    pub fn is_dragging(&self, pointer: PointerId) -> bool {
        self.state(pointer).is_some_and(PointerState::is_dragging)
    }

    /// Process one raw sample and return the immediate events it produces, in order.
    ///
    /// A release or cancel drops the pointer's record. A release may also
    /// queue a deferred click; collect it with
    /// [`take_deferred`](Self::take_deferred) after the returned events were handled.
    pub fn handle<P>(&mut self, scene: &Scene<P>, raw: RawPointerEvent) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        let mut state = self.pointers.remove(&raw.pointer).unwrap_or_default();
        drop_stale(scene, raw.pointer, &mut state);
        trace!(
            pointer = ?raw.pointer,
            kind = ?raw.kind,
            position = ?raw.position,
            "raw pointer event"
        );

        let keep = match raw.kind {
            RawKind::Move => {
                self.on_move(scene, raw, &mut state, &mut out);
                true
            }
            RawKind::Down => {
                self.on_down(scene, raw, &mut state, &mut out);
                true
            }
            RawKind::Up => {
                self.on_up(raw, &state, &mut out);
                false
            }
            RawKind::Cancel => {
                on_cancel(raw, &state, &mut out);
                self.cancel_deferred(raw.pointer);
                false
            }
        };
        if keep {
            state.last_position = Some(raw.position);
            self.pointers.insert(raw.pointer, state);
        }
        out
    }

    fn on_move<P>(
        &self,
        scene: &Scene<P>,
        raw: RawPointerEvent,
        state: &mut PointerState,
        out: &mut Vec<PointerEvent>,
    ) {
        let Some(press) = state.press.as_mut() else {
            self.update_hover(scene, raw, state, out);
            if let Some(hover) = state.hover {
                out.push(event(PointerEventKind::Move, raw, hover));
            }
            return;
        };
        if !press.dragging && press.offset(raw.position).hypot() > self.config.drag_threshold {
            press.dragging = true;
            debug!(pointer = ?raw.pointer, target = ?press.target, "drag started");
            out.push(event(PointerEventKind::DragStart, raw, press.target));
        }
        out.push(event(PointerEventKind::Move, raw, press.target));
    }

    fn on_down<P>(
        &self,
        scene: &Scene<P>,
        raw: RawPointerEvent,
        state: &mut PointerState,
        out: &mut Vec<PointerEvent>,
    ) {
        if state.press.is_some() {
            trace!(pointer = ?raw.pointer, "ignored press while captured");
            return;
        }
        self.update_hover(scene, raw, state, out);
        let Some(target) = state.hover else {
            return;
        };
        state.press = Some(Press {
            target,
            origin: raw.position,
            time: raw.time,
            dragging: false,
        });
        debug!(pointer = ?raw.pointer, ?target, "pointer captured");
        out.push(event(PointerEventKind::Down, raw, target));
    }

    fn on_up(&mut self, raw: RawPointerEvent, state: &PointerState, out: &mut Vec<PointerEvent>) {
        if let Some(press) = state.press {
            out.push(event(PointerEventKind::Up, raw, press.target));
            let held = raw.time.saturating_sub(press.time);
            let in_time = self.config.max_click_duration.is_none_or(|max| held <= max);
            if !press.dragging && in_time {
                debug!(pointer = ?raw.pointer, target = ?press.target, "click");
                out.push(event(PointerEventKind::Click, raw, press.target));
                self.deferred
                    .push(event(PointerEventKind::DeferredClick, raw, press.target));
            }
        }
        if let Some(hover) = state.hover {
            out.push(event(PointerEventKind::Leave, raw, hover));
        }
        trace!(pointer = ?raw.pointer, "pointer released");
    }

    /// Hit test and emit leave/enter if the hovered node changed.
    fn update_hover<P>(
        &self,
        scene: &Scene<P>,
        raw: RawPointerEvent,
        state: &mut PointerState,
        out: &mut Vec<PointerEvent>,
    ) {
        let hit = scene.hit_test(self.root, raw.position).map(|h| h.node);
        if hit == state.hover {
            return;
        }
        if let Some(old) = state.hover {
            out.push(event(PointerEventKind::Leave, raw, old));
        }
        if let Some(new) = hit {
            out.push(event(PointerEventKind::Enter, raw, new));
        }
        state.hover = hit;
    }

    /// Remove and return the queued deferred clicks, oldest first.
    pub fn take_deferred(&mut self) -> Vec<PointerEvent> {
        core::mem::take(&mut self.deferred)
    }

    /// Drop queued deferred clicks of `pointer`.
    pub fn cancel_deferred(&mut self, pointer: PointerId) {
        self.deferred.retain(|e| e.pointer != pointer);
    }

    /// Forget `pointer` without emitting anything.
    pub fn reset(&mut self, pointer: PointerId) {
        if self.pointers.remove(&pointer).is_some() {
            debug!(?pointer, "pointer reset");
        }
        self.cancel_deferred(pointer);
    }

    /// Forget every pointer without emitting anything.
    pub fn reset_all(&mut self) {
        debug!(count = self.pointers.len(), "all pointers reset");
        self.pointers.clear();
        self.deferred.clear();
    }

    /// Drop hover, capture and queued clicks that refer to `node`.
    ///
    /// Call this after removing nodes from the scene. Stale ids are also
    /// dropped lazily on the next sample of each pointer.
    pub fn forget_node(&mut self, node: NodeId) {
        for state in self.pointers.values_mut() {
            if state.hover == Some(node) {
                state.hover = None;
            }
            if state.captured() == Some(node) {
                state.press = None;
            }
        }
        self.deferred.retain(|e| e.target != node);
    }

    /// Run one full turn: handle `raw`, deliver the immediate events, apply
    /// the deferred-click suppressions handlers asked for, then deliver the
    /// remaining deferred clicks.
    pub fn process<P>(
        &mut self,
        scene: &Scene<P>,
        listeners: &mut Listeners,
        raw: RawPointerEvent,
    ) -> DispatchReport {
        let events = self.handle(scene, raw);
        let mut report = listeners.dispatch(scene, &events);
        for pointer in &report.suppressed {
            self.cancel_deferred(*pointer);
        }
        let deferred = self.take_deferred();
        report.merge(listeners.dispatch(scene, &deferred));
        report
    }
}

fn event(kind: PointerEventKind, raw: RawPointerEvent, target: NodeId) -> PointerEvent {
    PointerEvent {
        kind,
        pointer: raw.pointer,
        target,
        position: raw.position,
        time: raw.time,
    }
}

fn on_cancel(raw: RawPointerEvent, state: &PointerState, out: &mut Vec<PointerEvent>) {
    debug!(pointer = ?raw.pointer, captured = ?state.captured(), "pointer cancelled");
    if let Some(hover) = state.hover {
        out.push(event(PointerEventKind::Leave, raw, hover));
    }
}

/// Clear references to nodes that were removed since the last sample.
fn drop_stale<P>(scene: &Scene<P>, pointer: PointerId, state: &mut PointerState) {
    if state.hover.is_some_and(|n| !scene.is_alive(n)) {
        trace!(?pointer, "hovered node was removed");
        state.hover = None;
    }
    if state.captured().is_some_and(|n| !scene.is_alive(n)) {
        trace!(?pointer, "captured node was removed");
        state.press = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerEventKind::*;
    use alloc::vec;

    fn raw(pointer: u64, kind: RawKind, x: f64, y: f64, time: u64) -> RawPointerEvent {
        RawPointerEvent::new(PointerId(pointer), kind, Point::new(x, y), time)
    }

    fn kinds(events: &[PointerEvent]) -> Vec<(PointerEventKind, NodeId)> {
        events.iter().map(|e| (e.kind, e.target)).collect()
    }

    /// A 100×100 root with a 50×50 button in its top-left corner.
    fn setup() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.insert_container();
        scene.set_size(root, 100.0, 100.0);
        scene.set_interactive(root, false);
        let button = scene.insert();
        scene.add_child(root, button).unwrap();
        scene.set_size(button, 50.0, 50.0);
        (scene, root, button)
    }

    #[test]
    fn hover_enter_and_leave() {
        let (scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        let ev = d.handle(&scene, raw(1, RawKind::Move, 10.0, 10.0, 0));
        assert_eq!(kinds(&ev), vec![(Enter, button), (Move, button)]);
        let ev = d.handle(&scene, raw(1, RawKind::Move, 20.0, 10.0, 1));
        assert_eq!(kinds(&ev), vec![(Move, button)]);
        let ev = d.handle(&scene, raw(1, RawKind::Move, 80.0, 80.0, 2));
        assert_eq!(kinds(&ev), vec![(Leave, button)]);
        assert_eq!(d.hover(PointerId(1)), None);
    }

    #[test]
    fn click_without_movement() {
        let (scene, root, button) = setup();
        let config = PointerConfig::default().with_drag_threshold(5.0);
        let mut d = PointerDispatcher::with_config(root, config);
        let ev = d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        assert_eq!(kinds(&ev), vec![(Enter, button), (Down, button)]);
        assert_eq!(d.captured(PointerId(1)), Some(button));
        let ev = d.handle(&scene, raw(1, RawKind::Up, 10.0, 10.0, 50));
        assert_eq!(kinds(&ev), vec![(Up, button), (Click, button), (Leave, button)]);
        assert_eq!(kinds(&d.take_deferred()), vec![(DeferredClick, button)]);
        assert!(d.take_deferred().is_empty());
        assert!(d.state(PointerId(1)).is_none());
        // The pointer is still over the button; the next sample enters it again.
        let ev = d.handle(&scene, raw(1, RawKind::Move, 10.0, 10.0, 60));
        assert_eq!(kinds(&ev), vec![(Enter, button), (Move, button)]);
    }

    #[test]
    fn capture_routes_moves_outside_the_target() {
        let (scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        let ev = d.handle(&scene, raw(1, RawKind::Move, 90.0, 90.0, 1));
        assert_eq!(kinds(&ev), vec![(DragStart, button), (Move, button)]);
        let ev = d.handle(&scene, raw(1, RawKind::Move, 95.0, 95.0, 2));
        assert_eq!(kinds(&ev), vec![(Move, button)], "drag start is emitted once");
        // Release outside: no click.
        let ev = d.handle(&scene, raw(1, RawKind::Up, 95.0, 95.0, 3));
        assert_eq!(kinds(&ev), vec![(Up, button), (Leave, button)]);
        assert!(d.take_deferred().is_empty());
    }

    #[test]
    fn moving_back_does_not_restore_the_click() {
        let (scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        d.handle(&scene, raw(1, RawKind::Move, 30.0, 30.0, 1));
        d.handle(&scene, raw(1, RawKind::Move, 10.0, 10.0, 2));
        let ev = d.handle(&scene, raw(1, RawKind::Up, 10.0, 10.0, 3));
        assert_eq!(kinds(&ev), vec![(Up, button), (Leave, button)]);
    }

    #[test]
    fn second_down_while_captured_is_ignored() {
        let (scene, root, _) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        assert!(d.handle(&scene, raw(1, RawKind::Down, 12.0, 12.0, 1)).is_empty());
        let press = d.state(PointerId(1)).unwrap().press.unwrap();
        assert_eq!(press.origin, Point::new(10.0, 10.0));
    }

    #[test]
    fn cancel_leaves_without_clicking() {
        let (scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        let ev = d.handle(&scene, raw(1, RawKind::Cancel, 10.0, 10.0, 1));
        assert_eq!(kinds(&ev), vec![(Leave, button)]);
        assert!(d.state(PointerId(1)).is_none());
        assert!(d.take_deferred().is_empty());
    }

    #[test]
    fn slow_press_is_not_a_click() {
        let (scene, root, button) = setup();
        let config = PointerConfig::default().with_max_click_duration(Some(200));
        let mut d = PointerDispatcher::with_config(root, config);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        let ev = d.handle(&scene, raw(1, RawKind::Up, 10.0, 10.0, 500));
        assert_eq!(kinds(&ev), vec![(Up, button), (Leave, button)]);
    }

    #[test]
    fn reset_is_silent() {
        let (scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        d.handle(&scene, raw(2, RawKind::Down, 10.0, 10.0, 0));
        d.handle(&scene, raw(2, RawKind::Up, 10.0, 10.0, 1));
        d.reset(PointerId(2));
        assert!(d.take_deferred().is_empty());
        assert_eq!(d.captured(PointerId(1)), Some(button));
        d.reset_all();
        assert!(d.state(PointerId(1)).is_none());
        // The next sample starts from scratch.
        let ev = d.handle(&scene, raw(1, RawKind::Move, 10.0, 10.0, 2));
        assert_eq!(kinds(&ev), vec![(Enter, button), (Move, button)]);
    }

    #[test]
    fn removed_nodes_are_dropped_silently() {
        let (mut scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        scene.remove(button);
        let ev = d.handle(&scene, raw(1, RawKind::Up, 10.0, 10.0, 1));
        assert!(ev.is_empty());
        assert!(d.take_deferred().is_empty());
        assert!(d.state(PointerId(1)).is_none());
    }

    #[test]
    fn released_pointers_leave_no_record() {
        let (scene, root, _) = setup();
        let mut d = PointerDispatcher::new(root);
        for id in 0..1000 {
            let x = (id % 100) as f64;
            d.handle(&scene, raw(id, RawKind::Down, x, 10.0, id));
            d.handle(&scene, raw(id, RawKind::Up, x, 10.0, id + 1));
        }
        assert!((0..1000).all(|id| d.state(PointerId(id)).is_none()));
        assert!(d.pointers.is_empty());
    }

    #[test]
    fn forget_node_clears_state_and_queue() {
        let (scene, root, button) = setup();
        let mut d = PointerDispatcher::new(root);
        d.handle(&scene, raw(1, RawKind::Down, 10.0, 10.0, 0));
        d.handle(&scene, raw(1, RawKind::Up, 10.0, 10.0, 1));
        d.handle(&scene, raw(2, RawKind::Down, 10.0, 10.0, 2));
        d.forget_node(button);
        assert!(d.take_deferred().is_empty());
        assert_eq!(d.hover(PointerId(2)), None);
        assert_eq!(d.captured(PointerId(2)), None);
        assert!(d.state(PointerId(2)).is_some());
    }
}
