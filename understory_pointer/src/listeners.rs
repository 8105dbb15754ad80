// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node event subscriptions and delivery.
//!
//! Delivery follows a simple propagation rule:
//!
//! - [`Enter`](PointerEventKind::Enter) and [`Leave`](PointerEventKind::Leave)
//!   reach listeners on the target only.
//! - Every other kind visits the target, then each ancestor up to the root.
//! - Within a node, listeners run in subscription order.
//! - [`Outcome::Stop`] ends delivery of that event immediately.
//!
//! The path is computed before any handler runs, so a handler cannot change
//! which nodes an event visits.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use understory_scene::{NodeId, Scene};

use crate::event::{PointerEvent, PointerEventKind, PointerId};

/// Handle returned by [`Listeners::on`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a handler wants to happen next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep delivering to the remaining listeners.
    Continue,
    /// Stop delivering this event.
    Stop,
}

/// Per-call context handed to a handler.
#[derive(Debug)]
pub struct DispatchControl {
    current: NodeId,
    local: Option<Point>,
    suppress: bool,
}

impl DispatchControl {
    /// The node whose listener is running; the target or one of its ancestors.
    pub fn current_node(&self) -> NodeId {
        self.current
    }

    /// The event position in the current node's local space, or `None` if
    /// its world matrix cannot be inverted.
    pub fn local_position(&self) -> Option<Point> {
        self.local
    }

    /// Ask that the pending deferred click of this event's pointer be dropped.
    ///
    /// Only meaningful while handling the immediate events of a turn; see
    /// [`PointerDispatcher::process`](crate::PointerDispatcher::process).
    pub fn suppress_deferred_click(&mut self) {
        self.suppress = true;
    }
}

type Handler = Box<dyn FnMut(&PointerEvent, &mut DispatchControl) -> Outcome>;

struct Entry {
    id: ListenerId,
    kind: PointerEventKind,
    handler: Handler,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Summary of one [`Listeners::dispatch`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of handler invocations.
    pub delivered: usize,
    /// Number of events whose delivery a handler stopped.
    pub stopped: usize,
    /// Pointers whose deferred click a handler asked to suppress, without duplicates.
    pub suppressed: Vec<PointerId>,
}

impl DispatchReport {
    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.stopped += other.stopped;
        for p in other.suppressed {
            self.note_suppressed(p);
        }
    }

    fn note_suppressed(&mut self, pointer: PointerId) {
        if !self.suppressed.contains(&pointer) {
            self.suppressed.push(pointer);
        }
    }
}

/// Event handlers registered per node and event kind.
#[derive(Debug, Default)]
pub struct Listeners {
    by_node: HashMap<NodeId, Vec<Entry>>,
    owners: HashMap<ListenerId, NodeId>,
    next_id: u64,
}

impl Listeners {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind` at `node` and its descendants
    /// (descendants only for bubbling kinds).
    pub fn on(
        &mut self,
        node: NodeId,
        kind: PointerEventKind,
        handler: impl FnMut(&PointerEvent, &mut DispatchControl) -> Outcome + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.by_node.entry(node).or_default().push(Entry {
            id,
            kind,
            handler: Box::new(handler),
        });
        self.owners.insert(id, node);
        id
    }

    /// Unsubscribe one handler. Returns whether it was registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let Some(node) = self.owners.remove(&id) else {
            return false;
        };
        if let Some(entries) = self.by_node.get_mut(&node) {
            entries.retain(|e| e.id != id);
            if entries.is_empty() {
                self.by_node.remove(&node);
            }
        }
        true
    }

    /// Drop every handler of `node`, typically after it was removed from the
    /// scene. Returns how many were dropped.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let Some(entries) = self.by_node.remove(&node) else {
            return 0;
        };
        for e in &entries {
            self.owners.remove(&e.id);
        }
        entries.len()
    }

    /// Number of handlers registered on `node`.
    pub fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    /// Deliver `events` in order. Events addressed to removed nodes are skipped.
    pub fn dispatch<P>(&mut self, scene: &Scene<P>, events: &[PointerEvent]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for ev in events {
            let path = if ev.kind.bubbles() {
                let mut path = scene.path_to_root(ev.target);
                path.reverse();
                path
            } else if scene.is_alive(ev.target) {
                alloc::vec![ev.target]
            } else {
                Vec::new()
            };
            'path: for node in path {
                let Some(entries) = self.by_node.get_mut(&node) else {
                    continue;
                };
                for entry in entries.iter_mut().filter(|e| e.kind == ev.kind) {
                    let mut control = DispatchControl {
                        current: node,
                        local: scene.to_local(node, ev.position).ok(),
                        suppress: false,
                    };
                    let outcome = (entry.handler)(ev, &mut control);
                    report.delivered += 1;
                    if control.suppress {
                        report.note_suppressed(ev.pointer);
                    }
                    if outcome == Outcome::Stop {
                        report.stopped += 1;
                        break 'path;
                    }
                }
            }
        }
        report
    }
}
