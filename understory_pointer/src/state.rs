// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the dispatcher remembers about one pointer.

use kurbo::{Point, Vec2};
use understory_scene::NodeId;

/// Where a press started and whether it has turned into a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Press {
    /// Node that received the press and holds the capture.
    pub target: NodeId,
    /// Pointer position at the press, in scene space.
    pub origin: Point,
    /// Time of the press in milliseconds.
    pub time: u64,
    /// Set once the pointer moves past the drag threshold; never cleared
    /// before release.
    pub dragging: bool,
}

impl Press {
    /// Offset of `pos` from the press origin.
    pub fn offset(&self, pos: Point) -> Vec2 {
        pos - self.origin
    }
}

/// Per-pointer record, created on the first event for a pointer and dropped
/// on its release or cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Node currently under the pointer.
    pub hover: Option<NodeId>,
    /// The active press, if the pointer is down on a node.
    pub press: Option<Press>,
    /// Last reported position in scene space.
    pub last_position: Option<Point>,
}

impl PointerState {
    /// Node that captured the pointer, if any.
    pub fn captured(&self) -> Option<NodeId> {
        self.press.map(|p| p.target)
    }

    /// Whether the current press has become a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }
}
