// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input and the semantic events derived from it.

use kurbo::Point;
use understory_scene::NodeId;

/// Identifies one pointer: a mouse, a pen, or one finger of a touch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// What the host observed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawKind {
    /// The pointer moved.
    Move,
    /// A button or contact was pressed.
    Down,
    /// A button or contact was released.
    Up,
    /// The platform abandoned the pointer (lost capture, touch cancelled).
    Cancel,
}

/// One platform input sample, already mapped into scene space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawPointerEvent {
    /// Which pointer produced the sample.
    pub pointer: PointerId,
    /// What happened.
    pub kind: RawKind,
    /// Position in scene space.
    pub position: Point,
    /// Timestamp in milliseconds from any fixed origin.
    pub time: u64,
}

impl RawPointerEvent {
    /// A sample for `pointer` at `position` and `time`.
    pub fn new(pointer: PointerId, kind: RawKind, position: impl Into<Point>, time: u64) -> Self {
        Self {
            pointer,
            kind,
            position: position.into(),
            time,
        }
    }
}

/// Kinds of semantic pointer events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// The pointer started hovering the target.
    Enter,
    /// The pointer stopped hovering the target.
    Leave,
    /// The pointer moved over, or while captured by, the target.
    Move,
    /// The target was pressed and captured the pointer.
    Down,
    /// The pointer was released while captured by the target.
    Up,
    /// A press on the target moved past the drag threshold.
    DragStart,
    /// A press and release on the target that never became a drag.
    Click,
    /// The same click, delivered after every immediate handler has run
    /// and had the chance to suppress it.
    DeferredClick,
}

impl PointerEventKind {
    /// Whether listeners on ancestors of the target also receive the event.
    ///
    /// Hover transitions are delivered to the target only.
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Enter | Self::Leave)
    }
}

/// A semantic event addressed to one node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// The pointer it happened to.
    pub pointer: PointerId,
    /// The node it is addressed to.
    pub target: NodeId,
    /// Pointer position in scene space.
    pub position: Point,
    /// Timestamp of the raw sample that caused it.
    pub time: u64,
}
