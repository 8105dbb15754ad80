// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pointer --heading-base-level=0

//! Understory Pointer: hover, capture and click-versus-drag over a scene.
//!
//! [`PointerDispatcher`] turns raw samples ([`RawPointerEvent`]) into semantic
//! [`PointerEvent`]s addressed to nodes of an
//! [`understory_scene::Scene`]. Each [`PointerId`] gets its own state, so a
//! mouse and several touch contacts can be tracked at once.
//!
//! - Hover: the node under the pointer receives `Enter` and `Leave` as it
//!   changes.
//! - Capture: the node that received `Down` receives every sample until
//!   release, wherever the pointer goes.
//! - Click versus drag: moving farther than [`PointerConfig::drag_threshold`]
//!   from the press point starts a drag, and a drag never clicks.
//! - Deferred click: every click is followed, after all immediate handlers
//!   have run, by a `DeferredClick` which any of those handlers can suppress.
//!
//! [`Listeners`] holds per-node handlers and delivers events to the target and
//! its ancestors. [`PointerDispatcher::process`] runs a whole turn.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::Point;
//! use understory_pointer::{
//!     Listeners, Outcome, PointerDispatcher, PointerEventKind, PointerId, RawKind,
//!     RawPointerEvent,
//! };
//! use understory_scene::Scene;
//!
//! let mut scene = Scene::<()>::new();
//! let root = scene.insert_container();
//! scene.set_size(root, 200.0, 200.0);
//! let button = scene.insert();
//! scene.add_child(root, button).unwrap();
//! scene.set_size(button, 40.0, 20.0);
//!
//! let clicks = Rc::new(Cell::new(0));
//! let mut listeners = Listeners::new();
//! let c = clicks.clone();
//! listeners.on(button, PointerEventKind::Click, move |_, _| {
//!     c.set(c.get() + 1);
//!     Outcome::Stop
//! });
//!
//! let mut pointers = PointerDispatcher::new(root);
//! let mouse = PointerId(0);
//! let at = Point::new(10.0, 10.0);
//! pointers.process(&scene, &mut listeners, RawPointerEvent::new(mouse, RawKind::Down, at, 0));
//! pointers.process(&scene, &mut listeners, RawPointerEvent::new(mouse, RawKind::Up, at, 80));
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod dispatcher;
mod event;
mod listeners;
mod state;

pub use config::{PointerConfig, default_drag_threshold, set_default_drag_threshold};
pub use dispatcher::PointerDispatcher;
pub use event::{PointerEvent, PointerEventKind, PointerId, RawKind, RawPointerEvent};
pub use listeners::{DispatchControl, DispatchReport, ListenerId, Listeners, Outcome};
pub use state::{PointerState, Press};
