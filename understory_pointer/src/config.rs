// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click and drag tuning.

use core::sync::atomic::{AtomicU64, Ordering};

/// Bits of `5.0_f64`.
const INITIAL_THRESHOLD_BITS: u64 = 0x4014_0000_0000_0000;

static DEFAULT_DRAG_THRESHOLD: AtomicU64 = AtomicU64::new(INITIAL_THRESHOLD_BITS);

/// The drag threshold used by [`PointerConfig::default`], initially `5.0`.
pub fn default_drag_threshold() -> f64 {
    f64::from_bits(DEFAULT_DRAG_THRESHOLD.load(Ordering::Relaxed))
}

/// Change the drag threshold picked up by configs created afterwards.
///
/// Negative and NaN values are stored as `0.0`. Existing configs keep their
/// own threshold.
pub fn set_default_drag_threshold(threshold: f64) {
    DEFAULT_DRAG_THRESHOLD.store(threshold.max(0.0).to_bits(), Ordering::Relaxed);
}

/// Tuning for a [`PointerDispatcher`](crate::PointerDispatcher).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerConfig {
    /// Distance in scene units a pressed pointer must move, strictly
    /// exceeding it, before the press becomes a drag and no longer clicks.
    pub drag_threshold: f64,
    /// Longest press, in milliseconds, that still clicks. `None` means any
    /// duration.
    pub max_click_duration: Option<u64>,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            drag_threshold: default_drag_threshold(),
            max_click_duration: None,
        }
    }
}

impl PointerConfig {
    /// Builder-style setter for [`drag_threshold`](Self::drag_threshold).
    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold.max(0.0);
        self
    }

    /// Builder-style setter for [`max_click_duration`](Self::max_click_duration).
    #[must_use]
    pub fn with_max_click_duration(mut self, millis: Option<u64>) -> Self {
        self.max_click_duration = millis;
        self
    }
}
