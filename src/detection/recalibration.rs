// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Adaptive background recalibration policy
//!
//! Once motion stops and stays stopped for the stabilization window, the
//! current frame is assumed to be the new steady background (the occupant
//! settled in a slightly different resting position). Without this, the
//! original background drifts out of date and produces permanent false
//! positives.

use std::time::{Duration, Instant};

/// Watches the motion-peak presence across frames and decides when the
/// baseline should be silently refreshed.
pub struct BackgroundRecalibrator {
    window: Duration,
    prev_motion_present: bool,
    awaiting_stabilization: bool,
    motion_stopped_at: Instant,
}

impl BackgroundRecalibrator {
    pub fn new(stabilization_ms: u64, now: Instant) -> Self {
        Self {
            window: Duration::from_millis(stabilization_ms),
            prev_motion_present: false,
            awaiting_stabilization: false,
            motion_stopped_at: now,
        }
    }

    /// Feed the motion-peak presence for one frame. Returns `true` when the
    /// stabilization window has elapsed and the caller should replace the
    /// background with the current frame.
    pub fn observe(&mut self, motion_present: bool, now: Instant) -> bool {
        if !motion_present && self.prev_motion_present {
            // Motion just stopped: start waiting for the scene to settle.
            self.motion_stopped_at = now;
            self.awaiting_stabilization = true;
        } else if motion_present {
            self.awaiting_stabilization = false;
        }
        self.prev_motion_present = motion_present;

        if self.awaiting_stabilization
            && now.duration_since(self.motion_stopped_at) >= self.window
        {
            self.awaiting_stabilization = false;
            self.motion_stopped_at = now;
            return true;
        }
        false
    }

    /// Forget all pending state, e.g. after an explicit background capture.
    pub fn reset(&mut self, now: Instant) {
        self.prev_motion_present = false;
        self.awaiting_stabilization = false;
        self.motion_stopped_at = now;
    }
}
