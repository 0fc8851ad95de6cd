// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Single-flight processing gate
//!
//! At most one frame may be mid-pipeline at a time. A frame arriving while
//! the gate is held is dropped, not queued: under load the engine favors
//! recency over completeness. The guard releases on drop, so the gate opens
//! on every exit path including unwinds.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Try-acquire guard around one processing step.
pub struct ProcessingGate {
    busy: AtomicBool,
    dropped: AtomicU64,
}

impl ProcessingGate {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    /// Acquire the gate, or record one dropped frame.
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(GateGuard { gate: self })
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Frames dropped because the gate was held (backpressure counter).
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for ProcessingGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped hold on the gate; releases when dropped.
pub struct GateGuard<'a> {
    gate: &'a ProcessingGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let gate = ProcessingGate::new();
        let guard = gate.try_acquire();
        assert!(guard.is_some());
        assert!(gate.try_acquire().is_none());
        assert_eq!(gate.dropped(), 1);
    }

    #[test]
    fn test_gate_reopens_after_release() {
        let gate = ProcessingGate::new();
        drop(gate.try_acquire().unwrap());
        assert!(gate.try_acquire().is_some());
        assert_eq!(gate.dropped(), 0);
    }

    #[test]
    fn test_gate_releases_on_unwind() {
        let gate = ProcessingGate::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = gate.try_acquire().unwrap();
            panic!("downstream publish blew up");
        }));
        assert!(result.is_err());
        assert!(gate.try_acquire().is_some());
    }
}
