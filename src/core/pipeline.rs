// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Shared processing pipeline
//!
//! One pipeline instance serves every observer: the producer submits frames
//! here, the engine runs single-flight behind the gate, and results fan out
//! through the event bus. Observers never run their own engine copy against
//! the same sensor.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

use super::{Engine, EventBus, ProcessingGate, StepOutcome};
use crate::config::EngineConfig;
use crate::sensors::Frame;

/// What became of a submitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Telemetry (and possibly an event) went out.
    Processed,
    /// The frame became the new background; nothing published.
    CaptureOnly,
    /// Ignored: no background captured yet.
    AwaitingBackground,
    /// Dropped: another frame was mid-pipeline.
    Dropped,
}

/// Counters for observability.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub processed: u64,
    pub captures: u64,
    pub dropped: u64,
}

pub struct Pipeline {
    gate: ProcessingGate,
    engine: Mutex<Engine>,
    bus: Arc<EventBus>,
    capture_requested: AtomicBool,
    processed: AtomicU64,
    captures: AtomicU64,
}

impl Pipeline {
    pub fn new(config: EngineConfig, bus: Arc<EventBus>) -> Self {
        Self {
            gate: ProcessingGate::new(),
            engine: Mutex::new(Engine::new(config)),
            bus,
            capture_requested: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            captures: AtomicU64::new(0),
        }
    }

    /// Ask for the next frame to be stored as the new background. Accepted
    /// at any time; consumed by the next frame that clears the gate.
    pub fn request_background_capture(&self) {
        self.capture_requested.store(true, Ordering::SeqCst);
    }

    /// Run one frame through the pipeline. Never blocks on a concurrent
    /// step: overlapping frames are dropped.
    pub fn submit(&self, frame: &Frame) -> SubmitResult {
        let Some(_guard) = self.gate.try_acquire() else {
            trace!("frame dropped: pipeline busy");
            return SubmitResult::Dropped;
        };

        // Consumed only once the gate is held, so a request outstanding
        // during a dropped frame survives for the next one.
        let capture = self.capture_requested.swap(false, Ordering::SeqCst);

        let outcome = {
            let mut engine = self.engine.lock();
            engine.process(frame, capture, Instant::now())
        };

        match outcome {
            StepOutcome::Processed { telemetry, event } => {
                self.processed.fetch_add(1, Ordering::Relaxed);
                self.bus.publish_telemetry(telemetry);
                if let Some(event) = event {
                    self.bus.publish_event(event);
                }
                SubmitResult::Processed
            }
            StepOutcome::BackgroundCaptured => {
                self.captures.fetch_add(1, Ordering::Relaxed);
                SubmitResult::CaptureOnly
            }
            StepOutcome::AwaitingBackground => SubmitResult::AwaitingBackground,
        }
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            processed: self.processed.load(Ordering::Relaxed),
            captures: self.captures.load(Ordering::Relaxed),
            dropped: self.gate.dropped(),
        }
    }
}
