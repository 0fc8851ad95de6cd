// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Per-frame processing engine
//!
//! Owns every piece of mutable pipeline state: the background, the
//! previous-frame buffer, the previous fused position, the occupancy state
//! machine, the recalibration timers, and the last published event. All of
//! it is touched only inside `process`, one frame at a time.

use std::time::Instant;
use tracing::{debug, info};

use super::{StatusEvent, Telemetry};
use crate::analysis::{
    diff_profile, filtered_profile, find_peak, inter_frame_profile, telemetry_peak_index,
};
use crate::config::EngineConfig;
use crate::detection::{fuse_position, BackgroundRecalibrator, OccupancyStateMachine};
use crate::sensors::Frame;

/// Result of one processing step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The frame was consumed as the new background; nothing published.
    BackgroundCaptured,
    /// No background captured yet; the frame was ignored.
    AwaitingBackground,
    /// Telemetry for this frame, plus an event when the de-duplicated
    /// payload changed.
    Processed {
        telemetry: Telemetry,
        event: Option<StatusEvent>,
    },
}

pub struct Engine {
    config: EngineConfig,
    background: Option<Vec<u8>>,
    prev_frame: Vec<u8>,
    prev_position: Option<f64>,
    state: OccupancyStateMachine,
    recalibrator: BackgroundRecalibrator,
    last_event: StatusEvent,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            background: None,
            prev_frame: Vec::new(),
            prev_position: None,
            state: OccupancyStateMachine::new(config),
            recalibrator: BackgroundRecalibrator::new(config.stabilization_ms, now),
            last_event: StatusEvent::initial(),
        }
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Process one frame. `capture` consumes the frame as the new background
    /// instead of classifying it.
    pub fn process(&mut self, frame: &Frame, capture: bool, now: Instant) -> StepOutcome {
        if capture {
            let samples = frame.samples().to_vec();
            self.prev_frame = samples.clone();
            self.background = Some(samples);
            self.prev_position = None;
            self.recalibrator.reset(now);
            info!("Background captured");
            return StepOutcome::BackgroundCaptured;
        }

        let background = match &self.background {
            Some(b) => b.clone(),
            None => return StepOutcome::AwaitingBackground,
        };

        let diff = diff_profile(frame.samples(), &background);
        let filtered = filtered_profile(&diff);
        let peak_index =
            telemetry_peak_index(&filtered, self.config.telemetry_floor, self.config.telemetry_ceiling);

        let telemetry = Telemetry {
            peak_index,
            data_values: frame.samples().to_vec(),
            back_values: background,
            filtered,
        };

        let inter = inter_frame_profile(frame.samples(), &self.prev_frame);
        self.prev_frame = frame.samples().to_vec();

        let background_peak = find_peak(&diff, self.config.background_threshold);
        let motion_peak = find_peak(&inter, self.config.motion_threshold);
        let position = fuse_position(background_peak, motion_peak);
        debug!(?background_peak, ?motion_peak, ?position, "frame analyzed");

        let message = self.state.step(position, self.prev_position, now);

        if self.recalibrator.observe(motion_peak.is_some(), now) {
            self.background = Some(frame.samples().to_vec());
            info!("Background auto-recalibrated after stillness window");
        }

        self.prev_position = position;

        let payload = StatusEvent {
            peak_position: position,
            status: self.state.status(),
            person: self.state.person(),
            message: message.unwrap_or_default().to_string(),
        };
        let event = if payload != self.last_event {
            self.last_event = payload.clone();
            Some(payload)
        } else {
            None
        };

        StepOutcome::Processed { telemetry, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Person, Status};
    use std::time::Duration;

    const N: usize = 256;

    fn flat(level: u8) -> Frame {
        Frame::new(vec![level; N], N).unwrap()
    }

    /// Flat frame with an intensity blob at `center`.
    fn blob(center: usize, height: u8) -> Frame {
        let mut samples = vec![20u8; N];
        samples[center - 1] = 20 + height / 2;
        samples[center] = 20 + height;
        samples[center + 1] = 20 + height / 2;
        Frame::new(samples, N).unwrap()
    }

    fn engine_with_background(now: Instant) -> Engine {
        let mut engine = Engine::new(EngineConfig::default());
        assert_eq!(
            engine.process(&flat(20), true, now),
            StepOutcome::BackgroundCaptured
        );
        engine
    }

    #[test]
    fn test_frames_before_capture_are_ignored() {
        let mut engine = Engine::new(EngineConfig::default());
        let outcome = engine.process(&blob(40, 80), false, Instant::now());
        assert_eq!(outcome, StepOutcome::AwaitingBackground);
    }

    #[test]
    fn test_identical_frame_after_capture_is_quiet() {
        let now = Instant::now();
        let mut engine = engine_with_background(now);

        match engine.process(&flat(20), false, now) {
            StepOutcome::Processed { telemetry, event } => {
                assert!(telemetry.filtered.iter().all(|&v| v == 0));
                assert_eq!(telemetry.peak_index, None);
                assert_eq!(event, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_occupant_near_bed_classifies_and_publishes_once() {
        let now = Instant::now();
        let mut engine = engine_with_background(now);

        let frame = blob(40, 80);
        match engine.process(&frame, false, now) {
            StepOutcome::Processed { telemetry, event } => {
                assert_eq!(telemetry.peak_index, Some(40));
                let event = event.expect("first classified frame publishes");
                assert_eq!(event.status, Status::BedOccupied);
                assert_eq!(event.person, Some(Person::Patient));
                assert_eq!(event.peak_position, Some(40.0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // Same frame again: a continuous track at P<=100 means the patient
        // is upright at the bed edge.
        match engine.process(&frame, false, now) {
            StepOutcome::Processed { event, .. } => {
                let event = event.expect("status change publishes");
                assert_eq!(event.status, Status::EdgeSitting);
                assert_eq!(event.message, crate::detection::MSG_EDGE_SITTING);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // Third identical frame: status stable, message clears, publish once.
        match engine.process(&frame, false, now) {
            StepOutcome::Processed { event, .. } => {
                let event = event.expect("message change publishes");
                assert_eq!(event.status, Status::EdgeSitting);
                assert!(event.message.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // Fourth: payload identical to the last published one, de-duplicated.
        match engine.process(&frame, false, now) {
            StepOutcome::Processed { event, .. } => assert_eq!(event, None),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_capture_only_frame_publishes_nothing_and_resets_track() {
        let now = Instant::now();
        let mut engine = engine_with_background(now);
        engine.process(&blob(40, 80), false, now);

        let outcome = engine.process(&blob(40, 80), true, now);
        assert_eq!(outcome, StepOutcome::BackgroundCaptured);

        // The captured frame is the new baseline: its diff is flat and the
        // position track restarts from nothing.
        match engine.process(&blob(40, 80), false, now) {
            StepOutcome::Processed { telemetry, event } => {
                assert!(telemetry.filtered.iter().all(|&v| v == 0));
                let event = event.expect("position change publishes");
                assert_eq!(event.peak_position, None);
                assert_eq!(event.status, Status::BedOccupied);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_auto_recalibration_adopts_frame_after_stillness() {
        let t0 = Instant::now();
        let mut engine = engine_with_background(t0);

        // Motion: blob walks in.
        engine.process(&blob(40, 80), false, t0);
        engine.process(&blob(44, 80), false, t0 + Duration::from_millis(40));
        // Motion stops and the scene holds still past the window.
        let still = blob(44, 80);
        engine.process(&still, false, t0 + Duration::from_millis(80));
        engine.process(&still, false, t0 + Duration::from_millis(120));
        engine.process(&still, false, t0 + Duration::from_millis(3200));

        // Background now equals the still frame: its diff is flat.
        match engine.process(&still, false, t0 + Duration::from_millis(3240)) {
            StepOutcome::Processed { telemetry, .. } => {
                assert!(telemetry.filtered.iter().all(|&v| v == 0));
                assert_eq!(telemetry.back_values, still.samples());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_motion_resuming_cancels_auto_recalibration() {
        let t0 = Instant::now();
        let mut engine = engine_with_background(t0);

        engine.process(&blob(40, 80), false, t0);
        engine.process(&blob(44, 80), false, t0 + Duration::from_millis(40));
        let still = blob(44, 80);
        engine.process(&still, false, t0 + Duration::from_millis(80));
        // Motion resumes inside the window.
        engine.process(&blob(50, 80), false, t0 + Duration::from_millis(1000));
        // Stillness resumes but the original deadline passes unarmed.
        engine.process(&blob(50, 80), false, t0 + Duration::from_millis(1040));

        match engine.process(&blob(50, 80), false, t0 + Duration::from_millis(3100)) {
            StepOutcome::Processed { telemetry, .. } => {
                // Background is still the original flat capture.
                assert_eq!(telemetry.back_values, flat(20).samples());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_event_deduplication_is_exact_field_equality() {
        let now = Instant::now();
        let mut engine = engine_with_background(now);

        let first = match engine.process(&blob(40, 80), false, now) {
            StepOutcome::Processed { event, .. } => event,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert!(first.is_some());

        // A different position re-publishes even with unchanged status.
        let second = match engine.process(&blob(46, 80), false, now) {
            StepOutcome::Processed { event, .. } => event,
            other => panic!("unexpected outcome: {other:?}"),
        };
        let second = second.expect("position change republishes");
        assert_ne!(first.unwrap().peak_position, second.peak_position);
    }
}
