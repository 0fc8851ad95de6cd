// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Sensor simulator for demo/testing
//!
//! Generates a plausible single-room scenario with no hardware attached: a
//! noisy empty-room baseline plus an intensity blob that rests near the bed,
//! occasionally wanders toward the doorway, and settles again.

use anyhow::Result;
use rand::prelude::*;
use std::time::Duration;

use super::{Frame, FrameSource};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Resting,
    Wandering,
    Settling,
}

/// Simulates the proximity sensor's intensity array.
pub struct SensorSimulator {
    frame_len: usize,
    interval: Duration,
    rng: rand::rngs::StdRng,

    // Scenario state
    phase: Phase,
    phase_frames: u32,
    blob_center: f64,
    blob_target: f64,
}

impl SensorSimulator {
    pub fn new(frame_len: usize, frame_interval_ms: u64) -> Self {
        Self {
            frame_len,
            interval: Duration::from_millis(frame_interval_ms),
            rng: rand::rngs::StdRng::from_entropy(),
            phase: Phase::Resting,
            phase_frames: 0,
            blob_center: 40.0,
            blob_target: 40.0,
        }
    }

    fn advance_scenario(&mut self) {
        self.phase_frames += 1;
        let span = self.frame_len as f64;

        match self.phase {
            Phase::Resting => {
                if self.phase_frames > 200 && self.rng.gen::<f64>() < 0.01 {
                    self.phase = Phase::Wandering;
                    self.phase_frames = 0;
                    self.blob_target = self.rng.gen_range(0.45..0.85) * span;
                }
            }
            Phase::Wandering => {
                if (self.blob_center - self.blob_target).abs() < 2.0 {
                    self.phase = Phase::Settling;
                    self.phase_frames = 0;
                }
            }
            Phase::Settling => {
                if self.phase_frames > 150 {
                    self.phase = Phase::Wandering;
                    self.phase_frames = 0;
                    self.blob_target = self.rng.gen_range(0.1..0.3) * span;
                }
                if self.blob_target < 0.3 * span && (self.blob_center - self.blob_target).abs() < 2.0
                {
                    self.phase = Phase::Resting;
                    self.phase_frames = 0;
                }
            }
        }

        // Move toward the target with a little jitter.
        let step = (self.blob_target - self.blob_center).clamp(-1.5, 1.5);
        self.blob_center += step + self.rng.gen_range(-0.3..0.3);
        self.blob_center = self.blob_center.clamp(2.0, span - 3.0);
    }

    fn generate(&mut self) -> Vec<u8> {
        self.advance_scenario();

        let mut samples = vec![0u8; self.frame_len];
        for (i, sample) in samples.iter_mut().enumerate() {
            // Empty-room baseline with mild noise.
            let mut v = 20.0 + self.rng.gen_range(-3.0..3.0);

            // Occupant blob.
            let dist = (i as f64 - self.blob_center).abs();
            if dist < 12.0 {
                v += 60.0 * (-dist * dist / 30.0).exp();
            }

            *sample = v.clamp(0.0, 255.0) as u8;
        }
        samples
    }
}

impl FrameSource for SensorSimulator {
    fn name(&self) -> &str {
        "simulator"
    }

    fn next_frame(&mut self) -> Result<Frame> {
        // Hardware paces frame delivery; the simulator paces itself.
        std::thread::sleep(self.interval);
        let samples = self.generate();
        Ok(Frame::new(samples, self.frame_len)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_produces_valid_frames() {
        let mut sim = SensorSimulator::new(256, 0);
        for _ in 0..50 {
            let frame = sim.next_frame().unwrap();
            assert_eq!(frame.len(), 256);
        }
    }
}
