// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Frame type and the acquisition trait

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frame validation failure. Rejected before any engine state is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame has {got} samples, expected {expected}")]
    WrongLength { got: usize, expected: usize },

    #[error("sample {index} out of range: {value} (expected 0..=255)")]
    SampleOutOfRange { index: usize, value: i64 },
}

/// One sensor scan: a fixed-length ordered sequence of intensity samples.
/// Immutable once captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    samples: Vec<u8>,
}

impl Frame {
    /// Build a frame from raw bytes, validating the length.
    pub fn new(samples: Vec<u8>, expected_len: usize) -> Result<Self, FrameError> {
        if samples.len() != expected_len {
            return Err(FrameError::WrongLength {
                got: samples.len(),
                expected: expected_len,
            });
        }
        Ok(Self { samples })
    }

    /// Build a frame from wider integers (e.g. a decoded JSON array),
    /// validating both length and sample range.
    pub fn from_values(values: &[i64], expected_len: usize) -> Result<Self, FrameError> {
        if values.len() != expected_len {
            return Err(FrameError::WrongLength {
                got: values.len(),
                expected: expected_len,
            });
        }
        let mut samples = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            let sample = u8::try_from(value)
                .map_err(|_| FrameError::SampleOutOfRange { index, value })?;
            samples.push(sample);
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A blocking producer of frames at a roughly periodic cadence. Runs on a
/// dedicated producer thread; the pipeline never blocks on acquisition.
pub trait FrameSource: Send {
    /// Source identifier for logging
    fn name(&self) -> &str;

    /// Block until the next complete frame is available
    fn next_frame(&mut self) -> Result<Frame>;
}
