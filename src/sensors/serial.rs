// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Serial-port frame source
//!
//! The sensor streams `0x00`-prefixed frames: a sync byte followed by
//! `frame_len` intensity samples. Anything before the sync byte is discarded,
//! so the reader resynchronizes after a partial or garbled frame.

use anyhow::{Context, Result};
use std::io::Read;
use std::time::Duration;
use tracing::info;

use super::{Frame, FrameSource};

const SYNC_BYTE: u8 = 0x00;

/// Reads frames from the hardware sensor over a serial port.
pub struct SerialFrameSource {
    port: Box<dyn serialport::SerialPort>,
    path: String,
    frame_len: usize,
    buffer: Vec<u8>,
}

impl SerialFrameSource {
    pub fn open(path: &str, baud_rate: u32, frame_len: usize) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(500))
            .open()
            .with_context(|| format!("failed to open serial port {path}"))?;

        info!("Serial port {} opened at {} baud", path, baud_rate);

        Ok(Self {
            port,
            path: path.to_string(),
            frame_len,
            buffer: Vec::new(),
        })
    }

    /// Pull one framed payload out of the receive buffer, if complete.
    fn extract_frame(&mut self) -> Option<Vec<u8>> {
        let sync = self.buffer.iter().position(|&b| b == SYNC_BYTE)?;
        if self.buffer.len() < sync + 1 + self.frame_len {
            // Drop the junk before the sync byte, keep waiting for the rest.
            self.buffer.drain(..sync);
            return None;
        }
        let frame: Vec<u8> = self.buffer[sync + 1..sync + 1 + self.frame_len].to_vec();
        self.buffer.drain(..sync + 1 + self.frame_len);
        Some(frame)
    }
}

impl FrameSource for SerialFrameSource {
    fn name(&self) -> &str {
        &self.path
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let mut chunk = [0u8; 512];
        loop {
            if let Some(samples) = self.extract_frame() {
                return Ok(Frame::new(samples, self.frame_len)?);
            }

            match self.port.read(&mut chunk) {
                Ok(0) => continue,
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e).context("serial read failed"),
            }
        }
    }
}
