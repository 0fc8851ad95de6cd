// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! BedWatch - Bed-Exit Monitoring Engine
//!
//! Continuous single-room safety monitoring from one proximity/motion
//! sensor:
//! - background-subtraction filtering with adaptive recalibration
//! - dual-profile peak detection and position fusion
//! - occupant/visitor discriminant state machine with timer-based decay
//! - single-flight processing with de-duplicated event fan-out
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      BedWatch Pipeline                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐  ┌──────────┐  ┌───────────┐  ┌─────────────┐   │
//! │  │ Frame   │→ │ Signal   │→ │ Occupancy │→ │ Event Bus   │   │
//! │  │ Source  │  │ Analysis │  │ Detection │  │ (broadcast) │   │
//! │  └─────────┘  └──────────┘  └───────────┘  └─────────────┘   │
//! │       ↑           single-flight gate             ↓           │
//! │  ┌─────────┐                              ┌─────────────┐    │
//! │  │ Serial/ │                              │ WebSocket   │    │
//! │  │ Sim     │                              │ Observers   │    │
//! │  └─────────┘                              └─────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod analysis;
pub mod config;
pub mod core;
pub mod detection;
pub mod sensors;
pub mod streaming;

// Re-exports for convenience
pub use config::Config;
pub use core::{Engine, EventBus, Pipeline, StatusEvent, Telemetry, WireMessage};
pub use detection::{Person, Status};
pub use sensors::{Frame, FrameError, FrameSource, SensorSimulator};
pub use streaming::{DiscoveryResponder, WebSocketServer};

/// BedWatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// BedWatch name
pub const NAME: &str = "BedWatch";
