//! Core engine module - per-frame processing, single-flight gating, and
//! event publication

mod engine;
mod event_bus;
mod gate;
mod pipeline;

pub use engine::{Engine, StepOutcome};
pub use event_bus::{EventBus, WireMessage};
pub use gate::{GateGuard, ProcessingGate};
pub use pipeline::{Pipeline, PipelineStats, SubmitResult};

use serde::{Deserialize, Serialize};

use crate::detection::{Person, Status};

/// Per-frame telemetry snapshot for visualization: the raw scan, the stored
/// background, the noise-floor-filtered diff, and the in-band peak marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    pub peak_index: Option<usize>,
    pub data_values: Vec<u8>,
    pub back_values: Vec<u8>,
    pub filtered: Vec<u8>,
}

/// Occupancy state event. Published only when any field differs from the
/// previously published event (exact equality, no tolerance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub peak_position: Option<f64>,
    pub status: Status,
    pub person: Option<Person>,
    pub message: String,
}

impl StatusEvent {
    /// The payload corresponding to the engine's initial state. Seeds the
    /// de-duplication buffer so a quiet start publishes nothing.
    pub fn initial() -> Self {
        Self {
            peak_position: None,
            status: Status::BedOccupied,
            person: None,
            message: String::new(),
        }
    }
}
