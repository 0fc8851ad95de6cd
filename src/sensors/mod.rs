//! Sensor module - frame acquisition and simulation

mod traits;
mod simulator;

#[cfg(feature = "serial")]
mod serial;

pub use traits::{Frame, FrameError, FrameSource};
pub use simulator::SensorSimulator;

#[cfg(feature = "serial")]
pub use serial::SerialFrameSource;
