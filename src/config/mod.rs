// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::streaming::StreamingConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Log level
    pub log_level: String,

    /// Enable demo mode (simulated sensor)
    pub demo_mode: bool,

    /// Sensor acquisition configuration
    pub sensor: SensorConfig,

    /// Engine thresholds and timing
    pub engine: EngineConfig,

    /// Streaming configuration
    pub streaming: StreamingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "BedWatch".to_string(),
            log_level: "info".to_string(),
            demo_mode: true,
            sensor: SensorConfig::default(),
            engine: EngineConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("bedwatch"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Sensor acquisition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Samples per frame
    pub frame_len: usize,

    /// Target frame cadence in milliseconds
    pub frame_interval_ms: u64,

    /// Serial port for the hardware sensor
    pub serial_port: Option<String>,

    /// Serial baud rate
    pub baud_rate: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            frame_len: 256,
            frame_interval_ms: 40,
            serial_port: None,
            baud_rate: 57600,
        }
    }
}

/// Engine thresholds and timing.
///
/// Position boundaries are indices into the sensor scan: the near end of the
/// array is the bed, the far end is the doorway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Peak threshold for the background-diff profile
    pub background_threshold: u8,

    /// Peak threshold for the inter-frame motion profile
    pub motion_threshold: u8,

    /// Telemetry peak marker is reported only when the filtered maximum is
    /// strictly above this floor...
    pub telemetry_floor: u8,

    /// ...and strictly below this ceiling
    pub telemetry_ceiling: u8,

    /// Positions below this are the patient resting in bed
    pub patient_zone_max: f64,

    /// Positions above this are someone at the doorway
    pub visitor_zone_min: f64,

    /// Patient at or below this is edge-sitting, above it out of bed
    pub edge_sit_max: f64,

    /// A track lost above this means the patient left the bed
    pub bed_exit_min: f64,

    /// Stillness window before the background auto-refreshes, in ms
    pub stabilization_ms: u64,

    /// Quiet window before a departed visitor resets the state, in ms
    pub visitor_reset_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            background_threshold: 15,
            motion_threshold: 10,
            telemetry_floor: 10,
            telemetry_ceiling: 200,
            patient_zone_max: 70.0,
            visitor_zone_min: 170.0,
            edge_sit_max: 100.0,
            bed_exit_min: 150.0,
            stabilization_ms: 3000,
            visitor_reset_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.sensor.frame_len, 256);
        assert_eq!(parsed.engine.background_threshold, 15);
        assert_eq!(parsed.streaming.websocket_port, 8765);
    }
}
