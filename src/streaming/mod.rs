//! Streaming module - WebSocket fan-out and UDP discovery

mod discovery;
mod websocket;

pub use discovery::DiscoveryResponder;
pub use websocket::WebSocketServer;

use serde::{Deserialize, Serialize};

/// Streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Enable the WebSocket observer server
    pub websocket_enabled: bool,
    pub websocket_port: u16,
    pub websocket_max_clients: usize,

    /// Enable the UDP discovery responder
    pub discovery_enabled: bool,
    pub discovery_port: u16,
    pub discovery_probe: String,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            websocket_enabled: true,
            websocket_port: 8765,
            websocket_max_clients: 10,

            discovery_enabled: true,
            discovery_port: 41234,
            discovery_probe: "DISCOVER_BEDWATCH".to_string(),
        }
    }
}
