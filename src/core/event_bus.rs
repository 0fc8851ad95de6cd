// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Broadcast fan-out of engine output
//!
//! Every observer sees the same stream; nobody re-runs processing. A lagged
//! or closed subscriber only affects itself.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{StatusEvent, Telemetry};

/// Tagged wire message, validated at the boundary. Exactly what goes out on
/// the WebSocket as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    Telemetry(Telemetry),
    Event(StatusEvent),
}

/// Central pub/sub channel between the pipeline and observer transports.
pub struct EventBus {
    wire_tx: broadcast::Sender<WireMessage>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (wire_tx, _) = broadcast::channel(capacity);
        Self { wire_tx }
    }

    pub fn publish_telemetry(&self, telemetry: Telemetry) {
        // Send fails only when no subscriber exists; that is not an error.
        let _ = self.wire_tx.send(WireMessage::Telemetry(telemetry));
    }

    pub fn publish_event(&self, event: StatusEvent) {
        let _ = self.wire_tx.send(WireMessage::Event(event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WireMessage> {
        self.wire_tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.wire_tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Person, Status};

    #[test]
    fn test_telemetry_wire_format() {
        let msg = WireMessage::Telemetry(Telemetry {
            peak_index: Some(42),
            data_values: vec![1, 2],
            back_values: vec![3, 4],
            filtered: vec![0, 1],
        });
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(json["type"], "telemetry");
        assert_eq!(json["peak_index"], 42);
        assert_eq!(json["data_values"], serde_json::json!([1, 2]));
        assert_eq!(json["back_values"], serde_json::json!([3, 4]));
        assert_eq!(json["filtered"], serde_json::json!([0, 1]));
    }

    #[test]
    fn test_event_wire_format_uses_numeric_codes() {
        let msg = WireMessage::Event(StatusEvent {
            peak_position: Some(120.5),
            status: Status::OutOfBed,
            person: Some(Person::Patient),
            message: "Out of bed! Check immediately!".to_string(),
        });
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["peak_position"], 120.5);
        assert_eq!(json["status"], 3);
        assert_eq!(json["person"], 1);

        let quiet = WireMessage::Event(StatusEvent::initial());
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&quiet).unwrap()).unwrap();
        assert_eq!(json["peak_position"], serde_json::Value::Null);
        assert_eq!(json["person"], serde_json::Value::Null);
        assert_eq!(json["status"], 1);
    }

    #[tokio::test]
    async fn test_all_subscribers_see_the_same_stream() {
        let bus = EventBus::new(16);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish_event(StatusEvent::initial());

        let got_a = a.recv().await.unwrap();
        let got_b = b.recv().await.unwrap();
        assert_eq!(got_a, got_b);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_affect_others() {
        let bus = EventBus::new(16);
        let dead = bus.subscribe();
        let mut live = bus.subscribe();
        drop(dead);

        bus.publish_event(StatusEvent::initial());
        assert!(live.recv().await.is_ok());
    }
}
