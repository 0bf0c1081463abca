//! Wire messages of the live push channel.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": {...}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// Kinds of data update the channel re-publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateKind {
    MatchUpdate,
    OddsUpdate,
    LiveEvent,
}

impl UpdateKind {
    fn from_event(event: &str) -> Option<Self> {
        match event {
            "matchUpdate" => Some(UpdateKind::MatchUpdate),
            "oddsUpdate" => Some(UpdateKind::OddsUpdate),
            "liveEvent" => Some(UpdateKind::LiveEvent),
            _ => None,
        }
    }
}

/// A data update as published to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataUpdated {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Decoded incoming frame
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    Update { kind: UpdateKind, data: Value },
    Unknown(String),
}

impl PushMessage {
    /// Decodes one text frame. Frames that are not JSON or lack an event
    /// name are reported as `None`; unrecognised events as `Unknown`.
    pub fn parse(text: &str) -> Option<Self> {
        let frame: RawFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Ignoring undecodable push frame: {}", e);
                return None;
            }
        };

        Some(match UpdateKind::from_event(&frame.event) {
            Some(kind) => PushMessage::Update {
                kind,
                data: frame.data,
            },
            None => PushMessage::Unknown(frame.event),
        })
    }
}

/// Interest in live updates for one match
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub match_id: String,
    pub channel: String,
}

impl Subscription {
    pub fn new(match_id: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            match_id: match_id.into(),
            channel: channel.into(),
        }
    }

    /// The outgoing `subscribe` frame for this subscription
    pub fn to_frame(&self) -> String {
        json!({
            "event": "subscribe",
            "data": {"matchId": self.match_id, "channel": self.channel}
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_events() {
        let msg = PushMessage::parse(r#"{"event":"oddsUpdate","data":{"matchId":"m1","home":1.8}}"#);
        assert_eq!(
            msg,
            Some(PushMessage::Update {
                kind: UpdateKind::OddsUpdate,
                data: json!({"matchId": "m1", "home": 1.8}),
            })
        );
    }

    #[test]
    fn test_parse_unknown_and_garbage() {
        assert_eq!(
            PushMessage::parse(r#"{"event":"heartbeat"}"#),
            Some(PushMessage::Unknown("heartbeat".to_string()))
        );
        assert_eq!(PushMessage::parse("not json"), None);
        assert_eq!(PushMessage::parse(r#"{"data":{}}"#), None);
    }

    #[test]
    fn test_data_updated_serializes_type_field() {
        let update = DataUpdated {
            kind: UpdateKind::LiveEvent,
            data: json!({"minute": 12}),
            timestamp: "2024-08-17T14:12:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "liveEvent");
        assert_eq!(value["data"]["minute"], 12);
    }

    #[test]
    fn test_subscribe_frame() {
        let frame: Value = serde_json::from_str(&Subscription::new("m1", "match").to_frame()).unwrap();
        assert_eq!(
            frame,
            json!({"event": "subscribe", "data": {"matchId": "m1", "channel": "match"}})
        );
    }
}
