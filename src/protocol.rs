//! Socket.IO/Engine.IO frame codec.
//!
//! The upstream multiplexes everything over text WebSocket messages with a
//! numeric prefix:
//!
//! - `0` + JSON — Engine.IO open, carries session metadata
//! - `2` / `3` — ping / pong keepalive
//! - `40` — Socket.IO namespace connect (sent by us) and connect-ack
//!   (received from upstream)
//! - `42` + JSON `[eventName, eventBody]` — application event
//!
//! [`Frame::parse`] never fails: anything that does not decode cleanly is
//! returned as [`Frame::Unknown`] for the session to log and drop.

use serde::Deserialize;
use serde_json::Value;

/// Session metadata carried by the Engine.IO open frame
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Engine.IO session id
    pub sid: String,
    /// Interval at which the upstream sends pings, in milliseconds
    #[serde(default)]
    pub ping_interval: Option<u64>,
    /// Grace period for our pong reply, in milliseconds
    ///
    /// Missing a pong within this window is a fatal connection error on the
    /// upstream side.
    #[serde(default)]
    pub ping_timeout: Option<u64>,
}

/// One decoded inbound frame
#[derive(Debug, Clone)]
pub enum Frame {
    /// Engine.IO open (`0`)
    Open(SessionInfo),
    /// Keepalive ping (`2`) — must be answered with a pong immediately
    Ping,
    /// Keepalive pong (`3`)
    Pong,
    /// Namespace connect acknowledged (`40`) — the channel is ready
    ConnectAck,
    /// Application event (`42`)
    Event {
        /// Event name, first element of the payload array
        name: String,
        /// Event body; an absent body decodes as an empty object
        body: Value,
    },
    /// Anything that did not decode cleanly; logged and dropped, never fatal
    Unknown(String),
}

impl Frame {
    /// Decode one inbound text message
    pub fn parse(text: &str) -> Frame {
        if let Some(payload) = text.strip_prefix("42") {
            return match serde_json::from_str::<Vec<Value>>(payload) {
                Ok(parts) if !parts.is_empty() => {
                    let name = match &parts[0] {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let body = parts
                        .get(1)
                        .cloned()
                        .unwrap_or_else(|| Value::Object(Default::default()));
                    Frame::Event { name, body }
                }
                _ => Frame::Unknown(text.to_string()),
            };
        }
        if text.starts_with("40") {
            return Frame::ConnectAck;
        }
        if text == "2" {
            return Frame::Ping;
        }
        if text == "3" {
            return Frame::Pong;
        }
        if let Some(payload) = text.strip_prefix('0') {
            return match serde_json::from_str::<SessionInfo>(payload) {
                Ok(info) => Frame::Open(info),
                Err(_) => Frame::Unknown(text.to_string()),
            };
        }
        Frame::Unknown(text.to_string())
    }
}

/// Wire text for the namespace connect we send after the open frame
pub const CONNECT: &str = "40";

/// Wire text for the pong reply to an upstream ping
pub const PONG: &str = "3";

/// Encode an outbound application event (`42` frame)
pub fn encode_event(name: &str, body: &Value) -> String {
    // serde_json cannot fail on Value input
    format!(
        "42{}",
        serde_json::to_string(&serde_json::json!([name, body])).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_open() {
        let frame =
            Frame::parse(r#"0{"sid":"abc123","pingInterval":25000,"pingTimeout":20000}"#);
        match frame {
            Frame::Open(info) => {
                assert_eq!(info.sid, "abc123");
                assert_eq!(info.ping_interval, Some(25_000));
                assert_eq!(info.ping_timeout, Some(20_000));
            }
            other => panic!("expected Open, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ping_pong() {
        assert!(matches!(Frame::parse("2"), Frame::Ping));
        assert!(matches!(Frame::parse("3"), Frame::Pong));
    }

    #[test]
    fn test_parse_connect_ack() {
        assert!(matches!(Frame::parse("40"), Frame::ConnectAck));
        assert!(matches!(Frame::parse(r#"40{"sid":"xyz"}"#), Frame::ConnectAck));
    }

    #[test]
    fn test_parse_event() {
        let frame = Frame::parse(r#"42["m",{"matches":{}}]"#);
        match frame {
            Frame::Event { name, body } => {
                assert_eq!(name, "m");
                assert_eq!(body, json!({"matches": {}}));
            }
            other => panic!("expected Event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_event_without_body() {
        let frame = Frame::parse(r#"42["hb"]"#);
        match frame {
            Frame::Event { name, body } => {
                assert_eq!(name, "hb");
                assert_eq!(body, json!({}));
            }
            other => panic!("expected Event, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_frames_are_unknown() {
        assert!(matches!(Frame::parse("42not-json"), Frame::Unknown(_)));
        assert!(matches!(Frame::parse("0not-json"), Frame::Unknown(_)));
        assert!(matches!(Frame::parse("999"), Frame::Unknown(_)));
        assert!(matches!(Frame::parse(""), Frame::Unknown(_)));
    }

    #[test]
    fn test_encode_event() {
        let encoded = encode_event("m", &json!({"route": "sport:1", "requestId": "r1"}));
        assert!(encoded.starts_with("42"));
        let round_trip = Frame::parse(&encoded);
        match round_trip {
            Frame::Event { name, body } => {
                assert_eq!(name, "m");
                assert_eq!(body["route"], "sport:1");
                assert_eq!(body["requestId"], "r1");
            }
            other => panic!("expected Event, got {:?}", other),
        }
    }
}
