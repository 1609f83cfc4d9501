//! Message codec: protocol messages to and from JSON text.
//!
//! The codec is transport-agnostic. Framing (how encoded text is delimited on
//! a byte stream) lives in [`super::framing`].
//!
//! Encoding always restamps `currentDate`/`currentTime` with the moment of
//! encoding; timestamps on inbound messages are never carried forward. Every
//! other field is written back exactly as decoded.

use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::Timestamp;

use super::message::ProtocolMessage;

/// Why a text frame could not become a [`ProtocolMessage`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Message is not a JSON object")]
    NotAnObject,

    #[error("Message has no command field")]
    MissingCommand,
}

/// Encode a message stamped with the current time.
pub fn encode(message: &ProtocolMessage) -> String {
    encode_at(message, Timestamp::now())
}

/// Encode a message stamped with `at`.
pub fn encode_at(message: &ProtocolMessage, at: Timestamp) -> String {
    let stamped = message.stamped(at);
    serde_json::to_string(stamped.fields()).expect("JSON object serialization should not fail")
}

/// Decode one message from JSON text.
///
/// Only non-JSON text, non-object JSON and an absent or `null` `command`
/// are rejected. Field types are not checked here.
pub fn decode(text: &str) -> Result<ProtocolMessage, DecodeError> {
    let Value::Object(fields) = serde_json::from_str::<Value>(text)? else {
        return Err(DecodeError::NotAnObject);
    };
    if matches!(fields.get("command"), None | Some(Value::Null)) {
        return Err(DecodeError::MissingCommand);
    }
    Ok(ProtocolMessage::from_fields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lighting::DeviceId;
    use crate::domain::protocol::ProtocolProfile;
    use chrono::{TimeZone, Utc};

    fn at() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap())
    }

    #[test]
    fn encode_emits_fields_in_schema_order() {
        let msg = ProtocolProfile::default().lamp_ack(DeviceId::Bulb1, true);
        let text = encode_at(&msg, at());

        assert_eq!(
            text,
            r#"{"protocol":"ILCMS","firmwareVersion":"wmv2","header":"0x01","gatewayMac":"800000fff0000001","command":"0xC003","nodeMac":"bulb1","actionValue":"1","currentValue":"1","currentDate":"2024-12-31","currentTime":"23:59:58","footer":"0xA3"}"#
        );
    }

    #[test]
    fn encode_replaces_inbound_timestamp_in_place() {
        let msg = decode(
            r#"{"command":"0xF001","currentDate":"1999-01-01","currentTime":"00:00:00","nodeMac":"bulb1"}"#,
        )
        .unwrap();

        assert_eq!(
            encode_at(&msg, at()),
            r#"{"command":"0xF001","currentDate":"2024-12-31","currentTime":"23:59:58","nodeMac":"bulb1"}"#
        );
    }

    #[test]
    fn relay_adds_only_the_timestamp() {
        let msg = decode(r#"{"command":"0xC002","actionValue":"1"}"#).unwrap();

        assert_eq!(
            encode_at(&msg, at()),
            r#"{"command":"0xC002","actionValue":"1","currentDate":"2024-12-31","currentTime":"23:59:58"}"#
        );
    }

    #[test]
    fn missing_schema_fields_read_as_empty() {
        let msg = decode(r#"{"command":"0xC002","actionValue":"1"}"#).unwrap();

        assert_eq!(msg.command(), "0xC002");
        assert_eq!(msg.action_value(), "1");
        assert_eq!(msg.node_mac(), "");
        assert_eq!(msg.get("nodeMac"), None);
    }

    #[test]
    fn decode_keeps_unknown_fields_for_relay() {
        let msg = decode(r#"{"command":"0xC005","circuit":"A","level":3}"#).unwrap();

        assert_eq!(msg.get("circuit"), Some(&Value::from("A")));
        assert_eq!(msg.get("level"), Some(&Value::from(3)));

        let relayed: Value = serde_json::from_str(&encode(&msg)).unwrap();
        assert_eq!(relayed["circuit"], "A");
        assert_eq!(relayed["level"], 3);
        assert_eq!(relayed["command"], "0xC005");
    }

    #[test]
    fn wrongly_typed_fields_decode_and_read_as_off() {
        let msg = decode(r#"{"command":"0xF001","nodeMac":"bulb1","actionValue":1}"#).unwrap();

        assert_eq!(msg.action_value(), "");
        assert!(!msg.action_state().is_on());
        assert_eq!(msg.get("actionValue"), Some(&Value::from(1)));

        let relayed: Value = serde_json::from_str(&encode(&msg)).unwrap();
        assert_eq!(relayed["actionValue"], 1);
    }

    #[test]
    fn numeric_command_decodes_but_reads_as_empty_opcode() {
        let msg = decode(r#"{"command":61441,"nodeMac":"bulb1"}"#).unwrap();
        assert_eq!(msg.command(), "");
        assert_eq!(msg.get("command"), Some(&Value::from(61441)));
    }

    #[test]
    fn decode_rejects_text_that_is_not_json() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(r#"{"command":"0xF001""#), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_non_object_json() {
        assert!(matches!(decode("[1,2,3]"), Err(DecodeError::NotAnObject)));
        assert!(matches!(decode(r#""0xF001""#), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn decode_rejects_missing_or_null_command() {
        assert!(matches!(
            decode(r#"{"nodeMac":"bulb1"}"#),
            Err(DecodeError::MissingCommand)
        ));
        assert!(matches!(
            decode(r#"{"command":null}"#),
            Err(DecodeError::MissingCommand)
        ));
    }
}
