//! Hub wire protocol
//!
//! JSON hub protocol: every message is a JSON object terminated by the record
//! separator `0x1E`, and one transport frame may carry several messages.

use super::error::HubError;
use crate::consts::dashboard_consts::hub::{RECEIVE_TARGET, RECORD_SEPARATOR};
use crate::indicator::{IndicatorId, display_string};
use serde::Deserialize;
use serde_json::Value;

/// Sent right after the transport opens.
pub const HANDSHAKE_REQUEST: &str = "{\"protocol\":\"json\",\"version\":1}\u{1e}";

/// Keep-alive message sent by the client.
pub const PING_MESSAGE: &str = "{\"type\":6}\u{1e}";

const INVOCATION: u8 = 1;
const PING: u8 = 6;
const CLOSE: u8 = 7;

/// A decoded hub message.
#[derive(Debug, Clone, PartialEq)]
pub enum HubMessage {
    /// Server invoked a client method.
    Invocation { target: String, arguments: Vec<Value> },
    Ping,
    /// Server is closing the connection.
    Close { error: Option<String> },
    /// Message types the dashboard has no use for (streams, completions).
    Other(u8),
    /// A record that could not be decoded, with the reason.
    Malformed(String),
}

impl HubMessage {
    /// Extracts the (identifier, value) pair of a `receive` invocation.
    ///
    /// Returns `Ok(None)` for messages that do not target `receive`.
    pub fn into_value_update(self) -> Result<Option<(IndicatorId, String)>, HubError> {
        let HubMessage::Invocation { target, arguments } = self else {
            return Ok(None);
        };
        if !target.eq_ignore_ascii_case(RECEIVE_TARGET) {
            return Ok(None);
        }
        let mut arguments = arguments.into_iter();
        match (arguments.next(), arguments.next()) {
            (Some(id), Some(value)) => {
                let id = display_string(id).map_err(HubError::Protocol)?;
                let value = display_string(value).map_err(HubError::Protocol)?;
                Ok(Some((IndicatorId::new(id), value)))
            }
            _ => Err(HubError::Protocol(format!(
                "`{}` expects two arguments",
                RECEIVE_TARGET
            ))),
        }
    }
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    arguments: Vec<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct HandshakeResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Splits a frame into its complete records.
///
/// A frame that does not end with the record separator is rejected, since the
/// transport delivers whole messages.
pub fn split_records(frame: &str) -> Result<Vec<&str>, HubError> {
    if frame.is_empty() {
        return Ok(Vec::new());
    }
    let Some(body) = frame.strip_suffix(RECORD_SEPARATOR) else {
        return Err(HubError::Protocol("incomplete record in frame".to_string()));
    };
    Ok(body.split(RECORD_SEPARATOR).collect())
}

/// Decodes every message of a frame.
///
/// Records are decoded one by one; an undecodable record becomes
/// [`HubMessage::Malformed`] and the others are kept. Only a frame without a
/// trailing separator is an error.
pub fn parse_messages(frame: &str) -> Result<Vec<HubMessage>, HubError> {
    Ok(split_records(frame)?.into_iter().map(parse_record).collect())
}

fn parse_record(record: &str) -> HubMessage {
    let raw: RawMessage = match serde_json::from_str(record) {
        Ok(raw) => raw,
        Err(e) => return HubMessage::Malformed(e.to_string()),
    };
    match raw.kind {
        INVOCATION => HubMessage::Invocation {
            target: raw.target.unwrap_or_default(),
            arguments: raw.arguments,
        },
        PING => HubMessage::Ping,
        CLOSE => HubMessage::Close { error: raw.error },
        other => HubMessage::Other(other),
    }
}

/// Validates the server's handshake answer.
///
/// Returns the messages that followed the handshake in the same frame.
pub fn parse_handshake(frame: &str) -> Result<Vec<HubMessage>, HubError> {
    let records = split_records(frame)?;
    let Some((first, rest)) = records.split_first() else {
        return Err(HubError::Handshake("empty handshake response".to_string()));
    };
    let response: HandshakeResponse = serde_json::from_str(first)?;
    if let Some(error) = response.error {
        return Err(HubError::Handshake(error));
    }
    Ok(rest.iter().map(|record| parse_record(record)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_with_several_records() {
        let frame = "{\"type\":6}\u{1e}{\"type\":1,\"target\":\"receive\",\"arguments\":[\"3\",\"4,2\"]}\u{1e}";
        let messages = parse_messages(frame).unwrap();
        assert_eq!(
            messages,
            vec![
                HubMessage::Ping,
                HubMessage::Invocation {
                    target: "receive".to_string(),
                    arguments: vec![json!("3"), json!("4,2")],
                },
            ]
        );
    }

    #[test]
    fn test_bad_record_does_not_spoil_the_frame() {
        let frame = "{\"type\":1,\"target\":\"receive\",\"arguments\":[\"1\",\"3,7\"]}\u{1e}{\"type\":7,\"error\":{\"code\":1}}\u{1e}";
        let messages = parse_messages(frame).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0].clone().into_value_update().unwrap(),
            Some((IndicatorId::from("1"), "3,7".to_string()))
        );
        assert!(matches!(messages[1], HubMessage::Malformed(_)));
    }

    #[test]
    fn test_partial_record_is_rejected() {
        assert!(matches!(
            parse_messages("{\"type\":6}"),
            Err(HubError::Protocol(_))
        ));
    }

    #[test]
    fn test_receive_invocation_yields_update() {
        let message = HubMessage::Invocation {
            target: "receive".to_string(),
            arguments: vec![json!(12), json!("7,5")],
        };
        assert_eq!(
            message.into_value_update().unwrap(),
            Some((IndicatorId::from("12"), "7,5".to_string()))
        );

        let other = HubMessage::Invocation {
            target: "notify".to_string(),
            arguments: vec![],
        };
        assert_eq!(other.into_value_update().unwrap(), None);

        let short = HubMessage::Invocation {
            target: "receive".to_string(),
            arguments: vec![json!("1")],
        };
        assert!(short.into_value_update().is_err());
    }

    #[test]
    fn test_close_message_carries_error() {
        let messages = parse_messages("{\"type\":7,\"error\":\"server shutdown\"}\u{1e}").unwrap();
        assert_eq!(
            messages,
            vec![HubMessage::Close {
                error: Some("server shutdown".to_string())
            }]
        );
    }

    #[test]
    fn test_handshake() {
        assert_eq!(parse_handshake("{}\u{1e}").unwrap(), vec![]);
        assert_eq!(
            parse_handshake("{}\u{1e}{\"type\":6}\u{1e}").unwrap(),
            vec![HubMessage::Ping]
        );
        assert!(matches!(
            parse_handshake("{\"error\":\"Requested protocol 'json' is not available.\"}\u{1e}"),
            Err(HubError::Handshake(_))
        ));
    }
}
