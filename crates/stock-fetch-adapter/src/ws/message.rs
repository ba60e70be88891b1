/*
[INPUT]:  Raw progress-channel text frames
[OUTPUT]: Parsed ProgressMessage values and transport-level ChannelEvents
[POS]:    WebSocket layer - message parsing and validation
[UPDATE]: When adding new message types or changing format
*/

use serde::{Deserialize, Serialize};

/// Record pushed by the service on `/ws/progress/{task_id}`
///
/// The `type` field selects the variant. Unknown types decode to `Other` so
/// newer servers do not break older clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressMessage {
    /// One formatted log line from the background worker
    Log { text: String },
    /// Number of processed items out of the total
    Status { progress: i64, total: i64 },
    /// Task finished successfully
    Complete {},
    /// Task failed, with an optional explanation
    Error {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl ProgressMessage {
    /// Decode a text frame. Returns `None` when the frame is not valid JSON or a
    /// known type carries a malformed payload.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Tag of the message as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressMessage::Log { .. } => "log",
            ProgressMessage::Status { .. } => "status",
            ProgressMessage::Complete {} => "complete",
            ProgressMessage::Error { .. } => "error",
            ProgressMessage::Other => "other",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressMessage::Complete {} | ProgressMessage::Error { .. })
    }
}

/// Everything a progress channel can report to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A decoded inbound message
    Message(ProgressMessage),
    /// Transport failure (handshake or read error)
    Error(String),
    /// The connection is closed, gracefully or not
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"type":"log","text":"12:00:01 | fetching 600519.SH"}"#,
        Some(ProgressMessage::Log { text: "12:00:01 | fetching 600519.SH".to_string() }))]
    #[case(r#"{"type":"status","progress":3,"total":10}"#,
        Some(ProgressMessage::Status { progress: 3, total: 10 }))]
    #[case(r#"{"type":"complete","text":"done"}"#, Some(ProgressMessage::Complete {}))]
    #[case(r#"{"type":"complete"}"#, Some(ProgressMessage::Complete {}))]
    #[case(r#"{"type":"error","text":"rate limited"}"#,
        Some(ProgressMessage::Error { text: Some("rate limited".to_string()) }))]
    #[case(r#"{"type":"error","text":null}"#, Some(ProgressMessage::Error { text: None }))]
    #[case(r#"{"type":"error"}"#, Some(ProgressMessage::Error { text: None }))]
    #[case(r#"{"type":"heartbeat","seq":7}"#, Some(ProgressMessage::Other))]
    #[case(r#"{"type":"status","progress":"three","total":10}"#, None)]
    #[case(r#"{"type":"log"}"#, None)]
    #[case(r#"{"text":"no tag"}"#, None)]
    #[case("not json", None)]
    fn test_decode(#[case] raw: &str, #[case] expected: Option<ProgressMessage>) {
        assert_eq!(ProgressMessage::decode(raw), expected);
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(ProgressMessage::Complete {}.is_terminal());
        assert!(ProgressMessage::Error { text: None }.is_terminal());
        assert!(!ProgressMessage::Other.is_terminal());
        assert_eq!(ProgressMessage::Status { progress: 1, total: 2 }.kind(), "status");
    }
}
