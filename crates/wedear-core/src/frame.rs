//! Inbound wire frames.
//!
//! A physical transport message carries one or more frames separated by
//! `\n`. Each frame is a JSON object:
//!
//! ```json
//! {"type": "chat", "action": "created", "payload": {"id": "m1", "content": "hi"}}
//! ```
//!
//! Decoding happens in two steps: the envelope is read first, then the
//! payload is decoded into the shape selected by `type`. Unknown `type`
//! strings are kept as [`FramePayload::Other`] with the raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FrameDecodeError;
use crate::payload::{AiSuggestionPayload, ChatPayload, PhysiologicalPayload};

/// Frame category, keyed by the wire `type` field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Chat message notifications.
    Chat,
    /// AI suggestion notifications.
    AiSuggestion,
    /// Physiological data notifications.
    Physiological,
    /// Any other `type` string.
    Other(String),
}

impl FrameKind {
    /// The three kinds the server currently emits.
    pub const KNOWN: [Self; 3] = [Self::Chat, Self::AiSuggestion, Self::Physiological];

    /// Wire string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => "chat",
            Self::AiSuggestion => "ai_suggestion",
            Self::Physiological => "physiological",
            Self::Other(kind) => kind,
        }
    }

    /// Map a wire string to a kind.
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "chat" => Self::Chat,
            "ai_suggestion" => Self::AiSuggestion,
            "physiological" => Self::Physiological,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle tag of the entity a frame describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameAction {
    /// Entity was created.
    Created,
    /// Entity was updated.
    Updated,
    /// Entity was deleted.
    Deleted,
    /// Unrecognized action string.
    #[serde(other)]
    Unknown,
}

impl FrameAction {
    /// Wire string for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Unknown => "unknown",
        }
    }
}

/// Payload of a frame, selected by its kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FramePayload {
    /// A chat message.
    Chat(ChatPayload),
    /// An AI suggestion.
    AiSuggestion(AiSuggestionPayload),
    /// A physiological measurement.
    Physiological(PhysiologicalPayload),
    /// Payload of an unknown kind, kept as raw JSON.
    Other {
        /// Wire `type` string.
        kind: String,
        /// Raw payload.
        payload: Value,
    },
}

impl FramePayload {
    /// Kind of this payload.
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Chat(_) => FrameKind::Chat,
            Self::AiSuggestion(_) => FrameKind::AiSuggestion,
            Self::Physiological(_) => FrameKind::Physiological,
            Self::Other { kind, .. } => FrameKind::Other(kind.clone()),
        }
    }

    /// Serialize the payload back to JSON.
    pub fn to_json(&self) -> Value {
        let encoded = match self {
            Self::Chat(p) => serde_json::to_value(p),
            Self::AiSuggestion(p) => serde_json::to_value(p),
            Self::Physiological(p) => serde_json::to_value(p),
            Self::Other { payload, .. } => return payload.clone(),
        };
        encoded.unwrap_or(Value::Null)
    }
}

/// One decoded frame.
#[derive(Clone, Debug, PartialEq)]
pub struct InboundFrame {
    /// Lifecycle tag.
    pub action: FrameAction,
    /// Kind-specific payload.
    pub payload: FramePayload,
}

/// Envelope as it appears on the wire.
#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    action: FrameAction,
    #[serde(default)]
    payload: Value,
}

impl InboundFrame {
    /// Kind of this frame.
    pub fn kind(&self) -> FrameKind {
        self.payload.kind()
    }

    /// Decode a single frame from one line of text.
    pub fn decode(line: &str) -> Result<Self, FrameDecodeError> {
        let raw: RawFrame = serde_json::from_str(line).map_err(FrameDecodeError::Envelope)?;
        let payload = match FrameKind::from_wire(&raw.kind) {
            FrameKind::Chat => FramePayload::Chat(typed(&raw.kind, raw.payload)?),
            FrameKind::AiSuggestion => FramePayload::AiSuggestion(typed(&raw.kind, raw.payload)?),
            FrameKind::Physiological => {
                FramePayload::Physiological(typed(&raw.kind, raw.payload)?)
            }
            FrameKind::Other(kind) => FramePayload::Other {
                kind,
                payload: raw.payload,
            },
        };
        Ok(Self {
            action: raw.action,
            payload,
        })
    }

    /// Encode back to the wire envelope.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "type": self.kind().as_str(),
            "action": self.action.as_str(),
            "payload": self.payload.to_json(),
        })
    }
}

fn typed<T: serde::de::DeserializeOwned>(kind: &str, payload: Value) -> Result<T, FrameDecodeError> {
    serde_json::from_value(payload).map_err(|source| FrameDecodeError::Payload {
        kind: kind.to_owned(),
        source,
    })
}

/// Split a physical transport message into frame lines.
///
/// Lines are separated by `\n`; a trailing `\r` is stripped and blank lines
/// are skipped. Order is preserved.
pub fn split_batch(message: &str) -> impl Iterator<Item = &str> {
    message
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}
