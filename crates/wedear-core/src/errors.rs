//! Frame decoding errors.

use thiserror::Error;

/// Errors produced while decoding a single inbound frame.
///
/// A decode error never affects sibling frames in the same batch; callers log
/// it together with the raw line and move on.
#[derive(Debug, Error)]
pub enum FrameDecodeError {
    /// The line was not a JSON object with `type`, `action`, and `payload`.
    #[error("malformed frame: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope parsed but the payload did not match its kind's shape.
    #[error("invalid {kind} payload: {source}")]
    Payload {
        /// Wire `type` of the frame.
        kind: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl FrameDecodeError {
    /// Wire `type` of the offending frame, when the envelope was readable.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Envelope(_) => None,
            Self::Payload { kind, .. } => Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{bad").unwrap_err()
    }

    #[test]
    fn envelope_error_display() {
        let err = FrameDecodeError::Envelope(json_error());
        assert!(err.to_string().starts_with("malformed frame:"));
        assert!(err.kind().is_none());
    }

    #[test]
    fn payload_error_carries_kind() {
        let err = FrameDecodeError::Payload {
            kind: "chat".into(),
            source: json_error(),
        };
        assert!(err.to_string().starts_with("invalid chat payload:"));
        assert_eq!(err.kind(), Some("chat"));
    }
}
