//! Typed payload shapes carried by inbound frames.
//!
//! The server pushes three kinds of notifications:
//!
//! - [`ChatPayload`]: a new chat message between a doctor and a patient
//! - [`AiSuggestionPayload`]: an AI-generated suggestion for the doctor
//! - [`PhysiologicalPayload`]: a new physiological measurement for a patient
//!
//! Every field except `id` tolerates absence so that partially populated
//! notifications still decode. Unknown enum values map to an `Unknown`
//! variant rather than failing the frame.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Content kind of a chat message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text.
    #[default]
    Text,
    /// Image attachment.
    Image,
    /// Voice recording.
    Voice,
    /// Generic file.
    File,
    /// Any kind this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    /// The treating doctor.
    Doctor,
    /// The patient.
    Patient,
    /// System-generated message.
    System,
    /// Unrecognized role string.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A chat message notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    /// Message ID.
    pub id: String,
    /// Message body (text, or a URL for media kinds).
    #[serde(default)]
    pub content: String,
    /// Content kind.
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// Author role.
    #[serde(default)]
    pub role: SenderRole,
    /// Patient side of the conversation.
    #[serde(default)]
    pub patient_id: String,
    /// Doctor side of the conversation.
    #[serde(default)]
    pub doctor_id: String,
    /// Server creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// AI suggestion
// ─────────────────────────────────────────────────────────────────────────────

/// Category of an AI suggestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    /// Medication advice.
    Medication,
    /// Advice to visit a clinic.
    Visit,
    /// Lifestyle advice.
    Lifestyle,
    /// Needs immediate attention.
    Urgent,
    /// Unrecognized category.
    #[default]
    #[serde(other)]
    Unknown,
}

/// An AI suggestion notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestionPayload {
    /// Suggestion ID.
    pub id: String,
    /// Patient message that prompted the suggestion.
    #[serde(default)]
    pub message_id: String,
    /// Suggestion text.
    #[serde(default)]
    pub content: String,
    /// Suggestion category.
    #[serde(default)]
    pub category: SuggestionCategory,
    /// Priority from 1 (low) to 5 (critical); 0 when absent.
    #[serde(default)]
    pub priority: u8,
    /// Server creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AiSuggestionPayload {
    /// Whether the suggestion is urgent by category or priority (4 and up).
    pub fn is_urgent(&self) -> bool {
        self.category == SuggestionCategory::Urgent || self.priority >= 4
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Physiological data
// ─────────────────────────────────────────────────────────────────────────────

/// A physiological measurement notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysiologicalPayload {
    /// Record ID.
    pub id: String,
    /// Patient the measurement belongs to.
    #[serde(default)]
    pub patient_id: String,
    /// Measurement type, e.g. `blood_pressure` or `blood_sugar`.
    #[serde(rename = "type", default)]
    pub measurement: String,
    /// Measured value as reported, e.g. `"120/80"`.
    #[serde(default)]
    pub value: String,
    /// When the measurement was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_at: Option<DateTime<Utc>>,
    /// Where the value came from, e.g. `ai_extract` or `manual`.
    #[serde(default)]
    pub source: String,
    /// Server creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
