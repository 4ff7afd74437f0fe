//! Interaction records - one entry per logged exchange.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sylva_rules::Subsystem;

use super::SubsystemTag;

/// Format of the `timestamp` field (ISO-8601, local time, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
/// Format of the `session_id` field: one session per calendar day.
pub const SESSION_FORMAT: &str = "%Y%m%d";
/// Format of the `interaction_id` field, down to milliseconds.
pub const INTERACTION_ID_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// A single exchange between the user and SYLVA. Never modified once written.
///
/// Every field is defaulted on read so records from older or damaged files
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub user_input: String,

    #[serde(default, rename = "sylva_response", alias = "response")]
    pub response: String,

    #[serde(default)]
    pub subsystem: SubsystemTag,

    #[serde(default)]
    pub session_id: String,

    #[serde(default)]
    pub interaction_id: String,
}

impl InteractionRecord {
    /// Create a record stamped with the given local time.
    pub fn new(
        user_input: impl Into<String>,
        response: impl Into<String>,
        subsystem: Subsystem,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            user_input: user_input.into(),
            response: response.into(),
            subsystem: subsystem.into(),
            session_id: at.format(SESSION_FORMAT).to_string(),
            interaction_id: at.format(INTERACTION_ID_FORMAT).to_string(),
        }
    }

    /// Parsed timestamp, if the stored value is a valid ISO-8601 local time.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        self.timestamp.parse::<NaiveDateTime>().ok()
    }

    /// Session key, falling back to `"unknown"` for records without one.
    pub fn session_key(&self) -> &str {
        if self.session_id.is_empty() {
            "unknown"
        } else {
            &self.session_id
        }
    }
}
