use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::error::SyncError;

/// Timestamp layout the backend stamps on stored messages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One message as the backend lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub sender: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl MessageRecord {
    pub fn sent_at(&self) -> Option<NaiveDateTime> {
        self.timestamp
            .as_deref()
            .and_then(|ts| NaiveDateTime::parse_from_str(ts.trim(), TIMESTAMP_FORMAT).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// A decoded listing: the valid records in backend order plus how many
/// entries were thrown away.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Retrieved {
    pub messages: Vec<MessageRecord>,
    pub dropped: usize,
}

/// Decodes a `/messages` body. The body must be a JSON array; entries that do
/// not fit [`MessageRecord`] are skipped rather than failing the whole list.
pub fn decode_listing(body: &str) -> Result<Retrieved, SyncError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(entries) = value else {
        return Err(SyncError::Decode(format!("expected a JSON array, got {}", json_type(&value))));
    };

    let mut retrieved = Retrieved { messages: Vec::with_capacity(entries.len()), dropped: 0 };
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<MessageRecord>(entry) {
            Ok(record) => retrieved.messages.push(record),
            Err(e) => {
                warn!(index, error = %e, "dropping malformed message entry");
                retrieved.dropped += 1;
            }
        }
    }
    Ok(retrieved)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
