//! JSON codec for `jsonData` payloads, relay tombstones and tag arrays.

use crate::error::SyncResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Payload published in place of a deleted record.
pub const TOMBSTONE: &str = r#"{"deleted":true}"#;

/// Encodes and decodes the JSON stored locally and carried by the relay.
///
/// Decoding is lenient: the model types ignore unknown keys and default
/// missing ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn encode<T: Serialize>(&self, value: &T) -> SyncResult<String> {
        Ok(serde_json::to_string(value)?)
    }

    pub fn decode<T: DeserializeOwned>(&self, json: &str) -> SyncResult<T> {
        Ok(serde_json::from_str(json)?)
    }

    /// True for a `{"deleted": true}` object.
    pub fn is_tombstone(&self, json: &str) -> bool {
        serde_json::from_str::<Value>(json)
            .ok()
            .and_then(|value| value.get("deleted").and_then(Value::as_bool))
            .unwrap_or(false)
    }

    pub fn encode_tags(&self, tags: &[Vec<String>]) -> SyncResult<String> {
        Ok(serde_json::to_string(tags)?)
    }

    /// Parses a stored tag array. Malformed input yields no tags.
    pub fn decode_tags(&self, json: &str) -> Vec<Vec<String>> {
        serde_json::from_str(json).unwrap_or_default()
    }
}
