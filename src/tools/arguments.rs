//! Typed access to tool call arguments.

use crate::error::TachiError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Create an empty argument map.
    pub fn empty() -> Self {
        Self {
            value: serde_json::json!({}),
        }
    }

    /// Parse from the JSON-encoded string the model sent. Malformed JSON
    /// degrades to an empty argument map with a warning -- a slightly broken
    /// tool call must not abort the turn.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::empty();
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value) if value.is_object() => Self { value },
            Ok(other) => {
                tracing::warn!(value = %other, "tool arguments are not a JSON object, ignoring");
                Self::empty()
            }
            Err(err) => {
                tracing::warn!(error = %err, "malformed tool arguments, using empty map");
                Self::empty()
            }
        }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, TachiError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| TachiError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, TachiError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| TachiError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool, TachiError> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| TachiError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, TachiError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            TachiError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
