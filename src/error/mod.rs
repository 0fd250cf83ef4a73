//! Error types for Tachi.

use thiserror::Error;

/// Primary error type for all Tachi operations.
#[derive(Error, Debug)]
pub enum TachiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Chat client error: {0}")]
    Client(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool execution error: {tool_name} — {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl TachiError {
    /// Create a tool execution error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Whether the turn loop may continue past this error. Tool-level and
    /// argument failures are reported back to the model as tool output;
    /// everything else terminates the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ToolExecution { .. } | Self::InvalidArgument(_) | Self::UnsupportedOperation(_)
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TachiError>;
