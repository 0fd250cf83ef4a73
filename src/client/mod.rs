//! Chat-model collaborator interface.
//!
//! The runtime never talks to a model API directly; it hands a
//! [`ChatRequest`] to a [`ChatClient`] implementation and interprets the
//! reply. How the request crosses the network is the implementation's
//! business.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::agent::ToolChoice;
use crate::error::{Result, TachiError};
use crate::tools::ToolDefinition;
use crate::types::Message;

/// A request for one model turn.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    /// Resolved and enriched system prompt for this turn.
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// JSON-encoded argument object, exactly as the model produced it.
    pub arguments: String,
}

/// Response from the collaborator for one turn.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    pub text: String,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatReply {
    /// A plain text reply with no tool calls.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply requesting the given tool calls.
    pub fn tool_calls(text: impl Into<String>, calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: text.into(),
            tool_calls: calls,
        }
    }
}

/// A delta emitted during streaming.
#[derive(Debug, Clone)]
pub struct StreamDelta {
    pub text: String,
    pub event: StreamEventType,
    /// A completed tool call (event `ToolCall` only).
    pub tool_call: Option<ToolCallRequest>,
}

impl StreamDelta {
    pub fn text_delta(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            event: StreamEventType::TextDelta,
            tool_call: None,
        }
    }

    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self {
            text: String::new(),
            event: StreamEventType::ToolCall,
            tool_call: Some(call),
        }
    }

    pub fn done() -> Self {
        Self {
            text: String::new(),
            event: StreamEventType::Done,
            tool_call: None,
        }
    }
}

/// Type of stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEventType {
    /// Incremental text content.
    TextDelta,
    /// A fully assembled tool call. Tool-call payloads are never streamed
    /// incrementally.
    ToolCall,
    /// Stream finished.
    Done,
}

/// Core collaborator trait: one round-trip to a language model.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Complete one turn, returning text and any tool-call requests.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Streaming variant. The default rejects streaming, which makes the
    /// runner fall back to a single [`complete`](Self::complete) call for
    /// the turn.
    async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta>>> {
        let _ = request;
        Err(TachiError::UnsupportedOperation(
            "streaming not supported by this chat client".into(),
        ))
    }
}
