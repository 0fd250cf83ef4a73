//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentContext, ConversationHistory, Instructions, ToolChoice};
pub use crate::client::{
    ChatClient, ChatReply, ChatRequest, StreamDelta, StreamEventType, ToolCallRequest,
};
pub use crate::config::RunnerConfig;
pub use crate::enrich::PromptEnricher;
pub use crate::error::{Result, TachiError};
pub use crate::runner::{Runner, StreamingRun};
pub use crate::tools::{
    CallbackTool, NativeTool, RemoteToolDescriptor, RemoteToolProvider, ToolArguments,
    ToolOutcome, ToolParameters, ToolRegistry,
};
pub use crate::types::{AgentResponse, Message, Role};
