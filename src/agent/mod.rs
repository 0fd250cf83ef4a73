//! Agent personas, per-run context, and conversation history.

pub mod context;
pub mod definition;
pub mod history;

pub use context::AgentContext;
pub use definition::{Agent, Instructions, ToolChoice};
pub use history::{ConversationHistory, DEFAULT_HISTORY_LIMIT};
