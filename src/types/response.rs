//! Terminal run output.

use std::collections::HashMap;

use crate::agent::Agent;

use super::message::Message;

/// The result of a completed run: the full transcript, the agent that ended
/// the conversation, and the final context snapshot.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub messages: Vec<Message>,
    pub agent: Agent,
    pub context: HashMap<String, String>,
}

impl AgentResponse {
    /// Text of the final assistant message, if any.
    pub fn final_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::types::Role::Assistant)
            .map(|m| m.content.as_str())
    }
}
