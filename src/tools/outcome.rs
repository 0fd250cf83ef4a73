//! Tool execution outcomes.

use std::collections::HashMap;

use crate::agent::Agent;

/// The result of one tool execution.
///
/// `value` is always present -- tool failures are reported as text the model
/// can read, never raised past the registry. A set `handoff` replaces the
/// active agent for all subsequent turns; `context_updates` are merged into
/// the run context, last write wins.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub value: String,
    pub handoff: Option<Agent>,
    pub context_updates: HashMap<String, String>,
    pub is_error: bool,
}

impl ToolOutcome {
    /// A plain text result.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            handoff: None,
            context_updates: HashMap::new(),
            is_error: false,
        }
    }

    /// An error reported as tool output. The run continues; the model sees
    /// the failure text and may retry or apologize.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            value: message.into(),
            handoff: None,
            context_updates: HashMap::new(),
            is_error: true,
        }
    }

    /// A handoff to another agent, effective from the next turn.
    pub fn handoff(agent: Agent) -> Self {
        Self {
            value: format!("Handing off to {}.", agent.name()),
            handoff: Some(agent),
            context_updates: HashMap::new(),
            is_error: false,
        }
    }

    /// Attach a handoff target.
    pub fn with_handoff(mut self, agent: Agent) -> Self {
        self.handoff = Some(agent);
        self
    }

    /// Attach a single context update.
    pub fn with_context_update(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.context_updates.insert(key.into(), value.into());
        self
    }

    /// Attach a batch of context updates.
    pub fn with_context_updates(mut self, updates: HashMap<String, String>) -> Self {
        self.context_updates.extend(updates);
        self
    }
}
