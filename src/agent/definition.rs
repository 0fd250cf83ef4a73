//! Agent persona definitions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Instruction template for an agent: a literal string, or a function of the
/// run context resolved once per turn. Resolution is pure.
#[derive(Clone)]
pub enum Instructions {
    Static(String),
    Derived(Arc<dyn Fn(&HashMap<String, String>) -> String + Send + Sync>),
}

impl Instructions {
    /// Create derived instructions from a closure over the context snapshot.
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> String + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    /// Resolve against a context snapshot.
    pub fn resolve(&self, context: &HashMap<String, String>) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Derived(f) => f(context),
        }
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl From<&str> for Instructions {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for Instructions {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

/// How the model may use tools for an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Display, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolChoice {
    /// The model decides whether to call tools.
    #[default]
    Auto,
    /// The model must call at least one tool.
    Required,
    /// Tool calls are disabled for this agent.
    None,
    /// The model must call the named tool.
    Named(String),
}

/// An immutable agent persona: display name, model identifier, instruction
/// template, allowed tool names, and tool-choice policy.
///
/// Agents are cheap-to-clone values; tools construct them as handoff targets.
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    model: String,
    instructions: Instructions,
    tool_names: Vec<String>,
    tool_choice: ToolChoice,
}

impl Agent {
    /// Create an agent with empty instructions and no tool restrictions.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            instructions: Instructions::Static(String::new()),
            tool_names: Vec::new(),
            tool_choice: ToolChoice::Auto,
        }
    }

    /// Set instructions (literal or derived).
    pub fn with_instructions(mut self, instructions: impl Into<Instructions>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set instructions derived from the run context.
    pub fn with_derived_instructions<F>(mut self, f: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> String + Send + Sync + 'static,
    {
        self.instructions = Instructions::derived(f);
        self
    }

    /// Restrict the agent to the named tools. An empty list means the full
    /// registry is available.
    pub fn with_tools(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tool_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tool-choice policy.
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tool_names(&self) -> &[String] {
        &self.tool_names
    }

    pub fn tool_choice(&self) -> &ToolChoice {
        &self.tool_choice
    }

    /// Resolve this agent's instructions against a context snapshot.
    pub fn resolve_instructions(&self, context: &HashMap<String, String>) -> String {
        self.instructions.resolve(context)
    }
}
