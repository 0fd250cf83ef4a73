//! Per-run shared key/value context.

use std::collections::HashMap;

/// Mutable string-keyed store scoped to one run, visible to every tool
/// invocation in that run. Owned by exactly one run -- never shared across
/// concurrent runs -- so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    values: HashMap<String, String>,
}

impl AgentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from caller-provided variables.
    pub fn seeded(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Merge updates into the context, last write wins.
    pub fn merge(&mut self, updates: HashMap<String, String>) {
        self.values.extend(updates);
    }

    /// Clone the current state, e.g. for instruction resolution or a tool
    /// invocation's read view.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.clone()
    }

    /// Consume into the underlying map at run end.
    pub fn into_values(self) -> HashMap<String, String> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
