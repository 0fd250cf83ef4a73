//! Tools surfaced by a remote tool-protocol server.
//!
//! Connection lifecycle, transport, and reconnection are entirely the
//! provider's concern; the registry only sees descriptors bound to an
//! `invoke` capability.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::ToolDefinition;
use crate::error::TachiError;

/// A tool discovered from a remote server.
#[derive(Debug, Clone)]
pub struct RemoteToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's arguments, as reported by the server.
    pub schema: serde_json::Value,
}

/// Trait for collaborators that surface remotely discovered tools.
#[async_trait]
pub trait RemoteToolProvider: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<RemoteToolDescriptor>, TachiError>;

    /// Invoke a tool by name, returning its text output.
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, TachiError>;
}

/// One discovered descriptor bound to its provider.
pub struct RemoteBinding {
    provider: Arc<dyn RemoteToolProvider>,
    descriptor: RemoteToolDescriptor,
}

impl RemoteBinding {
    pub fn new(provider: Arc<dyn RemoteToolProvider>, descriptor: RemoteToolDescriptor) -> Self {
        Self {
            provider,
            descriptor,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.descriptor.name.clone(),
            description: self.descriptor.description.clone(),
            parameters: self.descriptor.schema.clone(),
        }
    }

    pub(crate) async fn invoke(&self, args: ToolArguments) -> Result<String, TachiError> {
        self.provider
            .call_tool(&self.descriptor.name, args.raw().clone())
            .await
    }
}

impl std::fmt::Debug for RemoteBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBinding")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
