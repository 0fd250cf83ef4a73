//! Provider-native callback tools.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::arguments::ToolArguments;
use super::types::{ToolDefinition, ToolParameters};
use crate::error::TachiError;

/// Type alias for the callback handler function.
type CallbackHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<String, TachiError>> + Send>>
    + Send
    + Sync;

/// A tool whose schema was derived by the chat collaborator's own
/// introspection mechanism. The handler sees arguments only and returns
/// plain text -- no context access, no handoff.
pub struct CallbackTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    handler: Arc<CallbackHandler>,
}

impl CallbackTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, TachiError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.schema.clone(),
        }
    }

    pub(crate) async fn invoke(&self, args: ToolArguments) -> Result<String, TachiError> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for CallbackTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
