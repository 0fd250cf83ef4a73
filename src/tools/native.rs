//! Native agent tools -- closures with a view of the run context, able to
//! hand off and update context.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::arguments::ToolArguments;
use super::outcome::ToolOutcome;
use super::types::{ToolDefinition, ToolParameters};
use crate::error::TachiError;

/// Read view handed to a tool invocation: a snapshot of the run context plus
/// call identity. Writes flow back through [`ToolOutcome::context_updates`].
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    pub context: HashMap<String, String>,
    pub tool_call_id: Option<String>,
    pub tool_name: Option<String>,
}

/// Type alias for the native tool handler function.
type NativeHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> Pin<Box<dyn Future<Output = Result<ToolOutcome, TachiError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool registered locally, with model-visible description and
/// schema.
pub struct NativeTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    handler: Arc<NativeHandler>,
}

impl NativeTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome, TachiError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.schema.clone(),
        }
    }

    pub(crate) async fn invoke(
        &self,
        args: ToolArguments,
        ctx: ToolExecutionContext,
    ) -> Result<ToolOutcome, TachiError> {
        (self.handler)(args, ctx).await
    }
}

impl std::fmt::Debug for NativeTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
