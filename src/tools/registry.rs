//! Tool resolution and dispatch across three provenances.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::arguments::ToolArguments;
use super::callback::CallbackTool;
use super::native::{NativeTool, ToolExecutionContext};
use super::outcome::ToolOutcome;
use super::remote::{RemoteBinding, RemoteToolDescriptor, RemoteToolProvider};
use super::types::ToolDefinition;
use crate::agent::AgentContext;
use crate::error::TachiError;

/// One resolved tool, tagged by provenance.
#[derive(Debug, Clone)]
enum Binding {
    Native(Arc<NativeTool>),
    Callback(Arc<CallbackTool>),
    Remote(Arc<RemoteBinding>),
}

impl Binding {
    fn definition(&self) -> ToolDefinition {
        match self {
            Self::Native(tool) => tool.definition(),
            Self::Callback(tool) => tool.definition(),
            Self::Remote(binding) => binding.definition(),
        }
    }
}

/// Name-to-behavior lookup across three disjoint maps, one per provenance.
///
/// Resolution priority is fixed: native, then provider callback, then
/// remote. A locally defined tool with the same name as a remote one always
/// wins, so a deployment can shadow a misbehaving remote tool without
/// negotiation.
///
/// Reads happen on every turn of every concurrent run; writes happen at
/// startup/registration time, hence a plain `RwLock` per map.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    native: RwLock<HashMap<String, Arc<NativeTool>>>,
    callbacks: RwLock<HashMap<String, Arc<CallbackTool>>>,
    remote: RwLock<HashMap<String, Arc<RemoteBinding>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native tool.
    pub fn register(&self, tool: NativeTool) {
        let mut native = self.native.write().expect("registry lock poisoned");
        native.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Register a provider-native callback tool.
    pub fn register_callback(&self, tool: CallbackTool) {
        let mut callbacks = self.callbacks.write().expect("registry lock poisoned");
        callbacks.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Bind a single remotely discovered descriptor.
    pub fn register_remote_tool(
        &self,
        provider: Arc<dyn RemoteToolProvider>,
        descriptor: RemoteToolDescriptor,
    ) {
        let binding = RemoteBinding::new(provider, descriptor);
        let mut remote = self.remote.write().expect("registry lock poisoned");
        remote.insert(binding.name().to_string(), Arc::new(binding));
    }

    /// Discover and bind every tool a remote provider surfaces. Returns the
    /// number of tools bound.
    pub async fn register_remote(
        &self,
        provider: Arc<dyn RemoteToolProvider>,
    ) -> Result<usize, TachiError> {
        let descriptors = provider.list_tools().await?;
        let count = descriptors.len();
        for descriptor in descriptors {
            self.register_remote_tool(provider.clone(), descriptor);
        }
        Ok(count)
    }

    /// Resolve the named tools to model-facing definitions, in priority
    /// order per name. Unknown names are skipped with a warning.
    pub fn resolve(&self, names: &[String]) -> Vec<ToolDefinition> {
        let mut definitions = Vec::with_capacity(names.len());
        for name in names {
            match self.lookup(name) {
                Some(binding) => definitions.push(binding.definition()),
                None => tracing::warn!(tool = %name, "tool not in registry, skipping"),
            }
        }
        definitions
    }

    /// Resolve every registered tool. Names shadowed by a higher-priority
    /// provenance appear once, with the winner's definition.
    pub fn resolve_all(&self) -> Vec<ToolDefinition> {
        let native = self.native.read().expect("registry lock poisoned");
        let callbacks = self.callbacks.read().expect("registry lock poisoned");
        let remote = self.remote.read().expect("registry lock poisoned");

        let mut seen: HashMap<&str, ()> = HashMap::new();
        let mut definitions = Vec::new();
        for (name, tool) in native.iter() {
            seen.insert(name.as_str(), ());
            definitions.push(tool.definition());
        }
        for (name, tool) in callbacks.iter() {
            if seen.insert(name.as_str(), ()).is_none() {
                definitions.push(tool.definition());
            }
        }
        for (name, binding) in remote.iter() {
            if seen.insert(name.as_str(), ()).is_none() {
                definitions.push(binding.definition());
            }
        }
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Whether any provenance knows this name.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Execute a tool by name. Never fails: unknown names, malformed
    /// arguments, and handler errors all degrade to an error-text outcome
    /// the model can read.
    pub async fn execute(
        &self,
        name: &str,
        args_json: &str,
        context: &AgentContext,
    ) -> ToolOutcome {
        self.dispatch(name, args_json, None, context).await
    }

    pub(crate) async fn dispatch(
        &self,
        name: &str,
        args_json: &str,
        tool_call_id: Option<&str>,
        context: &AgentContext,
    ) -> ToolOutcome {
        let Some(binding) = self.lookup(name) else {
            tracing::warn!(tool = %name, "tool not found");
            return ToolOutcome::error(format!("tool '{name}' not found"));
        };

        let args = ToolArguments::from_raw(args_json);
        let result = match binding {
            Binding::Native(tool) => {
                let ctx = ToolExecutionContext {
                    context: context.snapshot(),
                    tool_call_id: tool_call_id.map(str::to_string),
                    tool_name: Some(name.to_string()),
                };
                tool.invoke(args, ctx).await
            }
            Binding::Callback(tool) => tool.invoke(args).await.map(ToolOutcome::text),
            Binding::Remote(binding) => binding.invoke(args).await.map(ToolOutcome::text),
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(tool = %name, error = %err, "tool execution failed");
                ToolOutcome::error(format!("tool '{name}' failed: {err}"))
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<Binding> {
        if let Some(tool) = self
            .native
            .read()
            .expect("registry lock poisoned")
            .get(name)
        {
            return Some(Binding::Native(tool.clone()));
        }
        if let Some(tool) = self
            .callbacks
            .read()
            .expect("registry lock poisoned")
            .get(name)
        {
            return Some(Binding::Callback(tool.clone()));
        }
        if let Some(binding) = self
            .remote
            .read()
            .expect("registry lock poisoned")
            .get(name)
        {
            return Some(Binding::Remote(binding.clone()));
        }
        None
    }
}
