//! Registry resolution, priority, and degraded execution paths.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tachi::prelude::*;

use common::echo_tool;

struct StaticRemote {
    tools: Vec<RemoteToolDescriptor>,
}

impl StaticRemote {
    fn with_tool(name: &str) -> Self {
        Self {
            tools: vec![RemoteToolDescriptor {
                name: name.to_string(),
                description: "remote tool".to_string(),
                schema: serde_json::json!({"type": "object", "properties": {}}),
            }],
        }
    }
}

#[async_trait]
impl RemoteToolProvider for StaticRemote {
    async fn list_tools(&self) -> Result<Vec<RemoteToolDescriptor>> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, _arguments: serde_json::Value) -> Result<String> {
        Ok(format!("remote:{name}"))
    }
}

#[tokio::test]
async fn native_tool_shadows_remote_with_same_name() {
    let registry = ToolRegistry::new();
    registry
        .register_remote(Arc::new(StaticRemote::with_tool("echo")))
        .await
        .unwrap();
    registry.register(echo_tool());

    let outcome = registry
        .execute("echo", r#"{"text":"local"}"#, &AgentContext::new())
        .await;

    assert_eq!(outcome.value, "local");
    assert!(!outcome.is_error);
}

#[tokio::test]
async fn callback_shadows_remote_but_not_native() {
    let registry = ToolRegistry::new();
    registry
        .register_remote(Arc::new(StaticRemote::with_tool("lookup")))
        .await
        .unwrap();
    registry.register_callback(CallbackTool::new(
        "lookup",
        "Callback lookup",
        ToolParameters::empty(),
        |_args| async move { Ok("callback".to_string()) },
    ));

    let outcome = registry.execute("lookup", "{}", &AgentContext::new()).await;
    assert_eq!(outcome.value, "callback");
}

#[tokio::test]
async fn remote_tool_executes_when_unshadowed() {
    let registry = ToolRegistry::new();
    let bound = registry
        .register_remote(Arc::new(StaticRemote::with_tool("search")))
        .await
        .unwrap();
    assert_eq!(bound, 1);

    let outcome = registry
        .execute("search", r#"{"q":"ice haulers"}"#, &AgentContext::new())
        .await;
    assert_eq!(outcome.value, "remote:search");
}

#[tokio::test]
async fn unknown_tool_never_throws() {
    let registry = ToolRegistry::new();
    let outcome = registry
        .execute("does_not_exist", "{}", &AgentContext::new())
        .await;
    assert!(outcome.is_error);
    assert!(outcome.value.contains("not found"));
}

#[tokio::test]
async fn malformed_arguments_degrade_to_empty_map() {
    let registry = ToolRegistry::new();
    registry.register(echo_tool());

    let outcome = registry.execute("echo", "not-json", &AgentContext::new()).await;
    // Behaves as if called with no arguments: echoes the empty default.
    assert!(!outcome.is_error);
    assert_eq!(outcome.value, "");
}

#[tokio::test]
async fn resolve_all_lists_every_provenance_once() {
    let registry = ToolRegistry::new();
    registry.register(echo_tool());
    registry.register_callback(CallbackTool::new(
        "convert",
        "Unit conversion",
        ToolParameters::empty(),
        |_args| async move { Ok("1".to_string()) },
    ));
    registry
        .register_remote(Arc::new(StaticRemote::with_tool("echo")))
        .await
        .unwrap();

    let defs = registry.resolve_all();
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["convert", "echo"]);
    // The shadowed remote "echo" must not appear: the native wins.
    let echo = defs.iter().find(|d| d.name == "echo").unwrap();
    assert_eq!(echo.description, "Echo the text argument");
}

#[tokio::test]
async fn resolve_preserves_requested_order_and_skips_unknown() {
    let registry = ToolRegistry::new();
    registry.register(echo_tool());
    registry.register(NativeTool::new(
        "clock",
        "Tell the time",
        ToolParameters::empty(),
        |_args, _ctx| async move { Ok(ToolOutcome::text("now")) },
    ));

    let defs = registry.resolve(&[
        "clock".to_string(),
        "ghost".to_string(),
        "echo".to_string(),
    ]);
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["clock", "echo"]);
}

#[tokio::test]
async fn native_tool_sees_context_snapshot() {
    let registry = ToolRegistry::new();
    registry.register(NativeTool::new(
        "whoami",
        "Report the seeded user",
        ToolParameters::empty(),
        |_args, ctx| async move {
            let user = ctx.context.get("user").cloned().unwrap_or_default();
            Ok(ToolOutcome::text(user))
        },
    ));

    let mut context = AgentContext::new();
    context.set("user", "Camina");
    let outcome = registry.execute("whoami", "{}", &context).await;
    assert_eq!(outcome.value, "Camina");
}

#[tokio::test]
async fn remote_provider_failure_becomes_error_outcome() {
    struct FlakyRemote;

    #[async_trait]
    impl RemoteToolProvider for FlakyRemote {
        async fn list_tools(&self) -> Result<Vec<RemoteToolDescriptor>> {
            Ok(vec![RemoteToolDescriptor {
                name: "flaky".to_string(),
                description: "fails".to_string(),
                schema: serde_json::json!({"type": "object"}),
            }])
        }

        async fn call_tool(&self, name: &str, _arguments: serde_json::Value) -> Result<String> {
            Err(TachiError::tool(name, "connection reset"))
        }
    }

    let registry = ToolRegistry::new();
    registry.register_remote(Arc::new(FlakyRemote)).await.unwrap();

    let outcome = registry.execute("flaky", "{}", &AgentContext::new()).await;
    assert!(outcome.is_error);
    assert!(outcome.value.contains("connection reset"));
}
