//! System prompt enrichment.

use async_trait::async_trait;

use crate::error::Result;

/// Optional collaborator that enriches an agent's resolved instructions
/// before each turn, e.g. by injecting recalled facts about the user.
#[async_trait]
pub trait PromptEnricher: Send + Sync {
    async fn enrich(
        &self,
        base: &str,
        agent_name: &str,
        latest_user_message: Option<&str>,
    ) -> Result<String>;
}

/// Fallback used when no enricher is configured: the agent's name and tool
/// roster appended to the base instructions.
pub(crate) fn minimal_enrichment(base: &str, agent_name: &str, tool_names: &[String]) -> String {
    let mut prompt = String::new();
    if !base.is_empty() {
        prompt.push_str(base);
        prompt.push_str("\n\n");
    }
    prompt.push_str("You are ");
    prompt.push_str(agent_name);
    prompt.push('.');
    if !tool_names.is_empty() {
        prompt.push_str(" Available tools: ");
        prompt.push_str(&tool_names.join(", "));
        prompt.push('.');
    }
    prompt
}
