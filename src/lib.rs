//! Tachi -- multi-agent conversation runtime.
//!
//! Given a user message stream, Tachi drives a bounded loop of "ask a
//! language model, execute any requested tools, possibly switch agents,
//! repeat" until the model produces a final answer or the turn budget runs
//! out. The pieces:
//!
//! - [`agent::Agent`] -- immutable persona: name, model, instructions
//!   (literal or context-derived), allowed tools, tool-choice policy.
//! - [`agent::ConversationHistory`] -- bounded transcript with deterministic,
//!   model-free compaction.
//! - [`agent::AgentContext`] -- per-run key/value state shared by every tool
//!   invocation in that run.
//! - [`tools::ToolRegistry`] -- name-to-behavior dispatch across three tool
//!   provenances (native, provider callback, remote), fixed priority.
//! - [`runner::Runner`] -- the turn loop, synchronous and streaming.
//!
//! Model invocation, prompt enrichment, and remote tool transports are
//! collaborator traits ([`client::ChatClient`], [`enrich::PromptEnricher`],
//! [`tools::RemoteToolProvider`]); the runtime has no network code of its
//! own.

pub mod agent;
pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod prelude;
pub mod runner;
pub mod tools;
pub mod types;
