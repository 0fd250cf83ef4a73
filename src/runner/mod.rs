//! The orchestration engine: synchronous turn loop and streaming variant.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::agent::{Agent, AgentContext, ConversationHistory};
use crate::client::{ChatClient, ChatReply, ChatRequest, StreamDelta, StreamEventType, ToolCallRequest};
use crate::config::RunnerConfig;
use crate::enrich::{minimal_enrichment, PromptEnricher};
use crate::error::{Result, TachiError};
use crate::tools::ToolRegistry;
use crate::types::{AgentResponse, Message};

/// Context key the runner seeds with a fresh UUID when the caller has not.
pub const SESSION_ID_KEY: &str = "session_id";

/// Drives the ask-model / run-tools / maybe-hand-off loop.
///
/// All mutable run state (context, history, active agent) is per-run, so one
/// `Runner` serves any number of concurrent callers.
#[derive(Clone)]
pub struct Runner {
    client: Arc<dyn ChatClient>,
    registry: Arc<ToolRegistry>,
    enricher: Option<Arc<dyn PromptEnricher>>,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(client: Arc<dyn ChatClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            registry,
            enricher: None,
            config: RunnerConfig::default(),
        }
    }

    /// Attach a prompt enricher collaborator.
    pub fn with_enricher(mut self, enricher: Arc<dyn PromptEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Override the default configuration.
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run the turn loop to completion on the caller's task.
    ///
    /// Terminates when the model answers without tool calls, or when
    /// `max_turns` model calls have been made -- budget exhaustion is a
    /// warned success returning the best-effort transcript, never an error.
    pub async fn run(
        &self,
        agent: Agent,
        messages: Vec<Message>,
        context: AgentContext,
        max_turns: usize,
    ) -> Result<AgentResponse> {
        let run_id = Uuid::new_v4();
        let mut state = RunState::new(self, run_id, agent, messages, context);

        let mut turn = 1usize;
        while turn <= max_turns {
            let request = self.build_request(&state).await?;
            let reply = self.client.complete(&request).await?;
            tracing::debug!(
                run_id = %run_id,
                turn,
                agent = %state.active.name(),
                tool_calls = reply.tool_calls.len(),
                text_len = reply.text.len(),
                "turn complete"
            );

            if reply.tool_calls.is_empty() {
                state.finish_with_answer(reply.text);
                return Ok(state.into_response());
            }

            state.apply_tool_calls(self, &reply).await;
            turn += 1;
        }

        tracing::warn!(
            run_id = %run_id,
            max_turns,
            "turn budget exhausted, returning partial transcript"
        );
        Ok(state.into_response())
    }

    /// Run the turn loop on a dedicated worker, emitting text tokens through
    /// a bounded, backpressured channel.
    ///
    /// Per turn the worker tries the collaborator's streaming endpoint and
    /// silently falls back to one non-streaming call (emitted as a single
    /// token) when streaming is unavailable. The stream ends after the first
    /// tool-call-free turn, on budget exhaustion, or with a terminal `Err`
    /// token on an unrecoverable collaborator failure. Cancellation is
    /// cooperative: it is observed between tokens, and the in-flight call is
    /// allowed to finish.
    pub fn run_streaming(
        &self,
        agent: Agent,
        messages: Vec<Message>,
        context: AgentContext,
        max_turns: usize,
    ) -> StreamingRun {
        let (tx, rx) = mpsc::channel(self.config.stream_buffer);
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let runner = self.clone();

        tokio::spawn(async move {
            let outcome = runner
                .stream_loop(agent, messages, context, max_turns, &tx, &worker_cancel)
                .await;
            if let Err(err) = outcome {
                let _ = tx.send(Err(err)).await;
            }
        });

        StreamingRun { cancel, rx }
    }

    async fn stream_loop(
        &self,
        agent: Agent,
        messages: Vec<Message>,
        context: AgentContext,
        max_turns: usize,
        tx: &mpsc::Sender<Result<String>>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let run_id = Uuid::new_v4();
        let mut state = RunState::new(self, run_id, agent, messages, context);

        let mut turn = 1usize;
        while turn <= max_turns {
            if cancel.is_cancelled() {
                tracing::debug!(run_id = %run_id, turn, "streaming run canceled");
                return Ok(());
            }

            let request = self.build_request(&state).await?;
            let Some(reply) = self.stream_turn(run_id, &request, tx, cancel).await? else {
                return Ok(());
            };
            tracing::debug!(
                run_id = %run_id,
                turn,
                agent = %state.active.name(),
                tool_calls = reply.tool_calls.len(),
                text_len = reply.text.len(),
                "streamed turn complete"
            );

            if reply.tool_calls.is_empty() {
                state.finish_with_answer(reply.text);
                return Ok(());
            }

            state.apply_tool_calls(self, &reply).await;
            turn += 1;
        }

        tracing::warn!(run_id = %run_id, max_turns, "turn budget exhausted mid-stream");
        Ok(())
    }

    /// Stream one turn, forwarding text deltas as tokens. Returns `None` on
    /// cancellation (including the receiver going away).
    async fn stream_turn(
        &self,
        run_id: Uuid,
        request: &ChatRequest,
        tx: &mpsc::Sender<Result<String>>,
        cancel: &CancellationToken,
    ) -> Result<Option<ChatReply>> {
        let mut stream = match self.client.stream(request).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::debug!(
                    run_id = %run_id,
                    error = %err,
                    "streaming unavailable, falling back to a single completion"
                );
                let reply = self.client.complete(request).await?;
                reply_as_stream(reply)
            }
        };

        let mut text = String::new();
        let mut tool_calls: Vec<ToolCallRequest> = Vec::new();
        loop {
            let delta = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(run_id = %run_id, "streaming run canceled mid-turn");
                    return Ok(None);
                }
                delta = stream.next() => delta,
            };
            let Some(delta) = delta else { break };
            let delta = delta?;
            match delta.event {
                StreamEventType::TextDelta => {
                    if !delta.text.is_empty() {
                        text.push_str(&delta.text);
                        if tx.send(Ok(delta.text)).await.is_err() {
                            // Receiver dropped: same as cancellation.
                            return Ok(None);
                        }
                    }
                }
                StreamEventType::ToolCall => {
                    if let Some(call) = delta.tool_call {
                        tool_calls.push(call);
                    }
                }
                StreamEventType::Done => break,
            }
        }

        Ok(Some(ChatReply { text, tool_calls }))
    }

    async fn build_request(&self, state: &RunState) -> Result<ChatRequest> {
        let agent = &state.active;
        let tools = if agent.tool_names().is_empty() {
            self.registry.resolve_all()
        } else {
            self.registry.resolve(agent.tool_names())
        };

        let base = agent.resolve_instructions(&state.context.snapshot());
        let system = match &self.enricher {
            Some(enricher) => {
                enricher
                    .enrich(&base, agent.name(), state.history.latest_user_message())
                    .await?
            }
            None => {
                let tool_names: Vec<String> =
                    tools.iter().map(|def| def.name.clone()).collect();
                minimal_enrichment(&base, agent.name(), &tool_names)
            }
        };

        Ok(ChatRequest {
            model: agent.model().to_string(),
            system,
            messages: state.history.messages(),
            tools,
            tool_choice: agent.tool_choice().clone(),
        })
    }
}

/// Mutable state of one run: transcript, context, active agent.
struct RunState {
    run_id: Uuid,
    active: Agent,
    history: ConversationHistory,
    context: AgentContext,
}

impl RunState {
    fn new(
        runner: &Runner,
        run_id: Uuid,
        agent: Agent,
        messages: Vec<Message>,
        mut context: AgentContext,
    ) -> Self {
        if !context.contains(SESSION_ID_KEY) {
            context.set(SESSION_ID_KEY, Uuid::new_v4().to_string());
        }
        Self {
            run_id,
            active: agent,
            history: ConversationHistory::seeded(messages, runner.config.history_limit),
            context,
        }
    }

    /// Append the final assistant answer, tagged with the active agent.
    fn finish_with_answer(&mut self, text: String) {
        let name = self.active.name().to_string();
        self.history.push(Message::assistant_from(name, text));
    }

    /// Append the assistant message for a tool-calling turn, execute each
    /// requested call in reply order, merge context updates, and latch any
    /// handoff.
    ///
    /// A handoff takes effect from the next turn; the remaining calls of
    /// this turn still run against the tool set resolved at the top of the
    /// turn. The last handoff in a turn wins.
    async fn apply_tool_calls(&mut self, runner: &Runner, reply: &ChatReply) {
        let name = self.active.name().to_string();
        self.history
            .push(Message::assistant_from(name, reply.text.clone()));

        let mut pending_handoff: Option<Agent> = None;
        for call in &reply.tool_calls {
            let outcome = runner
                .registry
                .dispatch(&call.name, &call.arguments, Some(&call.id), &self.context)
                .await;
            if outcome.is_error {
                tracing::debug!(
                    run_id = %self.run_id,
                    tool = %call.name,
                    "tool reported an error, surfacing to the model"
                );
            }
            self.context.merge(outcome.context_updates);
            self.history
                .push(Message::tool_result(&call.id, outcome.value));
            if let Some(target) = outcome.handoff {
                tracing::debug!(
                    run_id = %self.run_id,
                    from = %self.active.name(),
                    to = %target.name(),
                    "handoff latched for next turn"
                );
                pending_handoff = Some(target);
            }
        }

        if let Some(target) = pending_handoff {
            self.active = target;
        }
    }

    fn into_response(self) -> AgentResponse {
        AgentResponse {
            messages: self.history.into_messages(),
            agent: self.active,
            context: self.context.into_values(),
        }
    }
}

/// Handle for an in-flight streaming run.
pub struct StreamingRun {
    cancel: CancellationToken,
    rx: mpsc::Receiver<Result<String>>,
}

impl StreamingRun {
    /// Stop the worker. The in-flight model or tool call is allowed to
    /// finish; no further tokens are emitted.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// A token the caller can use to observe or propagate cancellation.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive the next token. `None` means the run finished and the
    /// channel closed.
    pub async fn next_token(&mut self) -> Option<Result<String>> {
        self.rx.recv().await
    }

    /// Convert into a [`Stream`](futures::Stream) of tokens.
    pub fn into_stream(self) -> ReceiverStream<Result<String>> {
        ReceiverStream::new(self.rx)
    }
}

/// Adapt a non-streaming reply into the delta stream shape: the full text as
/// one token, then each tool call, then done.
fn reply_as_stream(reply: ChatReply) -> BoxStream<'static, Result<StreamDelta>> {
    let ChatReply { text, tool_calls } = reply;
    Box::pin(async_stream::stream! {
        if !text.is_empty() {
            yield Ok(StreamDelta::text_delta(text));
        }
        for call in tool_calls {
            yield Ok(StreamDelta::tool_call(call));
        }
        yield Ok(StreamDelta::done());
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reply_as_stream_emits_text_then_calls_then_done() {
        let reply = ChatReply::tool_calls(
            "thinking",
            vec![ToolCallRequest {
                id: "call_1".into(),
                name: "echo".into(),
                arguments: "{}".into(),
            }],
        );
        let deltas: Vec<StreamDelta> = reply_as_stream(reply)
            .map(|d| d.unwrap())
            .collect()
            .await;

        assert_eq!(deltas.len(), 3);
        assert_eq!(deltas[0].event, StreamEventType::TextDelta);
        assert_eq!(deltas[0].text, "thinking");
        assert_eq!(deltas[1].event, StreamEventType::ToolCall);
        assert_eq!(deltas[2].event, StreamEventType::Done);
    }
}
