//! Shared test fixtures: scripted chat clients and tool helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::BoxStream;
use tachi::prelude::*;

/// Chat client that replays scripted replies and records every request.
///
/// `complete` pops the next scripted reply; an exhausted script repeats the
/// last reply (convenient for turn-budget tests). Streaming is not
/// implemented, so the runner's fallback path is exercised.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ChatReply>>,
    last: Mutex<Option<ChatReply>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<ChatReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client that answers every turn with the same reply.
    pub fn repeating(reply: ChatReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            last: Mutex::new(Some(reply)),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `complete`/`stream` round-trips so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn next_reply(&self, request: &ChatRequest) -> ChatReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        match replies.pop_front() {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| ChatReply::text("")),
        }
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        Ok(self.next_reply(request))
    }
}

/// Scripted client whose `stream` chunks the reply text word by word.
pub struct StreamingScriptedClient {
    inner: ScriptedClient,
}

impl StreamingScriptedClient {
    pub fn new(replies: Vec<ChatReply>) -> Self {
        Self {
            inner: ScriptedClient::new(replies),
        }
    }

    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

#[async_trait]
impl ChatClient for StreamingScriptedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        Ok(self.inner.next_reply(request))
    }

    async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta>>> {
        let reply = self.inner.next_reply(request);
        let mut deltas: Vec<Result<StreamDelta>> = Vec::new();
        for chunk in reply.text.split_inclusive(' ') {
            deltas.push(Ok(StreamDelta::text_delta(chunk)));
        }
        for call in reply.tool_calls {
            deltas.push(Ok(StreamDelta::tool_call(call)));
        }
        deltas.push(Ok(StreamDelta::done()));
        Ok(Box::pin(futures::stream::iter(deltas)))
    }
}

/// Client whose every call fails -- for run-level failure tests.
pub struct FailingClient;

#[async_trait]
impl ChatClient for FailingClient {
    async fn complete(&self, _request: &ChatRequest) -> Result<ChatReply> {
        Err(TachiError::Client("model unreachable".into()))
    }
}

/// Shorthand for a tool call request.
pub fn call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

/// An echo tool that returns its `text` argument.
pub fn echo_tool() -> NativeTool {
    NativeTool::new(
        "echo",
        "Echo the text argument",
        ToolParameters::object().string("text", "Text to echo", true).build(),
        |args, _ctx| async move {
            Ok(ToolOutcome::text(
                args.get_str_opt("text").unwrap_or_default().to_string(),
            ))
        },
    )
}

/// A clock tool with a fixed answer.
pub fn get_time_tool() -> NativeTool {
    NativeTool::new(
        "get_time",
        "Current time",
        ToolParameters::empty(),
        |_args, _ctx| async move { Ok(ToolOutcome::text("12:34")) },
    )
}

/// A tool that records invocations in the shared counter.
pub fn counting_tool(name: &str, counter: Arc<AtomicUsize>) -> NativeTool {
    NativeTool::new(
        name,
        "Counts invocations",
        ToolParameters::empty(),
        move |_args, _ctx| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(ToolOutcome::text("counted"))
            }
        },
    )
}

/// A tool that hands off to the given agent.
pub fn transfer_tool(name: &str, target: Agent) -> NativeTool {
    NativeTool::new(
        name,
        "Transfer the conversation",
        ToolParameters::empty(),
        move |_args, _ctx| {
            let target = target.clone();
            async move { Ok(ToolOutcome::handoff(target)) }
        },
    )
}
