//! Bounded conversation history with deterministic compaction.

use std::collections::VecDeque;

use crate::types::{Message, Role};

/// Default maximum number of counted (non-system) messages.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Max chars of a dropped user message's first line kept as a topic hint.
const TOPIC_LINE_MAX: usize = 80;

/// Most recent topic hints retained across repeated compactions.
const TOPIC_HINT_MAX: usize = 12;

/// Ordered, size-bounded message buffer.
///
/// System messages are never counted against the limit and never dropped.
/// Compaction runs synchronously on every append once the non-system count
/// exceeds the limit, replacing the dropped prefix with one synthetic
/// summary message built without any model call. The surviving tail never
/// starts with a `tool` message -- a tool result is meaningless without the
/// assistant call that preceded it.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    system: Vec<Message>,
    summary: Option<Message>,
    conversation: Vec<Message>,
    limit: usize,
    dropped_total: usize,
    dropped_users: usize,
    dropped_assistants: usize,
    dropped_tools: usize,
    topics: VecDeque<String>,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            system: Vec::new(),
            summary: None,
            conversation: Vec::new(),
            limit,
            dropped_total: 0,
            dropped_users: 0,
            dropped_assistants: 0,
            dropped_tools: 0,
            topics: VecDeque::new(),
        }
    }

    /// Seed from an existing transcript, applying the append path (and thus
    /// compaction) to each message.
    pub fn seeded(messages: impl IntoIterator<Item = Message>, limit: usize) -> Self {
        let mut history = Self::with_limit(limit);
        for message in messages {
            history.push(message);
        }
        history
    }

    /// Append a message. Compaction triggers synchronously when the
    /// non-system count exceeds the limit.
    pub fn push(&mut self, message: Message) {
        if message.role == Role::System {
            self.system.push(message);
            return;
        }
        self.conversation.push(message);
        self.compact();
    }

    /// Assemble the full transcript: system messages first, then the
    /// synthetic summary (if any), then the conversation tail.
    pub fn messages(&self) -> Vec<Message> {
        let mut out = self.system.clone();
        out.extend(self.summary.iter().cloned());
        out.extend(self.conversation.iter().cloned());
        out
    }

    /// Consume into the assembled transcript.
    pub fn into_messages(mut self) -> Vec<Message> {
        let mut out = std::mem::take(&mut self.system);
        out.extend(self.summary.take());
        out.append(&mut self.conversation);
        out
    }

    /// The conversation tail (non-system, post-compaction), in order.
    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    /// Content of the most recent user message, if any.
    pub fn latest_user_message(&self) -> Option<&str> {
        self.conversation
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Number of counted (non-system) messages.
    pub fn non_system_len(&self) -> usize {
        self.conversation.len()
    }

    /// Total messages in the assembled transcript.
    pub fn len(&self) -> usize {
        self.system.len() + usize::from(self.summary.is_some()) + self.conversation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn compact(&mut self) {
        if self.conversation.len() <= self.limit {
            return;
        }

        // Safe split: advance past any contiguous tool-message run so the
        // kept tail never begins with an orphaned tool result.
        let mut cut = self.conversation.len() - self.limit;
        while cut < self.conversation.len() && self.conversation[cut].role == Role::Tool {
            cut += 1;
        }

        let dropped: Vec<Message> = self.conversation.drain(..cut).collect();
        for message in &dropped {
            match message.role {
                Role::User => {
                    self.dropped_users += 1;
                    let line = message.first_line(TOPIC_LINE_MAX);
                    if !line.is_empty() {
                        self.topics.push_back(line);
                        if self.topics.len() > TOPIC_HINT_MAX {
                            self.topics.pop_front();
                        }
                    }
                }
                Role::Assistant => self.dropped_assistants += 1,
                Role::Tool => self.dropped_tools += 1,
                Role::System => {}
            }
        }
        self.dropped_total += dropped.len();

        tracing::debug!(
            dropped = dropped.len(),
            dropped_total = self.dropped_total,
            kept = self.conversation.len(),
            limit = self.limit,
            "history compacted"
        );

        self.summary = Some(self.build_summary());
    }

    fn build_summary(&self) -> Message {
        let mut text = format!(
            "{} earlier messages summarized ({} user, {} assistant, {} tool).",
            self.dropped_total, self.dropped_users, self.dropped_assistants, self.dropped_tools
        );
        if !self.topics.is_empty() {
            let topics: Vec<&str> = self.topics.iter().map(String::as_str).collect();
            text.push_str(" Topics discussed: ");
            text.push_str(&topics.join("; "));
            text.push('.');
        }
        Message::system(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_pair(id: &str) -> [Message; 2] {
        [
            Message::assistant(format!("calling {id}")),
            Message::tool_result(id, "ok"),
        ]
    }

    #[test]
    fn under_limit_is_untouched() {
        let mut history = ConversationHistory::with_limit(5);
        history.push(Message::user("hello"));
        history.push(Message::assistant("hi"));
        assert_eq!(history.non_system_len(), 2);
        assert_eq!(history.messages().len(), 2);
    }

    #[test]
    fn system_messages_never_counted_or_dropped() {
        let mut history = ConversationHistory::with_limit(2);
        history.push(Message::system("rules"));
        for i in 0..10 {
            history.push(Message::user(format!("msg {i}")));
        }
        let messages = history.messages();
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "rules");
        assert!(history.non_system_len() <= 2);
    }

    #[test]
    fn compaction_inserts_summary_with_counts_and_topics() {
        let mut history = ConversationHistory::with_limit(2);
        history.push(Message::user("book a flight to Tycho\nwith extra detail"));
        history.push(Message::assistant("sure"));
        history.push(Message::user("make it Thursday"));
        history.push(Message::assistant("done"));

        let messages = history.messages();
        let summary = &messages[0];
        assert_eq!(summary.role, Role::System);
        assert!(summary.content.contains("earlier messages summarized"));
        assert!(summary.content.contains("book a flight to Tycho"));
        // second line of the dropped user message is not a topic
        assert!(!summary.content.contains("extra detail"));
        assert!(history.non_system_len() <= 2);
    }

    #[test]
    fn tail_never_starts_with_tool_message() {
        let mut history = ConversationHistory::with_limit(2);
        history.push(Message::user("q"));
        let [call, result] = tool_pair("call_1");
        history.push(call);
        history.push(result);
        history.push(Message::assistant("a"));

        // naive cut would leave the tool result first; the safe split
        // advances past it
        assert_ne!(history.conversation()[0].role, Role::Tool);
    }

    #[test]
    fn repeated_compactions_keep_single_summary() {
        let mut history = ConversationHistory::with_limit(3);
        for i in 0..30 {
            history.push(Message::user(format!("topic {i}")));
        }
        let summaries = history
            .messages()
            .into_iter()
            .filter(|m| m.role == Role::System)
            .count();
        assert_eq!(summaries, 1);
        assert!(history.non_system_len() <= 3);
    }

    #[test]
    fn counted_size_bounded_after_any_append_sequence() {
        let limit = 4;
        let mut history = ConversationHistory::with_limit(limit);
        for i in 0..100 {
            match i % 4 {
                0 => history.push(Message::user(format!("u{i}"))),
                1 => history.push(Message::assistant(format!("a{i}"))),
                2 => history.push(Message::tool_result(format!("call_{i}"), "ok")),
                _ => history.push(Message::system(format!("s{i}"))),
            }
            assert!(
                history.non_system_len() <= limit + 1,
                "non-system count exceeded limit at append {i}"
            );
            if let Some(first) = history.conversation().first() {
                assert_ne!(first.role, Role::Tool, "tool message heads the tail at {i}");
            }
        }
    }

    #[test]
    fn seeded_applies_compaction() {
        let messages: Vec<Message> = (0..10).map(|i| Message::user(format!("m{i}"))).collect();
        let history = ConversationHistory::seeded(messages, 4);
        assert!(history.non_system_len() <= 4);
        assert_eq!(history.latest_user_message(), Some("m9"));
    }
}
