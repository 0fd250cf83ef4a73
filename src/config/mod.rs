//! Runtime configuration (code > environment > defaults).

use bon::Builder;

use crate::agent::DEFAULT_HISTORY_LIMIT;

/// Turn budget used when the caller does not pass one.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Capacity of the streaming token channel.
pub const DEFAULT_STREAM_BUFFER: usize = 32;

/// Tunables for the runner.
#[derive(Debug, Clone, Builder)]
pub struct RunnerConfig {
    /// Default turn budget.
    #[builder(default = DEFAULT_MAX_TURNS)]
    pub max_turns: usize,
    /// Maximum non-system messages kept in conversation history.
    #[builder(default = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,
    /// Bounded capacity of the streaming token channel (backpressure).
    #[builder(default = DEFAULT_STREAM_BUFFER)]
    pub stream_buffer: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RunnerConfig {
    /// Load from environment variables (`TACHI_MAX_TURNS`,
    /// `TACHI_HISTORY_LIMIT`, `TACHI_STREAM_BUFFER`), falling back to the
    /// defaults. Reads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        fn var_or(name: &str, default: usize) -> usize {
            match std::env::var(name) {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(var = name, value = %raw, "unparseable value, using default");
                    default
                }),
                Err(_) => default,
            }
        }

        Self {
            max_turns: var_or("TACHI_MAX_TURNS", DEFAULT_MAX_TURNS),
            history_limit: var_or("TACHI_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT),
            stream_buffer: var_or("TACHI_STREAM_BUFFER", DEFAULT_STREAM_BUFFER),
        }
    }
}
