//! Token counting for budget management.
//!
//! The estimate is deliberately crude: a fixed per-message overhead plus one
//! token per four bytes of text. It is policy, not a tokenizer, and can be
//! swapped out through [`TokenCounter`].

use crate::conversation::Message;
use std::sync::Arc;

/// Trait for token counting implementations.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in a plain text string, without any per-message overhead.
    fn count_text(&self, text: &str) -> u32;

    /// Fixed cost charged once for every message.
    fn message_overhead(&self) -> u32;

    /// Count tokens in a single message.
    fn count_message(&self, message: &Message) -> u32 {
        self.message_overhead()
            .saturating_add(self.count_text(message.content()))
    }

    /// Count tokens in multiple messages.
    fn count_messages(&self, messages: &[Message]) -> u32 {
        messages
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(self.count_message(m)))
    }
}

/// Heuristic counter: `overhead + floor(len / bytes_per_token)`.
///
/// Length is measured in UTF-8 bytes.
#[derive(Debug, Clone)]
pub struct HeuristicTokenCounter {
    bytes_per_token: u32,
    message_overhead: u32,
}

impl HeuristicTokenCounter {
    pub const DEFAULT_BYTES_PER_TOKEN: u32 = 4;
    pub const DEFAULT_MESSAGE_OVERHEAD: u32 = 5;

    /// Create a counter with custom parameters. A ratio of zero is clamped to one.
    pub fn new(bytes_per_token: u32, message_overhead: u32) -> Self {
        Self {
            bytes_per_token: bytes_per_token.max(1),
            message_overhead,
        }
    }

    /// Create with default parameters (`5 + len / 4`).
    pub fn with_defaults() -> Self {
        Self::new(
            Self::DEFAULT_BYTES_PER_TOKEN,
            Self::DEFAULT_MESSAGE_OVERHEAD,
        )
    }
}

impl Default for HeuristicTokenCounter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TokenCounter for HeuristicTokenCounter {
    fn count_text(&self, text: &str) -> u32 {
        let tokens = text.len() / self.bytes_per_token as usize;
        u32::try_from(tokens).unwrap_or(u32::MAX)
    }

    fn message_overhead(&self) -> u32 {
        self.message_overhead
    }
}

/// Arc-wrapped token counter for easy sharing.
pub type SharedTokenCounter = Arc<dyn TokenCounter>;
