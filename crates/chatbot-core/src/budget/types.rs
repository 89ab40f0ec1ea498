//! Core types for token budget management.

use crate::conversation::Message;
use thiserror::Error;

/// Result of context selection: exactly what goes out for one turn.
#[derive(Debug, Clone)]
pub struct PreparedContext {
    /// System prompt (if any) followed by the selected history, oldest first
    pub messages: Vec<Message>,
    /// Estimated cost of `messages`
    pub total_tokens: u32,
    /// Budget the selection was made against
    pub budget_limit: u32,
    /// History messages left out of this request
    pub dropped_messages: usize,
}

impl PreparedContext {
    /// Whether older history had to be left out.
    pub fn truncated(&self) -> bool {
        self.dropped_messages > 0
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Errors that can occur during budget management.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// The system prompt alone exceeds the budget; no request can be built.
    #[error("budget exceeded: system prompt ({system_tokens} tokens) does not fit in {max_tokens} tokens")]
    SystemPromptTooLarge { system_tokens: u32, max_tokens: u32 },
}
