//! Context selection under a token budget.

use crate::budget::counter::{HeuristicTokenCounter, SharedTokenCounter};
use crate::budget::types::{BudgetError, PreparedContext};
use crate::conversation::{Conversation, Message};
use std::sync::Arc;

/// Decides which part of a conversation is sent with the next request.
pub trait ContextStrategy: Send + Sync {
    /// Build the message list for one request.
    ///
    /// The returned messages start with `system_prompt` when one is given.
    /// The store itself is never modified.
    fn select(
        &self,
        system_prompt: Option<&Message>,
        history: &[Message],
        max_tokens: u32,
    ) -> Result<PreparedContext, BudgetError>;

    /// Convenience wrapper over [`ContextStrategy::select`] for a whole conversation.
    fn prepare(
        &self,
        conversation: &Conversation,
        max_tokens: u32,
    ) -> Result<PreparedContext, BudgetError> {
        self.select(conversation.system_prompt(), conversation.messages(), max_tokens)
    }
}

/// Keeps the longest run of most recent messages that fits.
///
/// Walks the history from newest to oldest and stops at the first message that
/// would overflow the budget. Older messages are never considered after that,
/// even if some of them are small enough to fit: the window is always a
/// contiguous suffix of the history.
#[derive(Clone)]
pub struct SuffixWindowStrategy {
    counter: SharedTokenCounter,
}

impl SuffixWindowStrategy {
    pub fn new(counter: SharedTokenCounter) -> Self {
        Self { counter }
    }
}

impl Default for SuffixWindowStrategy {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicTokenCounter::default()))
    }
}

impl ContextStrategy for SuffixWindowStrategy {
    fn select(
        &self,
        system_prompt: Option<&Message>,
        history: &[Message],
        max_tokens: u32,
    ) -> Result<PreparedContext, BudgetError> {
        let mut total_tokens: u32 = 0;

        if let Some(system) = system_prompt {
            let system_tokens = self.counter.count_message(system);
            if system_tokens > max_tokens {
                return Err(BudgetError::SystemPromptTooLarge {
                    system_tokens,
                    max_tokens,
                });
            }
            total_tokens = system_tokens;
        }

        // Newest first; the first message that does not fit closes the window.
        let mut window_start = history.len();
        for (index, message) in history.iter().enumerate().rev() {
            let cost = self.counter.count_message(message);
            match total_tokens.checked_add(cost) {
                Some(next) if next <= max_tokens => {
                    total_tokens = next;
                    window_start = index;
                }
                _ => break,
            }
        }

        let mut messages = Vec::with_capacity(history.len() - window_start + 1);
        messages.extend(system_prompt.cloned());
        messages.extend_from_slice(&history[window_start..]);

        if window_start > 0 {
            tracing::debug!(
                dropped = window_start,
                kept = history.len() - window_start,
                total_tokens,
                max_tokens,
                "context window truncated"
            );
        }

        Ok(PreparedContext {
            messages,
            total_tokens,
            budget_limit: max_tokens,
            dropped_messages: window_start,
        })
    }
}
