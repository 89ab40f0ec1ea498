//! One conversation against one provider.

use std::sync::Arc;

use chatbot_core::{ContextStrategy, Conversation, Role, SuffixWindowStrategy};

use crate::error::TurnError;
use crate::provider::ChatProvider;
use crate::stream::{decode_stream, StreamSink, TurnOutcome};

/// Default request budget in estimated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 32_000;

/// Drives chat turns: records the user message, selects context, streams
/// the reply and commits it to history.
pub struct ChatSession {
    provider: Arc<dyn ChatProvider>,
    conversation: Conversation,
    strategy: Box<dyn ContextStrategy>,
    max_tokens: u32,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn ChatProvider>, system_prompt: &str) -> Self {
        Self {
            provider,
            conversation: Conversation::new(system_prompt),
            strategy: Box::new(SuffixWindowStrategy::default()),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ContextStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn provider(&self) -> &dyn ChatProvider {
        self.provider.as_ref()
    }

    /// Run one turn.
    ///
    /// The user message stays in history whatever happens. The reply is
    /// appended only for [`TurnOutcome::Reply`]; a failed turn leaves
    /// nothing of the reply behind.
    pub async fn send(
        &mut self,
        input: &str,
        sink: &mut dyn StreamSink,
    ) -> Result<TurnOutcome, TurnError> {
        self.conversation.append(Role::User, input);

        let prepared = self.strategy.prepare(&self.conversation, self.max_tokens)?;
        log::debug!(
            "Sending {} messages (~{} of {} tokens, {} dropped)",
            prepared.messages.len(),
            prepared.total_tokens,
            prepared.budget_limit,
            prepared.dropped_messages
        );

        let messages = prepared.into_messages();
        let lines = self.provider.chat_stream(&messages).await?;
        let decoded = decode_stream(lines, sink).await?;
        let outcome = decoded.into_outcome();

        match &outcome {
            TurnOutcome::Reply { role, content } => {
                self.conversation.append(role.clone(), content.as_str());
            }
            TurnOutcome::AdvisoryOnly => {
                log::info!("Reply contained only reasoning, nothing added to history");
            }
            TurnOutcome::Empty => {
                log::debug!("Received empty response from API");
            }
        }

        Ok(outcome)
    }
}
