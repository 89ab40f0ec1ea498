//! OpenAI-compatible request serialization and stream event parsing.
//!
//! The request body carries only `role` and `content` for each message; local
//! bookkeeping such as `created_at` never goes on the wire.

use chatbot_core::Message;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::StreamDelta;

/// Prefix of every SSE line that carries an event payload.
pub const SSE_DATA_PREFIX: &str = "data: ";

/// Payload that marks the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Convert messages to an OpenAI-compatible JSON array.
pub fn messages_to_openai_compat_json(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            json!({
                "role": m.role().as_str(),
                "content": m.content(),
            })
        })
        .collect()
}

/// Build a streaming chat request body.
pub fn build_openai_compat_body(model: &str, messages: &[Message]) -> Value {
    json!({
        "model": model,
        "messages": messages_to_openai_compat_json(messages),
        "stream": true,
    })
}

#[derive(Debug, Deserialize)]
pub struct OpenAICompatStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAICompatChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAICompatChoice {
    #[serde(default)]
    delta: OpenAICompatDelta,
}

#[derive(Debug, Deserialize, Default)]
struct OpenAICompatDelta {
    role: Option<String>,
    content: Option<String>,
    reasoning_content: Option<String>,
}

impl OpenAICompatStreamChunk {
    pub fn into_delta(self) -> Option<StreamDelta> {
        let choice = self.choices.into_iter().next()?;
        Some(StreamDelta {
            role: choice.delta.role,
            reasoning: choice.delta.reasoning_content,
            content: choice.delta.content,
        })
    }
}

/// Parse one event payload.
///
/// Returns `Ok(None)` for well-formed events without choices. Only the first
/// choice is looked at.
pub fn parse_stream_event(data: &str) -> Result<Option<StreamDelta>, serde_json::Error> {
    let chunk: OpenAICompatStreamChunk = serde_json::from_str(data)?;
    Ok(chunk.into_delta())
}
