use async_trait::async_trait;
use chatbot_core::Message;
use futures::Stream;
use std::pin::Pin;

pub use crate::error::{LLMError, Result};

/// Raw lines of a streamed response body, newline stripped.
///
/// An `Err` item means the transport failed mid-stream.
pub type LineStream = Pin<Box<dyn Stream<Item = std::io::Result<String>> + Send>>;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Model name sent with every request.
    fn model(&self) -> &str;

    /// Send `messages` as one streaming chat request.
    ///
    /// Resolves once response headers are in; a non-success status is an
    /// error. The body is returned unparsed, line by line.
    async fn chat_stream(&self, messages: &[Message]) -> Result<LineStream>;

    /// Fetch the raw model listing.
    async fn list_models(&self) -> Result<String>;
}
