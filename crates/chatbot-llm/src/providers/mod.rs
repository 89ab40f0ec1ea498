//! LLM Providers
//!
//! Every supported endpoint speaks the OpenAI chat completions dialect.

pub(crate) mod common;
pub mod openai;

pub use openai::OpenAICompatProvider;
