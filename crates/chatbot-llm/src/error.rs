use chatbot_core::BudgetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The response body failed mid-stream. `output_emitted` tells the caller
    /// whether part of the reply was already shown.
    #[error("error reading stream: {source}")]
    TransportRead {
        source: std::io::Error,
        output_emitted: bool,
    },
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// Why a chat turn could not complete.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Budget(#[from] BudgetError),

    #[error(transparent)]
    Llm(#[from] LLMError),
}
