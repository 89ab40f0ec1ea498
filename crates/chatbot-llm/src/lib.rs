pub mod error;
pub mod provider;
pub mod providers;
pub mod session;
pub mod stream;
pub mod types;

pub use error::{LLMError, TurnError};
pub use provider::{ChatProvider, LineStream};
pub use providers::OpenAICompatProvider;
pub use session::ChatSession;
pub use stream::{
    decode_lines, decode_stream, DecodedTurn, DecoderState, LineOutcome, StreamDecoder,
    StreamSignal, StreamSink, TurnOutcome,
};
