pub mod decoder;

pub use decoder::{
    decode_lines, decode_stream, DecodedTurn, DecoderState, LineOutcome, StreamDecoder,
    StreamSignal, StreamSink, TurnOutcome,
};
