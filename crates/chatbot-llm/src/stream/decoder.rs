//! Incremental decoder for a streamed chat completion.
//!
//! Lines go in one at a time. Visible output goes out through a
//! [`StreamSink`] as soon as it is decoded. Only the content text is
//! accumulated; reasoning text is shown but never kept.

use chatbot_core::Role;
use futures_util::{Stream, StreamExt};

use crate::error::LLMError;
use crate::providers::common::openai_compat::{
    parse_stream_event, DONE_SENTINEL, SSE_DATA_PREFIX,
};
use crate::types::StreamDelta;

/// What the sink is told while a reply streams in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSignal<'a> {
    /// A reasoning block begins.
    ReasoningStart,
    Reasoning(&'a str),
    /// A content block begins, emitted once per block.
    ContentStart,
    Content(&'a str),
    /// Boundary between a reasoning block and a content block.
    Separator,
}

/// Receives visible output in the order it is decoded.
pub trait StreamSink {
    fn emit(&mut self, signal: StreamSignal<'_>);
}

impl<F> StreamSink for F
where
    F: FnMut(StreamSignal<'_>),
{
    fn emit(&mut self, signal: StreamSignal<'_>) {
        self(signal)
    }
}

/// Which kind of text the stream is currently producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Idle,
    Reasoning,
    Content,
    /// The termination sentinel was seen.
    Done,
    /// The transport failed. Nothing from this turn may be kept.
    Failed,
}

impl DecoderState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DecoderState::Done | DecoderState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    /// No further lines will be looked at.
    Finished,
}

#[derive(Debug)]
pub struct StreamDecoder {
    state: DecoderState,
    role: Role,
    content: String,
    reasoning_emitted: bool,
    content_block_open: bool,
    malformed_events: usize,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Idle,
            role: Role::Assistant,
            content: String::new(),
            reasoning_emitted: false,
            content_block_open: false,
            malformed_events: 0,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Content accumulated so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether anything has been shown for this turn.
    pub fn output_emitted(&self) -> bool {
        self.reasoning_emitted || !self.content.is_empty()
    }

    /// Feed one line of the response body.
    ///
    /// Lines without the `data: ` prefix are ignored. Payloads that fail to
    /// parse are counted and skipped.
    pub fn feed_line(&mut self, line: &str, sink: &mut dyn StreamSink) -> LineOutcome {
        if self.state.is_terminal() {
            return LineOutcome::Finished;
        }

        let Some(data) = line.strip_prefix(SSE_DATA_PREFIX) else {
            return LineOutcome::Continue;
        };

        if data.trim() == DONE_SENTINEL {
            self.state = DecoderState::Done;
            return LineOutcome::Finished;
        }

        match parse_stream_event(data) {
            Ok(Some(delta)) => self.apply(&delta, sink),
            Ok(None) => {}
            Err(err) => {
                self.malformed_events += 1;
                log::warn!("Skipping malformed stream event: {} (data: {})", err, data);
            }
        }

        LineOutcome::Continue
    }

    fn apply(&mut self, delta: &StreamDelta, sink: &mut dyn StreamSink) {
        if let Some(role) = delta.role() {
            self.role = Role::from(role);
        }

        if let Some(reasoning) = delta.reasoning() {
            if self.state != DecoderState::Reasoning {
                if self.content_block_open {
                    sink.emit(StreamSignal::Separator);
                }
                sink.emit(StreamSignal::ReasoningStart);
                self.state = DecoderState::Reasoning;
                self.reasoning_emitted = true;
                // a content block after this reasoning gets its own start signal
                self.content_block_open = false;
            }
            sink.emit(StreamSignal::Reasoning(reasoning));
        }

        if let Some(content) = delta.content() {
            if self.state == DecoderState::Reasoning {
                sink.emit(StreamSignal::Separator);
            }
            self.state = DecoderState::Content;
            if !self.content_block_open {
                sink.emit(StreamSignal::ContentStart);
                self.content_block_open = true;
            }
            sink.emit(StreamSignal::Content(content));
            self.content.push_str(content);
        }
    }

    /// Mark the stream as broken. Accumulated content is discarded.
    pub fn fail(&mut self) {
        self.state = DecoderState::Failed;
        self.content.clear();
    }

    /// Close a stream that ended cleanly, with or without the sentinel.
    pub fn finish(self) -> DecodedTurn {
        if self.malformed_events > 0 {
            log::warn!(
                "{} malformed stream event(s) were skipped",
                self.malformed_events
            );
        }

        DecodedTurn {
            role: self.role,
            content: self.content,
            reasoning_emitted: self.reasoning_emitted,
            saw_done: self.state == DecoderState::Done,
            malformed_events: self.malformed_events,
        }
    }
}

/// Everything a cleanly ended stream produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTurn {
    /// Last role the stream reported, `assistant` if none
    pub role: Role,
    pub content: String,
    pub reasoning_emitted: bool,
    /// Whether the termination sentinel was seen
    pub saw_done: bool,
    pub malformed_events: usize,
}

/// How a turn resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The reply to add to history.
    Reply { role: Role, content: String },
    /// Only reasoning arrived; nothing is kept.
    AdvisoryOnly,
    /// Neither reasoning nor content arrived.
    Empty,
}

impl DecodedTurn {
    pub fn into_outcome(self) -> TurnOutcome {
        if !self.content.is_empty() {
            TurnOutcome::Reply {
                role: self.role,
                content: self.content,
            }
        } else if self.reasoning_emitted {
            TurnOutcome::AdvisoryOnly
        } else {
            TurnOutcome::Empty
        }
    }
}

fn transport_failure(
    decoder: &mut StreamDecoder,
    source: std::io::Error,
) -> LLMError {
    let output_emitted = decoder.output_emitted();
    decoder.fail();
    log::error!("Error reading stream: {}", source);
    LLMError::TransportRead {
        source,
        output_emitted,
    }
}

/// Decode a whole stream from an iterator of lines.
pub fn decode_lines<I, S>(lines: I, sink: &mut dyn StreamSink) -> Result<DecodedTurn, LLMError>
where
    I: IntoIterator<Item = std::io::Result<S>>,
    S: AsRef<str>,
{
    let mut decoder = StreamDecoder::new();
    for line in lines {
        let line = line.map_err(|err| transport_failure(&mut decoder, err))?;
        if decoder.feed_line(line.as_ref(), sink) == LineOutcome::Finished {
            break;
        }
    }
    Ok(decoder.finish())
}

/// Decode a whole stream as lines arrive.
///
/// Output reaches `sink` before the next line is awaited.
pub async fn decode_stream<L>(mut lines: L, sink: &mut dyn StreamSink) -> Result<DecodedTurn, LLMError>
where
    L: Stream<Item = std::io::Result<String>> + Unpin,
{
    let mut decoder = StreamDecoder::new();
    while let Some(line) = lines.next().await {
        let line = line.map_err(|err| transport_failure(&mut decoder, err))?;
        if decoder.feed_line(&line, sink) == LineOutcome::Finished {
            break;
        }
    }
    Ok(decoder.finish())
}
