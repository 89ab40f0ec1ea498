//! Terminal output for a streaming turn.

use std::io::{self, Write};

use chatbot_llm::{StreamSignal, StreamSink, TurnError, TurnOutcome};
use colored::Colorize;

pub const REASONING_PREFIX: &str = "🤔 Reasoning: ";
pub const BOT_PREFIX: &str = "Bot: ";

/// Writes decoder signals to a terminal as they arrive.
///
/// Write failures are kept and reported by [`TerminalRenderer::finish_turn`].
pub struct TerminalRenderer<W: Write> {
    out: W,
    printed: bool,
    error: Option<io::Error>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: false,
            error: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: impl std::fmt::Display) {
        if self.error.is_some() {
            return;
        }
        let result = write!(self.out, "{}", text).and_then(|_| self.out.flush());
        if let Err(err) = result {
            self.error = Some(err);
        }
    }

    /// Close the turn: end the streamed line and report how it resolved.
    pub fn finish_turn(&mut self, result: &Result<TurnOutcome, TurnError>) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            self.printed = false;
            return Err(err);
        }

        if self.printed {
            writeln!(self.out)?;
        }

        match result {
            Ok(TurnOutcome::Reply { .. }) | Ok(TurnOutcome::AdvisoryOnly) => {}
            Ok(TurnOutcome::Empty) => {
                writeln!(self.out, "{}Received no response content.", BOT_PREFIX)?;
            }
            Err(err) => {
                writeln!(
                    self.out,
                    "{}",
                    format!("{}Error communicating with API: {}", BOT_PREFIX, err).red()
                )?;
            }
        }

        self.printed = false;
        self.out.flush()
    }
}

impl<W: Write> StreamSink for TerminalRenderer<W> {
    fn emit(&mut self, signal: StreamSignal<'_>) {
        self.printed = true;
        match signal {
            StreamSignal::ReasoningStart => self.write(REASONING_PREFIX.dimmed()),
            StreamSignal::Reasoning(text) => self.write(text.dimmed()),
            StreamSignal::Separator => self.write('\n'),
            StreamSignal::ContentStart => self.write(BOT_PREFIX.green().bold()),
            StreamSignal::Content(text) => self.write(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbot_core::{BudgetError, Role};

    fn render(signals: &[StreamSignal<'_>], result: Result<TurnOutcome, TurnError>) -> String {
        colored::control::set_override(false);
        let mut renderer = TerminalRenderer::new(Vec::new());
        for signal in signals {
            renderer.emit(*signal);
        }
        renderer.finish_turn(&result).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    fn reply(content: &str) -> Result<TurnOutcome, TurnError> {
        Ok(TurnOutcome::Reply {
            role: Role::Assistant,
            content: content.to_string(),
        })
    }

    #[test]
    fn content_gets_bot_prefix_and_newline() {
        let out = render(
            &[
                StreamSignal::ContentStart,
                StreamSignal::Content("Hel"),
                StreamSignal::Content("lo"),
            ],
            reply("Hello"),
        );
        assert_eq!(out, "Bot: Hello\n");
    }

    #[test]
    fn reasoning_then_content_is_split_across_lines() {
        let out = render(
            &[
                StreamSignal::ReasoningStart,
                StreamSignal::Reasoning("think"),
                StreamSignal::Separator,
                StreamSignal::ContentStart,
                StreamSignal::Content("Answer"),
            ],
            reply("Answer"),
        );
        assert_eq!(out, "🤔 Reasoning: think\nBot: Answer\n");
    }

    #[test]
    fn empty_turn_prints_notice() {
        let out = render(&[], Ok(TurnOutcome::Empty));
        assert_eq!(out, "Bot: Received no response content.\n");
    }

    #[test]
    fn advisory_turn_prints_only_reasoning() {
        let out = render(
            &[StreamSignal::ReasoningStart, StreamSignal::Reasoning("hmm")],
            Ok(TurnOutcome::AdvisoryOnly),
        );
        assert_eq!(out, "🤔 Reasoning: hmm\n");
    }

    #[test]
    fn failure_after_output_ends_line_then_reports() {
        let err = TurnError::Budget(BudgetError::SystemPromptTooLarge {
            system_tokens: 30,
            max_tokens: 20,
        });
        let out = render(
            &[StreamSignal::ContentStart, StreamSignal::Content("par")],
            Err(err),
        );

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Bot: par"));
        let report = lines.next().unwrap();
        assert!(report.starts_with("Bot: Error communicating with API: budget exceeded"));
    }

    #[test]
    fn renderer_is_reusable_across_turns() {
        colored::control::set_override(false);
        let mut renderer = TerminalRenderer::new(Vec::new());

        renderer.emit(StreamSignal::ContentStart);
        renderer.emit(StreamSignal::Content("one"));
        renderer.finish_turn(&reply("one")).unwrap();
        renderer.finish_turn(&Ok(TurnOutcome::Empty)).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "Bot: one\nBot: Received no response content.\n");
    }
}
