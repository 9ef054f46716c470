//! One terminal chat session: a composer, its pending log and a sender.
//!
//! SYSTEM CONTEXT
//! ==============
//! The CLI plays the part of the browser form. Each stdin line replaces the
//! input text and re-arms the draft deadline; a tokio sleep on that deadline
//! stands in for the browser timer. Sends are awaited inline, so the
//! terminal never has more than one in flight.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::io::Write;
use std::time::Duration;

use compose::{Composer, DraftKey, KeyValueStore, PendingMessages, SendOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;

use crate::CliError;
use crate::sender::MessageSender;

/// Millisecond clock anchored at session start.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn instant_at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

/// A line typed in compose mode.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ComposeInput {
    Text(String),
    Send,
    Channel(String),
    Show,
    Quit,
}

/// Interpret one compose-mode line. Literal `\n` sequences in text become
/// newlines so multi-line messages can be typed on one line.
pub(crate) fn parse_compose_line(line: &str) -> ComposeInput {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed {
        "/send" => ComposeInput::Send,
        "/quit" => ComposeInput::Quit,
        "/show" => ComposeInput::Show,
        _ => match trimmed.strip_prefix("/channel ") {
            Some(id) if !id.trim().is_empty() => ComposeInput::Channel(id.trim().to_owned()),
            _ => ComposeInput::Text(trimmed.replace("\\n", "\n")),
        },
    }
}

/// Datetime stamped on optimistic messages.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn datetime_now() -> Result<String, time::error::Format> {
    time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339)
}

pub struct Session<S, M> {
    composer: Composer<S>,
    pending: PendingMessages,
    sender: M,
    clock: Clock,
}

impl<S: KeyValueStore, M: MessageSender> Session<S, M> {
    pub fn new(composer: Composer<S>, sender: M) -> Self {
        Self {
            composer,
            pending: PendingMessages::new(),
            sender,
            clock: Clock::start(),
        }
    }

    pub fn composer_mut(&mut self) -> &mut Composer<S> {
        &mut self.composer
    }

    /// Replace the input text, scheduling a debounced draft save.
    pub fn edit(&mut self, text: impl Into<String>) {
        let now = self.clock.now_ms();
        self.composer.edit(text, now);
    }

    /// Send the current input. Returns `None` when the input is empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local timestamp cannot be produced; send
    /// failures are reported through [`SendOutcome::Failed`].
    pub async fn submit(&mut self) -> Result<Option<SendOutcome>, CliError> {
        let datetime = datetime_now()?;
        let Some(ticket) = self.composer.begin_submit(&mut self.pending, datetime) else {
            return Ok(None);
        };
        tracing::info!(
            user_id = %ticket.key.user_id,
            channel_id = %ticket.key.channel_id,
            pending = self.pending.len(),
            "sending message"
        );
        let result = self.sender.post_message(&ticket.variables).await;
        Ok(Some(self.composer.complete(&mut self.pending, &ticket, result)))
    }

    /// Drive the interactive loop until `/quit` or end of input, then
    /// persist any draft still waiting on its debounce deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `input` or writing `out` fails.
    pub async fn run_compose<R, W>(&mut self, input: R, out: &mut W) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(out, "draft: {}", self.composer.input())?;

        loop {
            let deadline = self.composer.draft_due_at();
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match parse_compose_line(&line) {
                        ComposeInput::Text(text) => self.edit(text),
                        ComposeInput::Show => writeln!(out, "draft: {}", self.composer.input())?,
                        ComposeInput::Channel(channel_id) => {
                            let user_id = self.composer.key().user_id.clone();
                            self.composer.select(DraftKey::new(user_id, channel_id));
                            writeln!(out, "draft: {}", self.composer.input())?;
                        }
                        ComposeInput::Send => {
                            let outcome = self.submit().await?;
                            report_outcome(out, outcome.as_ref())?;
                        }
                        ComposeInput::Quit => break,
                    }
                }
                () = sleep_until_due(self.clock, deadline) => {
                    self.composer.flush_due(self.clock.now_ms());
                }
            }
        }

        self.composer.flush_now();
        Ok(())
    }
}

async fn sleep_until_due(clock: Clock, deadline: Option<u64>) {
    match deadline {
        Some(ms) => tokio::time::sleep_until(clock.instant_at(ms)).await,
        None => std::future::pending().await,
    }
}

/// Print a send outcome for compose mode.
///
/// # Errors
///
/// Returns an error if writing fails or the pending snapshot cannot be
/// serialized.
pub fn report_outcome<W: Write>(out: &mut W, outcome: Option<&SendOutcome>) -> Result<(), CliError> {
    match outcome {
        None => writeln!(out, "nothing to send")?,
        Some(SendOutcome::Delivered(posted)) => {
            writeln!(out, "sent: {}", serde_json::to_string(posted)?)?;
        }
        Some(SendOutcome::Failed { error, pending }) => {
            writeln!(out, "send failed: {error}")?;
            writeln!(out, "pending: {}", serde_json::to_string(pending)?)?;
        }
    }
    Ok(())
}
