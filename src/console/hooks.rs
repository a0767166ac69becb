//! Caller-supplied behavior plugged into the console.
//!
//! The console never interprets a submitted line itself. It hands the text
//! to `ConsoleHooks::handle_command` and renders whatever comes back, either
//! immediately (`Reply::Done`) or later through `Console::settle`.

use crate::console::keymap::KeyInput;

/// Result of running one submitted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Success, with an optional message.
    Ok(Option<String>),
    /// Success with several result lines, rendered one message each.
    OkList(Vec<String>),
    /// Failure; `None` renders the fixed failure text.
    Fail(Option<String>),
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self::Ok(None)
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::Ok(Some(text.into()))
    }

    pub fn fail() -> Self {
        Self::Fail(None)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

/// Identifies one submission awaiting a deferred outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// How a handler answered a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The command finished synchronously.
    Done(CommandOutcome),
    /// The handler kept the ticket and will settle it later.
    Deferred,
}

/// Answer from the pre-submit validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accept,
    Reject(String),
}

/// Callbacks the console invokes while processing input.
///
/// Only `handle_command` is required; the rest default to "not configured".
pub trait ConsoleHooks {
    /// Execute a submitted line.
    fn handle_command(&mut self, text: &str, ticket: Ticket) -> Reply;

    /// Gate a line before it is submitted.
    fn validate_command(&mut self, _text: &str) -> Validation {
        Validation::Accept
    }

    /// Synchronous completion provider.
    ///
    /// `None` means no provider is configured and `issue_complete` runs
    /// instead. Candidates are suffixes appended to the current line.
    fn complete(&mut self, _text: &str) -> Option<Vec<String>> {
        None
    }

    /// Fallback completion request when `complete` is not configured.
    fn issue_complete(&mut self, _text: &str) {}

    /// Decide whether a printable keystroke is inserted.
    fn allow_char_insert(&mut self, _ch: char, _current: &str) -> bool {
        true
    }

    /// Ctrl+C. Cooperative; the console state is untouched.
    fn cancel(&mut self) {}

    /// Observe every non-ignored key press.
    fn on_keydown(&mut self, _input: &KeyInput) {}
}
