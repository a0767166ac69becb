//! Per-submission session record shared with command handlers.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Input mode the shell was in when a line arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellMode {
    #[default]
    Command,
    Continuation,
}

/// What a handler knows about the line it is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseState {
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub username: String,
    /// The full submitted line.
    pub line: String,
    /// Leading `!command` token, empty for plain text.
    pub command: String,
    /// The line with the command token removed.
    pub strip_command: String,
    pub mode: ShellMode,
}

impl BaseState {
    pub fn for_line(line: &str, username: &str, mode: ShellMode) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|delta| delta.as_secs())
            .unwrap_or(0);
        Self::at(timestamp, line, username, mode)
    }

    fn at(timestamp: u64, line: &str, username: &str, mode: ShellMode) -> Self {
        let trimmed = line.trim_start();
        let (command, strip_command) = if trimmed.starts_with('!') {
            match trimmed.split_once(char::is_whitespace) {
                Some((command, rest)) => (command.to_string(), rest.trim().to_string()),
                None => (trimmed.to_string(), String::new()),
            }
        } else {
            (String::new(), line.trim().to_string())
        };
        Self {
            timestamp,
            username: username.to_string(),
            line: line.to_string(),
            command,
            strip_command,
            mode,
        }
    }

    /// Pretty JSON lines for display.
    pub fn display_lines(&self) -> Vec<String> {
        serde_json::to_string_pretty(self)
            .map(|json| json.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
