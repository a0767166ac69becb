//! Centralized, hardcoded settings for the terminal host.
//!
//! This is the single place to tweak prompt prefixes, polling cadence,
//! and colors.

use crate::console::settings as console;
use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

/// Prefix painted before the second and later lines of the edit buffer.
pub const PROMPT_CONTINUATION: &str = "... ";
pub const SUGGESTION_SEPARATOR: &str = "  ";

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

pub const REPL_EVENT_POLL_MS: u64 = 80;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_PROMPT_LABEL: Color = Color::White;
pub const COLOR_FROZEN_PROMPT: Color = Color::Grey;
pub const COLOR_CONTINUATION_PROMPT: Color = Color::DarkGrey;
pub const COLOR_WELCOME: Color = Color::Cyan;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_SUCCESS: Color = Color::Green;
pub const COLOR_SUGGESTION_LABEL: Color = Color::DarkYellow;
pub const COLOR_SUGGESTION: Color = Color::Yellow;

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// Foreground color for a message class, if it has one.
pub fn color_for_class(class: Option<&str>) -> Option<Color> {
    match class? {
        console::CLASS_ERROR => Some(COLOR_ERROR),
        console::CLASS_SUCCESS => Some(COLOR_SUCCESS),
        console::CLASS_WELCOME => Some(COLOR_WELCOME),
        _ => None,
    }
}
