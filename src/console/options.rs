//! Construction-time options for a console instance.

use crate::console::keymap::Operation;
use crate::console::settings;
use std::collections::BTreeMap;

/// Behavior switches and labels recognized by `Console::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Label before the editable line.
    pub prompt_label: String,
    /// Label used while continuation mode is on.
    pub continued_prompt_label: String,
    /// Rendered once at construction and kept across resets.
    pub welcome_message: Option<String>,
    /// Focus immediately and once more shortly after.
    pub autofocus: bool,
    /// Ask the host to animate resets.
    pub fade_on_reset: bool,
    /// Keep the cursor column when recalling history where possible.
    pub history_preserve_column: bool,
    /// Ctrl-chord additions/overrides merged into the default table.
    pub ctrl_codes: BTreeMap<char, Operation>,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            prompt_label: settings::DEFAULT_PROMPT_LABEL.to_string(),
            continued_prompt_label: settings::DEFAULT_CONTINUED_PROMPT_LABEL.to_string(),
            welcome_message: None,
            autofocus: false,
            fade_on_reset: false,
            history_preserve_column: false,
            ctrl_codes: BTreeMap::new(),
        }
    }
}
