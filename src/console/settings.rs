//! Centralized markup classes and fixed strings for the console widget.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Prompt labels
// ---------------------------------------------------------------------------

pub const DEFAULT_PROMPT_LABEL: &str = "> ";
pub const DEFAULT_CONTINUED_PROMPT_LABEL: &str = "> ";

// ---------------------------------------------------------------------------
// Markup classes
// ---------------------------------------------------------------------------

pub const CLASS_CURSOR: &str = "console-cursor";
pub const CLASS_BEFORE: &str = "before";
pub const CLASS_AFTER: &str = "after";
pub const CLASS_PROMPT_BOX: &str = "console-prompt-box";
pub const CLASS_PROMPT_LABEL: &str = "console-prompt-label";
pub const CLASS_PROMPT: &str = "console-prompt";
pub const CLASS_MESSAGE: &str = "console-message";
pub const CLASS_WELCOME: &str = "console-welcome";
pub const CLASS_ERROR: &str = "console-message-error";
pub const CLASS_SUCCESS: &str = "console-message-success";
pub const CLASS_SUGGESTIONS: &str = "console-suggestions";
pub const CLASS_SYSTEM_PROMPT: &str = "system_prompt";
pub const CLASS_INNER: &str = "console-inner";
pub const CLASS_FOCUS: &str = "console-focus";
pub const CLASS_NOFOCUS: &str = "console-nofocus";

/// Caret with no char under it.
pub const CURSOR_EMPTY: &str = "<span class=\"console-cursor\">&nbsp;</span>";

// ---------------------------------------------------------------------------
// Fixed text
// ---------------------------------------------------------------------------

pub const COMMAND_FAILED: &str = "Command failed.";
pub const SUGGESTIONS_LABEL: &str = "system=>";

// ---------------------------------------------------------------------------
// Timing / pointer offsets
// ---------------------------------------------------------------------------

/// Delay before pasted text can be read back from the input surface.
pub const PASTE_SETTLE: Duration = Duration::from_millis(200);
/// Second autofocus attempt, to survive layout races.
pub const AUTOFOCUS_RETRY: Duration = Duration::from_millis(100);
/// Offset of the hidden input from the pointer while it moves.
pub const POINTER_TRAIL_OFFSET: i32 = 30;
/// Offset of the hidden input from the pointer on paste / context menu.
pub const POINTER_GRAB_OFFSET: i32 = -13;
