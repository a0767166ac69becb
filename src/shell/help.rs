//! Canned text for help, keyboard reference, and unknown commands.

use super::commands::SHELL_COMMANDS;

const KEYBOARD: [(&str, &str); 14] = [
    ("Enter", "run the line"),
    ("Shift+Enter", "new line, keeping indentation"),
    ("Tab", "complete a !command"),
    ("Up / Ctrl+P", "previous history entry"),
    ("Down / Ctrl+N", "next history entry"),
    ("Left / Ctrl+B", "back one character"),
    ("Right / Ctrl+F", "forward one character"),
    ("Home / Ctrl+A", "start of line"),
    ("End / Ctrl+E", "end of line"),
    ("Delete / Ctrl+D", "delete forward"),
    ("Ctrl+K", "delete to end of line"),
    ("Ctrl+U", "clear the line"),
    ("Ctrl+L", "clear the screen"),
    ("Alt+F / Alt+B / Alt+D", "next word, previous word, delete word"),
];

/// Grouped command help, one line per entry.
pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Get Started".to_string(), "===========".to_string()];
    lines.extend(
        SHELL_COMMANDS
            .iter()
            .map(|cmd| format!("{:<16}{}", cmd.usage, cmd.description)),
    );
    lines.push(String::new());
    lines.push("Anything without a leading ! is echoed back.".to_string());
    lines
}

/// Key chord reference.
pub fn keyboard_lines() -> Vec<String> {
    let mut lines = vec!["Keyboard".to_string(), "========".to_string()];
    lines.extend(
        KEYBOARD
            .iter()
            .map(|(chord, action)| format!("{chord:<24}{action}")),
    );
    lines.push("Ctrl+C cancels a running command.".to_string());
    lines
}

/// Response for a bang command nobody handles.
pub fn not_found_lines(command: &str) -> Vec<String> {
    vec![
        format!("I'm sorry, but I couldn't find the command \"{command}\"."),
        "Here are some things you can try:".to_string(),
        "1. Check the spelling of your command.".to_string(),
        "2. Type !help to see a list of available commands.".to_string(),
        "3. If you think this is a bug, please report it to the developers.".to_string(),
    ]
}
