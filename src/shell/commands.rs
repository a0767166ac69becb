//! Bang-command metadata and parsing.

/// Static command metadata used by parsing, help, and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellCommand {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Built-in shell commands.
pub const SHELL_COMMANDS: [ShellCommand; 10] = [
    ShellCommand {
        name: "!help",
        usage: "!help",
        description: "show the help.",
    },
    ShellCommand {
        name: "!keyboard",
        usage: "!keyboard",
        description: "for how to use the prompt.",
    },
    ShellCommand {
        name: "!history",
        usage: "!history",
        description: "of entries; recall one with !N.",
    },
    ShellCommand {
        name: "!clear",
        usage: "!clear",
        description: "forgets the history.",
    },
    ShellCommand {
        name: "!echo",
        usage: "!echo <text>",
        description: "prints its arguments.",
    },
    ShellCommand {
        name: "!fail",
        usage: "!fail [reason]",
        description: "always fails.",
    },
    ShellCommand {
        name: "!sleep",
        usage: "!sleep <secs>",
        description: "waits in the background; Ctrl+C cancels.",
    },
    ShellCommand {
        name: "!multi",
        usage: "!multi",
        description: "starts a multi-line entry.",
    },
    ShellCommand {
        name: "!end",
        usage: "!end",
        description: "finishes a multi-line entry.",
    },
    ShellCommand {
        name: "!whoami",
        usage: "!whoami",
        description: "shows the session record.",
    },
];

/// Parsed shell actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    Help,
    Keyboard,
    History,
    Clear,
    Echo(String),
    Fail(Option<String>),
    Sleep(Option<String>),
    Multi,
    End,
    WhoAmI,
    Unknown(String),
}

/// Parse a bang command from a submitted line.
///
/// Returns `None` if the line is not a bang command.
pub fn parse_shell_command(input: &str) -> Option<ShellAction> {
    let trimmed = input.trim();
    if !trimmed.starts_with('!') {
        return None;
    }

    let token = trimmed
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    let rest = trimmed[token.len()..].trim();
    let rest_opt = (!rest.is_empty()).then(|| rest.to_string());

    let action = match token.as_str() {
        "!" | "!help" => ShellAction::Help,
        "!keyboard" => ShellAction::Keyboard,
        "!history" => ShellAction::History,
        "!clear" => ShellAction::Clear,
        "!echo" => ShellAction::Echo(rest.to_string()),
        "!fail" => ShellAction::Fail(rest_opt),
        "!sleep" => ShellAction::Sleep(trimmed.split_whitespace().nth(1).map(str::to_string)),
        "!multi" => ShellAction::Multi,
        "!end" => ShellAction::End,
        "!whoami" => ShellAction::WhoAmI,
        other => ShellAction::Unknown(other.to_string()),
    };

    Some(action)
}

/// Return commands whose name starts with the first token of `input`.
pub fn matching_shell_commands(input: &str) -> Vec<ShellCommand> {
    if !input.starts_with('!') {
        return Vec::new();
    }

    let prefix = input
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    SHELL_COMMANDS
        .iter()
        .copied()
        .filter(|cmd| cmd.name.starts_with(prefix.as_str()))
        .collect()
}

/// Completion suffixes for a partially typed command name.
///
/// Only a lone command token completes; once arguments start there is
/// nothing to offer.
pub fn completion_suffixes(input: &str) -> Vec<String> {
    if input.contains(char::is_whitespace) {
        return Vec::new();
    }
    matching_shell_commands(input)
        .into_iter()
        .filter_map(|cmd| cmd.name.get(input.len()..))
        .map(str::to_string)
        .collect()
}
