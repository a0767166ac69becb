//! Default configuration constants and the bundled template.

/// Embedded default `promptline.toml` written by `promptline init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/promptline.toml");
/// Config directory and file names under the config root.
pub(super) const CONFIG_DIR_NAME: &str = "promptline";
pub(super) const CONFIG_FILE_NAME: &str = "promptline.toml";
/// Name the built-in shell reports when none is configured.
pub(super) const DEFAULT_USERNAME: &str = "guest";

/// Recognized keys per table; anything else is reported as unknown.
pub(super) const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("prompt", &["label", "continued_label", "welcome_message"]),
    (
        "behavior",
        &["autofocus", "fade_on_reset", "history_preserve_column"],
    ),
    ("keys", &["ctrl"]),
    ("display", &["color", "mouse"]),
    ("shell", &["username"]),
];
