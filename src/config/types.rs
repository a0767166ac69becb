//! Configuration data model.
//!
//! This module holds struct definitions plus default values. Loader and
//! source-resolution logic lives in `config::mod` so precedence behavior
//! stays centralized.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::console::settings::{DEFAULT_CONTINUED_PROMPT_LABEL, DEFAULT_PROMPT_LABEL};
use crate::console::Operation;

use super::defaults::DEFAULT_USERNAME;

/// Top-level runtime configuration, mirroring `promptline.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub prompt: PromptConfig,
    pub behavior: BehaviorConfig,
    pub keys: KeysConfig,
    pub display: DisplayConfig,
    pub shell: ShellConfig,
}

/// `[prompt]`: labels and the welcome banner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptConfig {
    pub label: String,
    /// Label used while a multi-line entry is in progress.
    pub continued_label: String,
    pub welcome_message: Option<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_PROMPT_LABEL.to_string(),
            continued_label: DEFAULT_CONTINUED_PROMPT_LABEL.to_string(),
            welcome_message: None,
        }
    }
}

/// `[behavior]`: focus, reset, and history recall switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub autofocus: bool,
    pub fade_on_reset: bool,
    pub history_preserve_column: bool,
}

/// `[keys]`: chord overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Ctrl+letter bindings, e.g. `w = "move-to-previous-word"`.
    pub ctrl: BTreeMap<String, Operation>,
}

/// `[display]`: terminal presentation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    /// Capture the mouse so clicks move the caret.
    pub mouse: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            mouse: false,
        }
    }
}

/// `[shell]`: built-in shell identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellConfig {
    pub username: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
        }
    }
}

/// Non-fatal findings collected while loading config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Dotted paths of keys the loader does not recognize.
    pub unknown_keys: Vec<String>,
}

/// Configuration payload plus load-time diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub diagnostics: ConfigDiagnostics,
}

/// Result of explicit global config initialization (`promptline init`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalConfigInitResult {
    Created {
        path: std::path::PathBuf,
    },
    AlreadyInitialized {
        path: std::path::PathBuf,
    },
    Overwritten {
        path: std::path::PathBuf,
        backup_path: std::path::PathBuf,
    },
}
