//! Configuration loading from TOML files and environment variables.
//!
//! Precedence, highest first:
//! 1. `PROMPTLINE_PROMPT`, `PROMPTLINE_WELCOME`, `PROMPTLINE_PRESERVE_COLUMN`
//! 2. TOML file named by `--config`
//! 3. `./promptline.toml`
//! 4. `$XDG_CONFIG_HOME/promptline/promptline.toml` (or `~/.config/...`)
//! 5. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::console::ConsoleOptions;
use crate::error::ConfigError;

mod defaults;
mod env;
mod init;
mod sources;
mod types;

use defaults::KNOWN_KEYS;
use env::apply_runtime_env_overrides;
pub use init::{config_root_dir, default_global_config_path, initialize_default_global_config};
use sources::read_config_text_with_sources;
pub use types::{
    BehaviorConfig, Config, ConfigDiagnostics, DisplayConfig, GlobalConfigInitResult, KeysConfig,
    LoadedConfig, PromptConfig, ShellConfig,
};

/// Chord reserved for cancelling a running command.
const RESERVED_CTRL: char = 'c';

/// Load configuration from disk and environment, reporting unknown keys.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config_with_diagnostics(
    path_override: Option<&str>,
) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text_with_sources(path_override, &read_file, &config_root)?;
    debug!(source = %source.describe(), "config source resolved");

    let table: toml::Table = toml::from_str(&text)?;
    let mut diagnostics = ConfigDiagnostics::default();
    collect_unknown_keys(&table, &mut diagnostics);

    let mut config: Config = toml::Value::Table(table).try_into()?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    config.validate()?;

    Ok(LoadedConfig {
        config,
        diagnostics,
    })
}

fn collect_unknown_keys(table: &toml::Table, diagnostics: &mut ConfigDiagnostics) {
    for (section, value) in table {
        let Some((_, known)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
            diagnostics.unknown_keys.push(section.clone());
            continue;
        };
        let Some(inner) = value.as_table() else {
            continue;
        };
        for key in inner.keys() {
            if !known.contains(&key.as_str()) {
                diagnostics.unknown_keys.push(format!("{section}.{key}"));
            }
        }
    }
}

impl Config {
    /// Reject values the console cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.username.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "shell.username must not be empty".to_string(),
            ));
        }
        self.ctrl_codes().map(|_| ())
    }

    /// Console construction options derived from this config.
    pub fn console_options(&self) -> Result<ConsoleOptions, ConfigError> {
        Ok(ConsoleOptions {
            prompt_label: self.prompt.label.clone(),
            continued_prompt_label: self.prompt.continued_label.clone(),
            welcome_message: self.prompt.welcome_message.clone(),
            autofocus: self.behavior.autofocus,
            fade_on_reset: self.behavior.fade_on_reset,
            history_preserve_column: self.behavior.history_preserve_column,
            ctrl_codes: self.ctrl_codes()?,
        })
    }

    fn ctrl_codes(&self) -> Result<BTreeMap<char, crate::console::Operation>, ConfigError> {
        let mut codes = BTreeMap::new();
        for (key, op) in &self.keys.ctrl {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => ch.to_ascii_lowercase(),
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "keys.ctrl.{key}: expected a single letter"
                    )))
                }
            };
            if ch == RESERVED_CTRL {
                return Err(ConfigError::Invalid(format!(
                    "keys.ctrl.{key}: Ctrl+C is reserved for cancel"
                )));
            }
            codes.insert(ch, *op);
        }
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Operation;
    use std::collections::BTreeMap;

    fn load_with(
        path_override: Option<&str>,
        files: &[(&str, &str)],
        env: &[(&str, &str)],
    ) -> Result<LoadedConfig, ConfigError> {
        let files: BTreeMap<PathBuf, String> = files
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect();
        let env: BTreeMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from_sources(
            path_override,
            |path| {
                files.get(path).cloned().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing")
                })
            },
            |name| env.get(name).cloned(),
            || Some(PathBuf::from("/cfg")),
        )
    }

    #[test]
    fn defaults_are_sensible() {
        let c = Config::default();
        assert_eq!(c.prompt.label, "> ");
        assert_eq!(c.prompt.continued_label, "> ");
        assert!(c.prompt.welcome_message.is_none());
        assert!(!c.behavior.autofocus);
        assert!(!c.behavior.history_preserve_column);
        assert!(c.display.color);
        assert!(!c.display.mouse);
        assert_eq!(c.shell.username, "guest");
        assert_eq!(c.console_options().unwrap(), ConsoleOptions::default());
    }

    #[test]
    fn bundled_template_matches_defaults() {
        let loaded = load_with(Some("t.toml"), &[("t.toml", defaults::DEFAULT_CONFIG_TEMPLATE)], &[])
            .unwrap();
        assert_eq!(loaded.config, Config::default());
        assert!(loaded.diagnostics.unknown_keys.is_empty());
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let loaded = load_with(None, &[], &[]).unwrap();
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_with(Some("nope.toml"), &[], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn local_file_beats_global_file() {
        let loaded = load_with(
            None,
            &[
                ("promptline.toml", "[prompt]\nlabel = \"local> \"\n"),
                (
                    "/cfg/promptline/promptline.toml",
                    "[prompt]\nlabel = \"global> \"\n",
                ),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(loaded.config.prompt.label, "local> ");
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let loaded = load_with(
            None,
            &[(
                "/cfg/promptline/promptline.toml",
                "[shell]\nusername = \"ada\"\n",
            )],
            &[],
        )
        .unwrap();
        assert_eq!(loaded.config.shell.username, "ada");
    }

    #[test]
    fn env_overrides_file_values() {
        let loaded = load_with(
            Some("p.toml"),
            &[("p.toml", "[prompt]\nlabel = \"file> \"\nwelcome_message = \"hi\"\n")],
            &[
                ("PROMPTLINE_PROMPT", "env> "),
                ("PROMPTLINE_WELCOME", ""),
                ("PROMPTLINE_PRESERVE_COLUMN", "yes"),
            ],
        )
        .unwrap();
        assert_eq!(loaded.config.prompt.label, "env> ");
        assert!(loaded.config.prompt.welcome_message.is_none());
        assert!(loaded.config.behavior.history_preserve_column);
    }

    #[test]
    fn invalid_env_flag_is_rejected() {
        let err = load_with(None, &[], &[("PROMPTLINE_PRESERVE_COLUMN", "sometimes")])
            .unwrap_err();
        assert!(err.to_string().contains("PROMPTLINE_PRESERVE_COLUMN"));
    }

    #[test]
    fn unknown_keys_are_reported_not_fatal() {
        let loaded = load_with(
            Some("p.toml"),
            &[(
                "p.toml",
                "theme = \"dark\"\n[prompt]\nlabel = \"$ \"\ncolour = 1\n[display]\ncolor = false\n",
            )],
            &[],
        )
        .unwrap();
        assert_eq!(
            loaded.diagnostics.unknown_keys,
            vec!["prompt.colour".to_string(), "theme".to_string()]
        );
        assert!(!loaded.config.display.color);
    }

    #[test]
    fn ctrl_overrides_become_console_options() {
        let loaded = load_with(
            Some("p.toml"),
            &[("p.toml", "[keys.ctrl]\nW = \"move-to-previous-word\"\n")],
            &[],
        )
        .unwrap();
        let options = loaded.config.console_options().unwrap();
        assert_eq!(
            options.ctrl_codes.get(&'w'),
            Some(&Operation::MoveToPreviousWord)
        );
    }

    #[test]
    fn bad_ctrl_keys_are_rejected() {
        for text in [
            "[keys.ctrl]\nww = \"move-to-start\"\n",
            "[keys.ctrl]\nc = \"move-to-start\"\n",
            "[keys.ctrl]\n1 = \"move-to-start\"\n",
        ] {
            let err = load_with(Some("p.toml"), &[("p.toml", text)], &[]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
        }
    }

    #[test]
    fn unknown_operation_is_a_parse_error() {
        let err = load_with(
            Some("p.toml"),
            &[("p.toml", "[keys.ctrl]\nw = \"teleport\"\n")],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn blank_username_is_rejected() {
        let err = load_with(
            Some("p.toml"),
            &[("p.toml", "[shell]\nusername = \"  \"\n")],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
