//! Environment overrides applied after the config file is parsed.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_PROMPT: &str = "PROMPTLINE_PROMPT";
pub(super) const ENV_WELCOME: &str = "PROMPTLINE_WELCOME";
pub(super) const ENV_PRESERVE_COLUMN: &str = "PROMPTLINE_PRESERVE_COLUMN";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(label) = env_lookup(ENV_PROMPT) {
        config.prompt.label = label;
    }
    if let Some(welcome) = env_lookup(ENV_WELCOME) {
        // An empty value switches the banner off.
        config.prompt.welcome_message = (!welcome.is_empty()).then_some(welcome);
    }
    if let Some(raw) = env_lookup(ENV_PRESERVE_COLUMN) {
        config.behavior.history_preserve_column = parse_flag(&raw).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "invalid {ENV_PRESERVE_COLUMN} value `{raw}`: expected true/false"
            ))
        })?;
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
