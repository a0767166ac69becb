//! Config-path helpers and default config initialization.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};
use super::GlobalConfigInitResult;

/// Per-user config path (`~/.config/promptline/promptline.toml`).
pub fn default_global_config_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Write the bundled template to the per-user config path.
///
/// Without `force` an existing file is left alone. With `force` the existing
/// file is first copied to a timestamped backup beside it.
pub fn initialize_default_global_config(
    force: bool,
) -> Result<GlobalConfigInitResult, ConfigError> {
    let path = default_global_config_path().ok_or_else(|| {
        ConfigError::Invalid("unable to resolve a config directory for promptline".to_string())
    })?;
    initialize_config_at_path(&path, force)
}

pub(super) fn initialize_config_at_path(
    path: &Path,
    force: bool,
) -> Result<GlobalConfigInitResult, ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if path.exists() {
        if !force {
            return Ok(GlobalConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        let backup_path = timestamped_backup_path(path);
        std::fs::copy(path, &backup_path)?;
        std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        return Ok(GlobalConfigInitResult::Overwritten {
            path: path.to_path_buf(),
            backup_path,
        });
    }

    // create_new so a concurrent writer is never clobbered.
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())?;
            Ok(GlobalConfigInitResult::Created {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(GlobalConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

fn timestamped_backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    for suffix in 0..1000usize {
        let candidate_name = if suffix == 0 {
            format!("{file_name}.{timestamp}.bak")
        } else {
            format!("{file_name}.{timestamp}.{suffix}.bak")
        };
        let candidate = path.with_file_name(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
    }
    path.with_file_name(format!(
        "{file_name}.{timestamp}.{}.bak",
        std::process::id()
    ))
}

/// Base config directory: `$XDG_CONFIG_HOME`, then `~/.config`, then the
/// platform config dir.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "promptline-init-{tag}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn init_creates_then_reports_existing_file() {
        let dir = scratch_dir("create");
        let path = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);

        let first = initialize_config_at_path(&path, false).expect("create");
        assert_eq!(first, GlobalConfigInitResult::Created { path: path.clone() });
        let written = std::fs::read_to_string(&path).expect("read");
        assert_eq!(written, DEFAULT_CONFIG_TEMPLATE);

        let second = initialize_config_at_path(&path, false).expect("second");
        assert_eq!(
            second,
            GlobalConfigInitResult::AlreadyInitialized { path: path.clone() }
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn forced_init_backs_up_existing_file() {
        let dir = scratch_dir("force");
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[prompt]\nlabel = \"$ \"\n").expect("seed");

        let result = initialize_config_at_path(&path, true).expect("force");
        let GlobalConfigInitResult::Overwritten { backup_path, .. } = result else {
            panic!("expected overwrite, got {result:?}");
        };
        let backup = std::fs::read_to_string(&backup_path).expect("backup");
        assert!(backup.contains("label = \"$ \""));
        let current = std::fs::read_to_string(&path).expect("current");
        assert_eq!(current, DEFAULT_CONFIG_TEMPLATE);
        let _ = std::fs::remove_dir_all(dir);
    }
}
