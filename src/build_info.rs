//! Compile-time build metadata.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_COMMIT: &str = env!("PROMPTLINE_BUILD_GIT_HASH");
pub const BUILD_TIMESTAMP: &str = env!("PROMPTLINE_BUILD_TIMESTAMP");

/// Trailer for `promptline --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("PROMPTLINE_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("PROMPTLINE_BUILD_TIMESTAMP")
);

/// One-line build summary logged at startup.
pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

/// Text printed by `promptline --version`.
pub fn cli_version_text() -> String {
    format!("promptline {VERSION}\ncommit: {GIT_COMMIT}\nbuilt: {BUILD_TIMESTAMP}")
}
