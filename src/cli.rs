//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use promptline::build_info::HELP_BUILD_METADATA;

/// A line-oriented command console for the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "promptline",
    disable_version_flag = true,
    after_help = HELP_BUILD_METADATA
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (default: ./promptline.toml or
    /// ~/.config/promptline/promptline.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Capture the mouse so clicks move the caret.
    #[arg(long = "mouse")]
    pub mouse: bool,

    /// Name reported by `!whoami` and the command base state.
    #[arg(short = 'u', long = "username")]
    pub username: Option<String>,

    /// Append diagnostics to this file (filter with PROMPTLINE_LOG).
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Write the session transcript as JSON on exit.
    #[arg(long = "transcript", value_name = "PATH")]
    pub transcript: Option<String>,

    /// Print version and build metadata.
    #[arg(short = 'V', long = "version")]
    pub version: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the default config to ~/.config/promptline/promptline.toml.
    Init {
        /// Replace an existing file, keeping a timestamped backup.
        #[arg(long)]
        force: bool,
    },
}
