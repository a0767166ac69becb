//! CLI entry point for promptline.

mod cli;

use clap::Parser;
use promptline::build_info;
use promptline::config::{
    initialize_default_global_config, load_config_with_diagnostics, GlobalConfigInitResult,
};
use promptline::console::Console;
use promptline::error::HostError;
use promptline::shell::Shell;
use promptline::tui::{run_session, HostOptions};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter directive.
const LOG_FILTER_ENV: &str = "PROMPTLINE_LOG";

fn main() {
    let args = cli::Args::parse();

    if args.version {
        println!("{}", build_info::cli_version_text());
        return;
    }

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("warning: logging disabled: {e}");
    }

    let result = match &args.command {
        Some(cli::Command::Init { force }) => run_init(*force),
        None => run(&args),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Install a fmt subscriber writing to `--log-file`, or to stderr when only
/// `PROMPTLINE_LOG` is set. Nothing is logged otherwise.
fn init_logging(log_file: Option<&str>) -> std::io::Result<()> {
    let filter_from_env = std::env::var(LOG_FILTER_ENV).ok();
    let filter = || {
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None if filter_from_env.is_some() => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .try_init();
        }
        None => {}
    }
    Ok(())
}

fn run_init(force: bool) -> Result<(), HostError> {
    match initialize_default_global_config(force)? {
        GlobalConfigInitResult::Created { path } => {
            println!("Wrote default config to {}", path.display());
        }
        GlobalConfigInitResult::AlreadyInitialized { path } => {
            println!(
                "Config already exists at {} (use --force to replace it)",
                path.display()
            );
        }
        GlobalConfigInitResult::Overwritten { path, backup_path } => {
            println!(
                "Replaced {} (previous file saved as {})",
                path.display(),
                backup_path.display()
            );
        }
    }
    Ok(())
}

fn run(args: &cli::Args) -> Result<(), HostError> {
    info!(build = %build_info::startup_metadata_line(), "starting promptline");

    let loaded = load_config_with_diagnostics(args.config.as_deref())?;
    for key in &loaded.diagnostics.unknown_keys {
        warn!(key = %key, "ignoring unknown config key");
    }
    let mut config = loaded.config;
    if args.no_color {
        config.display.color = false;
    }
    if args.mouse {
        config.display.mouse = true;
    }
    if let Some(username) = &args.username {
        config.shell.username = username.clone();
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let mut console = Console::new(config.console_options()?);
    let (mut shell, mut settlements) =
        Shell::new(config.shell.username.clone(), runtime.handle().clone());
    let options = HostOptions {
        color: config.display.color,
        mouse: config.display.mouse,
    };
    let outcome = run_session(&mut console, &mut shell, &mut settlements, options);

    // Persist whatever was seen, even when the session ended on an error.
    if let Some(path) = &args.transcript {
        let json = serde_json::to_string_pretty(console.transcript())?;
        std::fs::write(path, json)?;
        info!(path = %path, "transcript written");
    }
    runtime.shutdown_background();
    outcome
}
