//! promptline: an interactive command-line console.
//!
//! [`console::Console`] is the host-independent line editor: it owns the
//! edit buffer, history, transcript and key dispatch, and reaches the
//! embedding application through [`console::ConsoleHooks`]. [`shell::Shell`]
//! is the built-in `!command` handler and [`tui`] drives a console on a real
//! terminal.
//!
//! ```no_run
//! use promptline::console::{Console, ConsoleOptions};
//! use promptline::shell::Shell;
//! use promptline::tui::{run_session, HostOptions};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let mut console = Console::new(ConsoleOptions::default());
//! let (mut shell, mut done) = Shell::new("guest", runtime.handle().clone());
//! run_session(&mut console, &mut shell, &mut done, HostOptions::default()).unwrap();
//! ```

pub mod build_info;
pub mod config;
pub mod console;
pub mod error;
pub mod shell;
pub mod tui;
