//! Terminal host for the console.
//!
//! Key translation, layout math, and painting are split out so the session
//! loop in `host` only sequences events, effects, and redraws.

pub mod host;
pub mod keys;
mod layout;
mod paint;
pub mod settings;

pub use host::{apply_shell_requests, drain_settlements, run_session, HostOptions};
pub use keys::key_input_from_event;
