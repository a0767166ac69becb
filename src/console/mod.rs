//! Embeddable prompt console.
//!
//! `Console` owns the edit line, history ring, and transcript; a host feeds it
//! key presses, pastes, and clicks, renders its transcript/markup, and applies
//! the `Effect`s it queues. Commands are executed through `ConsoleHooks`.

pub mod buffer;
pub mod history;
pub mod hooks;
pub mod keymap;
pub mod markup;
pub mod options;
pub mod pointer;
pub mod settings;
pub mod transcript;
mod widget;

pub use buffer::EditBuffer;
pub use history::{HistoryRing, Recall};
pub use hooks::{CommandOutcome, ConsoleHooks, Reply, Ticket, Validation};
pub use keymap::{Dispatch, Key, KeyInput, Keymap, Modifiers, Operation};
pub use markup::{decode_html, filled_text, html_encode, render_prompt};
pub use options::ConsoleOptions;
pub use pointer::{Point, PointerScope, PointerTracker};
pub use transcript::{Block, Entry, Transcript};
pub use widget::{ClickTarget, Console, Effect, InputState, PendingPaste};
