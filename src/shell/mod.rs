//! Built-in bang-command shell driving a `Console`.
//!
//! `Shell` is the reference `ConsoleHooks` implementation: bang commands
//! (`!help`, `!history`, `!sleep`, ...) plus a plain-text echo fallback.
//! Long-running commands settle through a channel the host polls; anything
//! that must touch the console itself is queued as a `ShellRequest`.

pub mod base;
pub mod commands;
pub mod help;

use crate::console::{CommandOutcome, ConsoleHooks, Reply, Ticket, Validation};
use base::{BaseState, ShellMode};
use commands::{completion_suffixes, parse_shell_command, ShellAction};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Final text of a `!sleep` interrupted by Ctrl+C.
pub const CANCELLED: &str = "Command cancelled.";

const SLEEP_USAGE: &str = "usage: !sleep <secs>";
const MAX_SLEEP_SECS: f64 = 3600.0;

/// Outcome of a deferred command, delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub ticket: Ticket,
    pub outcome: CommandOutcome,
}

/// Console mutations the host applies after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRequest {
    ClearHistory,
    ListHistory,
    EnterContinuation,
    ExitContinuation,
}

/// An in-flight deferred command.
struct ActiveTask {
    ticket: Ticket,
    cancel_tx: watch::Sender<bool>,
}

pub struct Shell {
    username: String,
    runtime: Handle,
    done_tx: mpsc::UnboundedSender<Settlement>,
    active: Vec<ActiveTask>,
    requests: Vec<ShellRequest>,
    mode: ShellMode,
    last_base: Option<BaseState>,
}

impl Shell {
    /// Build a shell that spawns deferred work on `runtime`.
    ///
    /// The receiver yields settlements for `Console::settle`.
    pub fn new(
        username: impl Into<String>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<Settlement>) {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let shell = Self {
            username: username.into(),
            runtime,
            done_tx,
            active: Vec::new(),
            requests: Vec::new(),
            mode: ShellMode::Command,
            last_base: None,
        };
        (shell, done_rx)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn mode(&self) -> ShellMode {
        self.mode
    }

    /// Session record of the most recent submission.
    pub fn last_base(&self) -> Option<&BaseState> {
        self.last_base.as_ref()
    }

    /// Drain queued console mutations.
    pub fn take_requests(&mut self) -> Vec<ShellRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Number of deferred commands still running.
    pub fn running(&mut self) -> usize {
        self.active.retain(|task| !task.cancel_tx.is_closed());
        self.active.len()
    }

    fn dispatch(&mut self, line: &str, ticket: Ticket) -> Reply {
        let Some(action) = parse_shell_command(line) else {
            return Reply::Done(CommandOutcome::message(format!("you said: {}", line.trim())));
        };

        match action {
            ShellAction::Help => Reply::Done(CommandOutcome::OkList(help::help_lines())),
            ShellAction::Keyboard => Reply::Done(CommandOutcome::OkList(help::keyboard_lines())),
            ShellAction::History => {
                self.requests.push(ShellRequest::ListHistory);
                Reply::Done(CommandOutcome::ok())
            }
            ShellAction::Clear => {
                self.requests.push(ShellRequest::ClearHistory);
                Reply::Done(CommandOutcome::message("History cleared."))
            }
            ShellAction::Echo(text) => Reply::Done(CommandOutcome::Ok(Some(text))),
            ShellAction::Fail(reason) => Reply::Done(CommandOutcome::Fail(reason)),
            ShellAction::Sleep(arg) => match arg.as_deref().and_then(parse_sleep_secs) {
                Some(duration) => self.spawn_sleep(duration, ticket),
                None => Reply::Done(CommandOutcome::Fail(Some(SLEEP_USAGE.to_string()))),
            },
            ShellAction::Multi => {
                self.mode = ShellMode::Continuation;
                self.requests.push(ShellRequest::EnterContinuation);
                Reply::Done(CommandOutcome::message(
                    "Multi-line entry; finish with !end.",
                ))
            }
            ShellAction::End => Reply::Done(CommandOutcome::Fail(Some(
                "!end only finishes a !multi entry.".to_string(),
            ))),
            ShellAction::WhoAmI => {
                let lines = self
                    .last_base
                    .as_ref()
                    .map(BaseState::display_lines)
                    .unwrap_or_default();
                Reply::Done(CommandOutcome::OkList(lines))
            }
            ShellAction::Unknown(command) => {
                debug!(%command, "unknown shell command");
                Reply::Done(CommandOutcome::OkList(help::not_found_lines(&command)))
            }
        }
    }

    /// In continuation mode `text` is every line so far; only `!end` acts.
    fn continue_entry(&mut self, text: &str) -> Reply {
        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.last().map(|line| line.trim()) != Some("!end") {
            return Reply::Done(CommandOutcome::ok());
        }
        lines.pop();
        self.mode = ShellMode::Command;
        self.requests.push(ShellRequest::ExitContinuation);
        info!(lines = lines.len(), "finished multi-line entry");
        let mut output = vec![format!("Entry of {} line(s):", lines.len())];
        output.extend(lines.into_iter().map(|line| format!("  {line}")));
        Reply::Done(CommandOutcome::OkList(output))
    }

    fn spawn_sleep(&mut self, duration: Duration, ticket: Ticket) -> Reply {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        self.active.push(ActiveTask { ticket, cancel_tx });
        let done_tx = self.done_tx.clone();
        debug!(ticket = ticket.id(), ?duration, "spawning deferred sleep");

        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                _ = tokio::time::sleep(duration) => CommandOutcome::message(format!(
                    "Slept for {:.1} seconds.",
                    duration.as_secs_f64()
                )),
                _ = wait_for_cancellation(&mut cancel_rx) => {
                    CommandOutcome::Fail(Some(CANCELLED.to_string()))
                }
            };
            let _ = done_tx.send(Settlement { ticket, outcome });
        });
        Reply::Deferred
    }
}

impl ConsoleHooks for Shell {
    fn handle_command(&mut self, text: &str, ticket: Ticket) -> Reply {
        self.last_base = Some(BaseState::for_line(text, &self.username, self.mode));
        match self.mode {
            ShellMode::Continuation => self.continue_entry(text),
            ShellMode::Command => self.dispatch(text, ticket),
        }
    }

    fn validate_command(&mut self, text: &str) -> Validation {
        if self.mode == ShellMode::Command {
            if let Some(ShellAction::Sleep(arg)) = parse_shell_command(text) {
                if arg.as_deref().and_then(parse_sleep_secs).is_none() {
                    return Validation::Reject(SLEEP_USAGE.to_string());
                }
            }
        }
        Validation::Accept
    }

    fn complete(&mut self, text: &str) -> Option<Vec<String>> {
        Some(completion_suffixes(text))
    }

    fn cancel(&mut self) {
        self.active.retain(|task| !task.cancel_tx.is_closed());
        for task in &self.active {
            debug!(ticket = task.ticket.id(), "cancelling deferred command");
            let _ = task.cancel_tx.send(true);
        }
    }
}

/// Wait for cancellation signal state change (or return immediately if set).
async fn wait_for_cancellation(cancel_rx: &mut watch::Receiver<bool>) {
    if *cancel_rx.borrow() {
        return;
    }
    let _ = cancel_rx.changed().await;
}

fn parse_sleep_secs(arg: &str) -> Option<Duration> {
    let secs = arg.parse::<f64>().ok()?;
    if !secs.is_finite() || !(0.0..=MAX_SLEEP_SECS).contains(&secs) {
        return None;
    }
    Some(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: u64) -> Ticket {
        Ticket(id)
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime")
    }

    fn outcome(reply: Reply) -> CommandOutcome {
        match reply {
            Reply::Done(outcome) => outcome,
            Reply::Deferred => panic!("expected a synchronous reply"),
        }
    }

    #[test]
    fn plain_text_is_echoed() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        assert_eq!(
            outcome(shell.handle_command("hello there", ticket(1))),
            CommandOutcome::message("you said: hello there")
        );
    }

    #[test]
    fn unknown_command_gets_not_found_text() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        let CommandOutcome::OkList(lines) = outcome(shell.handle_command("!map oz", ticket(1)))
        else {
            panic!("expected list");
        };
        assert!(lines[0].contains("\"!map\""));
    }

    #[test]
    fn history_and_clear_queue_requests() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        shell.handle_command("!history", ticket(1));
        shell.handle_command("!clear", ticket(2));
        assert_eq!(
            shell.take_requests(),
            vec![ShellRequest::ListHistory, ShellRequest::ClearHistory]
        );
        assert!(shell.take_requests().is_empty());
    }

    #[test]
    fn multi_entry_collects_until_end() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        shell.handle_command("!multi", ticket(1));
        assert_eq!(shell.mode(), ShellMode::Continuation);
        assert_eq!(
            outcome(shell.handle_command("one", ticket(2))),
            CommandOutcome::ok()
        );
        let CommandOutcome::OkList(lines) =
            outcome(shell.handle_command("one\ntwo\n!end", ticket(3)))
        else {
            panic!("expected list");
        };
        assert_eq!(lines, vec!["Entry of 2 line(s):", "  one", "  two"]);
        assert_eq!(shell.mode(), ShellMode::Command);
        assert_eq!(
            shell.take_requests(),
            vec![
                ShellRequest::EnterContinuation,
                ShellRequest::ExitContinuation
            ]
        );
    }

    #[test]
    fn whoami_reports_current_line() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        let CommandOutcome::OkList(lines) = outcome(shell.handle_command("!whoami", ticket(1)))
        else {
            panic!("expected list");
        };
        assert!(lines.iter().any(|line| line.contains("\"username\": \"kim\"")));
        assert!(lines.iter().any(|line| line.contains("\"command\": \"!whoami\"")));
    }

    #[test]
    fn invalid_sleep_is_rejected_before_submit() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        assert_eq!(
            shell.validate_command("!sleep soon"),
            Validation::Reject(SLEEP_USAGE.to_string())
        );
        assert_eq!(shell.validate_command("!sleep 0.5"), Validation::Accept);
        assert_eq!(shell.validate_command("hello"), Validation::Accept);
    }

    #[test]
    fn completion_offers_command_suffixes() {
        let rt = runtime();
        let (mut shell, _rx) = Shell::new("kim", rt.handle().clone());
        assert_eq!(shell.complete("!wh"), Some(vec!["oami".to_string()]));
    }

    #[test]
    fn sleep_settles_through_channel() {
        let rt = runtime();
        let (mut shell, mut rx) = Shell::new("kim", rt.handle().clone());
        assert_eq!(shell.handle_command("!sleep 0", ticket(5)), Reply::Deferred);
        let settlement = rt.block_on(rx.recv()).expect("settlement");
        assert_eq!(settlement.ticket, ticket(5));
        assert!(!settlement.outcome.is_failure());
    }

    #[test]
    fn cancel_interrupts_sleep() {
        let rt = runtime();
        let (mut shell, mut rx) = Shell::new("kim", rt.handle().clone());
        assert_eq!(shell.handle_command("!sleep 600", ticket(9)), Reply::Deferred);
        assert_eq!(shell.running(), 1);
        shell.cancel();
        let settlement = rt.block_on(rx.recv()).expect("settlement");
        assert_eq!(
            settlement,
            Settlement {
                ticket: ticket(9),
                outcome: CommandOutcome::Fail(Some(CANCELLED.to_string())),
            }
        );
    }
}
