//! Terminal session loop driving a `Console` with the built-in `Shell`.
//!
//! The loop stays on one thread: it polls crossterm events, drains deferred
//! settlements between them, applies console effects and shell requests,
//! then repaints new transcript blocks above the live prompt.

use crate::console::{
    Block, ClickTarget, Console, ConsoleHooks, Dispatch, Effect, KeyInput, Operation, PendingPaste,
};
use crate::error::HostError;
use crate::shell::{Settlement, Shell, ShellRequest};
use crate::tui::keys::key_input_from_event;
use crate::tui::layout::{char_index_at, compute_input_layout, terminal_columns};
use crate::tui::paint::{painted_widths, suggestion_spans, write_block, write_live_prompt};
use crate::tui::settings;
use crossterm::cursor::{self, MoveTo, MoveToColumn, MoveUp};
use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, Event, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, QueueableCommand};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

/// Terminal-only presentation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostOptions {
    /// Style output with ANSI colors.
    pub color: bool,
    /// Capture the mouse so clicks position the caret.
    pub mouse: bool,
}

/// Run a console session until Ctrl+D on an empty line or end of input.
///
/// Without a terminal on stdin/stderr, lines are read from stdin and output
/// is printed as plain text.
pub fn run_session(
    console: &mut Console,
    shell: &mut Shell,
    settlements: &mut UnboundedReceiver<Settlement>,
    options: HostOptions,
) -> Result<(), HostError> {
    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return run_piped(console, shell, settlements);
    }
    run_interactive(console, shell, settlements, options)
}

/// Apply console mutations the shell queued during the last dispatch.
pub fn apply_shell_requests(console: &mut Console, shell: &mut Shell) {
    for request in shell.take_requests() {
        match request {
            ShellRequest::ClearHistory => console.clear_history(),
            ShellRequest::ListHistory => {
                let lines: Vec<String> = console
                    .history()
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(idx, entry)| format!("{idx:>4}  {entry}"))
                    .collect();
                for line in lines {
                    console.report(&line, None);
                }
            }
            ShellRequest::EnterContinuation => console.set_continuation_mode(true),
            ShellRequest::ExitContinuation => console.set_continuation_mode(false),
        }
    }
}

/// Hand every settlement that has already arrived to the console.
pub fn drain_settlements(console: &mut Console, settlements: &mut UnboundedReceiver<Settlement>) {
    while let Ok(settlement) = settlements.try_recv() {
        console.settle(settlement.ticket, settlement.outcome);
    }
}

/// Map a click inside the prompt area to a caret target.
///
/// `row`/`col` are relative to the first row of the live prompt.
pub(crate) fn click_target(
    text: &str,
    cursor: usize,
    label: &str,
    cols: usize,
    row: usize,
    col: usize,
) -> ClickTarget {
    match char_index_at(text, cols, label, row, col) {
        Some(idx) if idx < cursor => ClickTarget::Before(idx),
        Some(idx) => ClickTarget::After(idx - cursor),
        None => ClickTarget::Elsewhere,
    }
}

fn run_interactive(
    console: &mut Console,
    shell: &mut Shell,
    settlements: &mut UnboundedReceiver<Settlement>,
    options: HostOptions,
) -> Result<(), HostError> {
    let _guard = RawModeGuard::acquire(options.mouse)?;
    let _pointer = console.pointer().attach();
    let mut surface = Surface::new(options.color);
    let mut paste: Option<QueuedPaste> = None;

    loop {
        drain_settlements(console, settlements);
        if let Some(queued) = paste.take() {
            if Instant::now() >= queued.due {
                console.finish_paste(queued.token, &queued.text);
            } else {
                paste = Some(queued);
            }
        }
        apply_effects(console, &mut surface)?;
        surface.paint(console)?;

        let mut timeout = Duration::from_millis(settings::REPL_EVENT_POLL_MS);
        if let Some(queued) = &paste {
            timeout = timeout.min(queued.due.saturating_duration_since(Instant::now()));
        }
        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                let Some(input) = key_input_from_event(&key) else {
                    continue;
                };
                if is_exit_chord(&input, console) {
                    break;
                }
                console.handle_key(input, shell);
                apply_shell_requests(console, shell);
            }
            Event::Paste(text) => match paste.as_mut() {
                Some(queued) => queued.text.push_str(&text),
                None => {
                    let token = console.begin_paste();
                    paste = Some(QueuedPaste {
                        token,
                        text,
                        due: Instant::now() + token.settle_after,
                    });
                }
            },
            Event::Mouse(mouse) => handle_mouse(console, &surface, mouse)?,
            Event::FocusGained => console.focus(),
            Event::FocusLost => console.blur(),
            Event::Resize(..) => surface.invalidate(),
            _ => {}
        }
    }

    surface.finish(console)?;
    cancel_running(shell);
    info!(entries = console.transcript().len(), "console session ended");
    Ok(())
}

fn run_piped(
    console: &mut Console,
    shell: &mut Shell,
    settlements: &mut UnboundedReceiver<Settlement>,
) -> Result<(), HostError> {
    let mut out = io::stdout().lock();
    let mut printed_through = None;
    print_new_blocks(&mut out, console, &mut printed_through)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        console.set_prompt_text("");
        console.insert(&line);
        submit_line(console, shell);
        while console.pending_ticket().is_some() {
            let Some(settlement) = settlements.blocking_recv() else {
                break;
            };
            console.settle(settlement.ticket, settlement.outcome);
        }
        console.take_effects();
        print_new_blocks(&mut out, console, &mut printed_through)?;
    }
    Ok(())
}

/// Cancel deferred commands still in flight when the session ends.
fn cancel_running(shell: &mut Shell) -> usize {
    let running = shell.running();
    if running > 0 {
        info!(running, "cancelling commands left running at exit");
        shell.cancel();
    }
    running
}

fn submit_line(console: &mut Console, shell: &mut Shell) {
    console.submit(shell);
    apply_shell_requests(console, shell);
}

fn print_new_blocks<W: Write>(
    out: &mut W,
    console: &Console,
    printed_through: &mut Option<u64>,
) -> io::Result<()> {
    for entry in console.transcript().entries() {
        if printed_through.is_some_and(|id| entry.id <= id) {
            continue;
        }
        for line in entry.block.plain_lines() {
            writeln!(out, "{line}")?;
        }
        *printed_through = Some(entry.id);
    }
    out.flush()
}

/// Ctrl+D on an empty accepting line, unless the chord was rebound.
fn is_exit_chord(input: &KeyInput, console: &Console) -> bool {
    *input == KeyInput::ctrl('d')
        && console.resolve_key(input) == Dispatch::Operation(Operation::DeleteForward)
        && console.is_input_enabled()
        && console.prompt_text().is_empty()
}

fn apply_effects(console: &mut Console, surface: &mut Surface) -> io::Result<()> {
    for effect in console.take_effects() {
        match effect {
            Effect::Reset { fade } => {
                debug!(fade, "clearing terminal");
                surface.reset()?;
            }
            Effect::CompletionRequested(text) => {
                debug!(%text, "completion left to an external provider");
            }
            // The terminal keeps focus and scrolls on its own.
            Effect::Focus | Effect::FocusLater(_) | Effect::ScrollToLatest => {}
        }
    }
    Ok(())
}

fn handle_mouse(console: &mut Console, surface: &Surface, mouse: MouseEvent) -> io::Result<()> {
    match mouse.kind {
        MouseEventKind::Moved => console.pointer_moved(i32::from(mouse.column), i32::from(mouse.row)),
        MouseEventKind::Down(MouseButton::Left) => {
            let (_, caret_row) = cursor::position()?;
            let top = usize::from(caret_row).saturating_sub(surface.previous_cursor_row);
            route_click(
                console,
                &surface.scrollback,
                top,
                usize::from(mouse.row),
                usize::from(mouse.column),
                terminal_columns(),
            );
        }
        _ => {}
    }
    Ok(())
}

/// Send a click at screen (`row`, `col`) to the prompt or a suggestion row.
///
/// `top` is the screen row where the live prompt starts.
fn route_click(
    console: &mut Console,
    scrollback: &Scrollback,
    top: usize,
    row: usize,
    col: usize,
    cols: usize,
) {
    if row >= top {
        let target = click_target(
            console.prompt_text(),
            console.cursor(),
            console.prompt_label(),
            cols,
            row - top,
            col,
        );
        console.click(target);
        return;
    }
    match scrollback.suggestion_at(top - row, col, cols) {
        Some((block_id, index)) => {
            debug!(block_id, index, "suggestion clicked");
            console.click_suggestion(block_id, index);
        }
        None => console.click(ClickTarget::Elsewhere),
    }
}

/// Rows painted above the live prompt since the last screen reset.
#[derive(Debug, Default)]
struct Scrollback {
    rows: usize,
    suggestions: Vec<SuggestionRow>,
}

#[derive(Debug)]
struct SuggestionRow {
    block_id: u64,
    first_row: usize,
    row_count: usize,
    spans: Vec<(usize, usize)>,
}

impl Scrollback {
    fn record(&mut self, block_id: u64, block: &Block, cols: usize) {
        let first_row = self.rows;
        for width in painted_widths(block) {
            self.rows += wrapped_rows(width, cols);
        }
        if let Block::Suggestions { prompt, candidates } = block {
            self.suggestions.push(SuggestionRow {
                block_id,
                first_row,
                row_count: self.rows - first_row,
                spans: suggestion_spans(prompt, candidates),
            });
        }
    }

    /// Candidate under a click `rows_above` rows above the prompt (1 is the
    /// row directly above it).
    fn suggestion_at(&self, rows_above: usize, col: usize, cols: usize) -> Option<(u64, usize)> {
        let row = self.rows.checked_sub(rows_above)?;
        let hit = self
            .suggestions
            .iter()
            .rev()
            .find(|s| row >= s.first_row && row < s.first_row + s.row_count)?;
        let cell = (row - hit.first_row) * cols + col;
        let index = hit
            .spans
            .iter()
            .position(|(start, end)| (*start..*end).contains(&cell))?;
        Some((hit.block_id, index))
    }
}

fn wrapped_rows(width: usize, cols: usize) -> usize {
    if cols == 0 {
        return 1;
    }
    width.div_ceil(cols).max(1)
}

struct QueuedPaste {
    token: PendingPaste,
    text: String,
    due: Instant,
}

/// Painted state of the terminal below the last printed block.
struct Surface {
    out: io::Stderr,
    color: bool,
    printed_through: Option<u64>,
    previous_cursor_row: usize,
    last_signature: Option<String>,
    scrollback: Scrollback,
}

impl Surface {
    fn new(color: bool) -> Self {
        Self {
            out: io::stderr(),
            color,
            printed_through: None,
            previous_cursor_row: 0,
            last_signature: None,
            scrollback: Scrollback::default(),
        }
    }

    fn invalidate(&mut self) {
        self.last_signature = None;
    }

    /// Print blocks added since the last paint, then redraw the live prompt.
    fn paint(&mut self, console: &Console) -> io::Result<()> {
        let signature = render_signature(console);
        let has_new_blocks = console
            .transcript()
            .entries()
            .last()
            .is_some_and(|entry| self.printed_through.map_or(true, |id| entry.id > id));
        if !has_new_blocks && self.last_signature.as_deref() == Some(signature.as_str()) {
            return Ok(());
        }

        self.clear_prompt()?;
        let cols = terminal_columns();
        for entry in console.transcript().entries() {
            if self.printed_through.is_some_and(|id| entry.id <= id) {
                continue;
            }
            write_block(&mut self.out, &entry.block, self.color)?;
            self.scrollback.record(entry.id, &entry.block, cols);
            self.printed_through = Some(entry.id);
        }

        let label = console.prompt_label();
        let text = console.prompt_text();
        write_live_prompt(&mut self.out, label, text, self.color)?;
        let layout = compute_input_layout(text, console.cursor(), cols, label);
        let lines_to_move_up = layout
            .total_rows
            .saturating_sub(1)
            .saturating_sub(layout.cursor_row);
        if lines_to_move_up > 0 {
            self.out.queue(MoveUp(lines_to_move_up as u16))?;
        }
        self.out.queue(MoveToColumn(layout.cursor_col as u16))?;
        self.out.flush()?;

        self.previous_cursor_row = layout.cursor_row;
        self.last_signature = Some(signature);
        Ok(())
    }

    /// Clear rows previously painted for the live prompt.
    fn clear_prompt(&mut self) -> io::Result<()> {
        if self.previous_cursor_row > 0 {
            self.out.queue(MoveUp(self.previous_cursor_row as u16))?;
        }
        self.out.queue(MoveToColumn(0))?;
        self.out.queue(Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    /// Wipe the screen so the next paint starts from the top.
    fn reset(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::All))?;
        self.out.queue(MoveTo(0, 0))?;
        self.printed_through = None;
        self.previous_cursor_row = 0;
        self.last_signature = None;
        self.scrollback = Scrollback::default();
        Ok(())
    }

    /// Leave the final prompt on screen and move below it.
    fn finish(&mut self, console: &Console) -> io::Result<()> {
        self.clear_prompt()?;
        write_live_prompt(
            &mut self.out,
            console.prompt_label(),
            console.prompt_text(),
            self.color,
        )?;
        self.out.queue(crossterm::style::Print("\r\n"))?;
        self.out.flush()
    }
}

/// Build a lightweight render-state signature for redraw suppression.
fn render_signature(console: &Console) -> String {
    format!(
        "{}|{}|{}|{}",
        console.prompt_label(),
        console.prompt_text(),
        console.cursor(),
        console.is_input_enabled()
    )
}

/// Raw mode lifetime guard so terminal state is restored on any return path.
struct RawModeGuard {
    mouse: bool,
}

impl RawModeGuard {
    /// Enable raw mode plus paste/focus reporting; disabled again on drop.
    fn acquire(mouse: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { mouse };
        execute!(io::stderr(), EnableBracketedPaste, EnableFocusChange)?;
        if mouse {
            execute!(io::stderr(), EnableMouseCapture)?;
        }
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.mouse {
            let _ = execute!(io::stderr(), DisableMouseCapture);
        }
        let _ = execute!(io::stderr(), DisableBracketedPaste, DisableFocusChange);
        let _ = terminal::disable_raw_mode();
    }
}
