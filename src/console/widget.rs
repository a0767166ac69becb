//! The console widget: session state, key dispatch, submit, and results.
//!
//! All transitions happen synchronously inside the event entry points
//! (`handle_key`, `finish_paste`, clicks, `settle`). The only asynchronous
//! boundary is a deferred command, which keeps input disabled until the
//! host calls `settle` with the matching ticket.

use crate::console::buffer::EditBuffer;
use crate::console::history::HistoryRing;
use crate::console::hooks::{CommandOutcome, ConsoleHooks, Reply, Ticket, Validation};
use crate::console::keymap::{Dispatch, KeyInput, Keymap, Operation};
use crate::console::markup::{decode_html, render_prompt};
use crate::console::options::ConsoleOptions;
use crate::console::pointer::{Point, PointerTracker};
use crate::console::settings;
use crate::console::transcript::{prompt_box_html, Block, Transcript};
use std::time::Duration;
use tracing::{debug, warn};

/// Whether keystrokes currently edit the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// Keystrokes edit the line.
    Accepting,
    /// A submitted command is running; edits are blocked.
    Executing,
}

/// Requests for the host surface, drained with `Console::take_effects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Give the input surface keyboard focus.
    Focus,
    /// Focus again after a delay.
    FocusLater(Duration),
    /// Scroll so the newest output and prompt are visible.
    ScrollToLatest,
    /// The transcript was cleared; `fade` asks for an animated clear.
    Reset { fade: bool },
    /// No synchronous completer; the line was handed to `issue_complete`.
    CompletionRequested(String),
}

/// Where a click on the console landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the text before the caret, at this char position.
    Before(usize),
    /// Inside the text after the caret, this many chars in.
    After(usize),
    /// Anywhere else in the document.
    Elsewhere,
}

/// A paste whose text is not readable yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPaste {
    id: u64,
    /// How long the host should wait before calling `finish_paste`.
    pub settle_after: Duration,
}

/// A single-line (optionally multi-line) prompt editor with history.
#[derive(Debug)]
pub struct Console {
    options: ConsoleOptions,
    keymap: Keymap,
    buffer: EditBuffer,
    history: HistoryRing,
    state: InputState,
    pending: Option<Ticket>,
    next_ticket: u64,
    continuation_mode: bool,
    continuation: Option<String>,
    transcript: Transcript,
    prompt_markup: String,
    effects: Vec<Effect>,
    focused: bool,
    pointer: PointerTracker,
    pending_paste: Option<u64>,
    next_paste: u64,
}

impl Console {
    pub fn new(options: ConsoleOptions) -> Self {
        let keymap = Keymap::with_ctrl_overrides(&options.ctrl_codes);
        let mut console = Self {
            options,
            keymap,
            buffer: EditBuffer::new(),
            history: HistoryRing::new(),
            state: InputState::Accepting,
            pending: None,
            next_ticket: 1,
            continuation_mode: false,
            continuation: None,
            transcript: Transcript::default(),
            prompt_markup: String::new(),
            effects: Vec::new(),
            focused: false,
            pointer: PointerTracker::default(),
            pending_paste: None,
            next_paste: 1,
        };

        if let Some(welcome) = console.options.welcome_message.clone() {
            console.transcript.push(Block::Welcome { text: welcome });
        }
        console.new_prompt();
        if console.options.autofocus {
            console.focus();
            console
                .effects
                .push(Effect::FocusLater(settings::AUTOFOCUS_RETRY));
        }
        console
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Current line text.
    pub fn prompt_text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn input_state(&self) -> InputState {
        self.state
    }

    pub fn is_input_enabled(&self) -> bool {
        self.state == InputState::Accepting
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Recall depth; `0` while showing the draft.
    pub fn history_cursor(&self) -> usize {
        self.history.cursor()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Markup of the live prompt line, caret included.
    pub fn prompt_markup(&self) -> &str {
        &self.prompt_markup
    }

    /// Label shown before the live prompt.
    pub fn prompt_label(&self) -> &str {
        if self.continuation_mode {
            &self.options.continued_prompt_label
        } else {
            &self.options.prompt_label
        }
    }

    /// Accumulated continuation text, if continuation is active.
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    pub fn continuation_mode(&self) -> bool {
        self.continuation_mode
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// The whole console as markup: transcript followed by the live prompt.
    pub fn to_html(&self) -> String {
        let focus_class = if self.focused {
            settings::CLASS_FOCUS
        } else {
            settings::CLASS_NOFOCUS
        };
        format!(
            "<div class=\"{} {focus_class}\">{}{}</div>",
            settings::CLASS_INNER,
            self.transcript.to_html(),
            prompt_box_html(self.prompt_label(), &self.prompt_markup)
        )
    }

    /// Drain pending host effects.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // -----------------------------------------------------------------------
    // Key dispatch
    // -----------------------------------------------------------------------

    /// What `input` would do, with caller ctrl overrides applied.
    pub fn resolve_key(&self, input: &KeyInput) -> Dispatch {
        self.keymap.resolve(input)
    }

    /// Process one key press. Returns `false` when the key was ignored.
    pub fn handle_key(&mut self, input: KeyInput, hooks: &mut dyn ConsoleHooks) -> bool {
        if input.is_ignorable() {
            return false;
        }
        hooks.on_keydown(&input);

        match self.keymap.resolve(&input) {
            Dispatch::Ignored => false,
            Dispatch::Cancel => {
                hooks.cancel();
                true
            }
            Dispatch::Operation(op) => {
                if self.is_input_enabled() {
                    self.apply(op, hooks);
                }
                true
            }
            Dispatch::Unbound => {
                if !self.is_input_enabled() {
                    return true;
                }
                let Some(ch) = input.printable() else {
                    return true;
                };
                if hooks.allow_char_insert(ch, self.buffer.text()) {
                    let mut utf8 = [0u8; 4];
                    self.insert(ch.encode_utf8(&mut utf8));
                }
                true
            }
        }
    }

    fn apply(&mut self, op: Operation, hooks: &mut dyn ConsoleHooks) {
        match op {
            Operation::MoveBackward => self.move_by(-1),
            Operation::MoveForward => self.move_by(1),
            Operation::PreviousHistory => self.rotate_history(-1),
            Operation::NextHistory => self.rotate_history(1),
            Operation::DeleteBackward => self.delete_backward(),
            Operation::DeleteForward => self.delete_forward(),
            Operation::MoveToStart => self.move_to_start(),
            Operation::MoveToEnd => self.move_to_end(),
            Operation::Submit => self.submit(hooks),
            Operation::NewLine => self.new_line(),
            Operation::Complete => self.complete(hooks),
            Operation::DeleteToEnd => self.delete_to_end(),
            Operation::ClearScreen => self.reset(),
            Operation::ClearLine => {
                self.set_prompt_text("");
            }
            Operation::Cancel => hooks.cancel(),
            Operation::MoveToNextWord => self.move_to_next_word(),
            Operation::MoveToPreviousWord => self.move_to_previous_word(),
            Operation::DeleteNextWord => self.delete_next_word(),
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Splice text at the cursor. The edited line becomes the recall draft.
    pub fn insert(&mut self, text: &str) {
        self.buffer.insert(text);
        self.after_edit();
    }

    pub fn delete_backward(&mut self) {
        if self.buffer.delete_backward() {
            self.after_edit();
        }
    }

    pub fn delete_forward(&mut self) {
        if self.buffer.delete_forward() {
            self.after_edit();
        }
    }

    pub fn delete_to_end(&mut self) {
        if self.buffer.delete_to_end() {
            self.after_edit();
        }
    }

    pub fn delete_next_word(&mut self) {
        if self.buffer.delete_next_word() {
            self.after_edit();
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.buffer.move_by(delta) {
            self.refresh();
        }
    }

    pub fn move_to_start(&mut self) {
        if self.buffer.move_to_start() {
            self.refresh();
        }
    }

    pub fn move_to_end(&mut self) {
        if self.buffer.move_to_end() {
            self.refresh();
        }
    }

    pub fn move_to_next_word(&mut self) {
        if self.buffer.move_to_next_word() {
            self.refresh();
        }
    }

    pub fn move_to_previous_word(&mut self) {
        if self.buffer.move_to_previous_word() {
            self.refresh();
        }
    }

    /// Insert a newline carrying over the current line's indentation.
    pub fn new_line(&mut self) {
        let indent = self.buffer.current_line_indent();
        self.insert(&format!("\n{indent}"));
    }

    /// Replace the line with decoded `markup`; the cursor moves to the end.
    pub fn set_prompt_text(&mut self, markup: &str) -> &str {
        let text = decode_html(markup);
        self.buffer.set_text(&text);
        self.refresh();
        self.buffer.text()
    }

    fn after_edit(&mut self) {
        self.history.record_edit(self.buffer.text());
        self.refresh();
    }

    /// Re-render the live prompt markup.
    fn refresh(&mut self) {
        self.prompt_markup = render_prompt(self.buffer.text(), self.buffer.cursor());
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub fn add_to_history(&mut self, line: &str) {
        self.history.add(line);
    }

    pub fn clear_history(&mut self) {
        debug!(entries = self.history.len(), "clearing console history");
        self.history.clear();
    }

    /// History entry at `index`, oldest first.
    pub fn get_history(&self, index: usize) -> Option<&str> {
        self.history.get(index)
    }

    pub fn last_command(&self) -> Option<&str> {
        self.history.last()
    }

    /// Recall through history; negative deltas step toward older entries.
    pub fn rotate_history(&mut self, delta: isize) {
        let column = self.buffer.cursor();
        let Some(text) = self.history.rotate(delta).map(str::to_string) else {
            return;
        };
        self.buffer.set_text(&text);
        let len = self.buffer.len();
        if self.options.history_preserve_column && column != 0 && column < len {
            self.buffer.set_cursor(column);
        }
        self.refresh();
    }

    // -----------------------------------------------------------------------
    // Submit and results
    // -----------------------------------------------------------------------

    /// Toggle continuation mode. Leaving it drops the accumulated text.
    pub fn set_continuation_mode(&mut self, enabled: bool) {
        self.continuation_mode = enabled;
        if !enabled {
            self.continuation = None;
        }
    }

    /// Submit the current line to `hooks.handle_command`.
    pub fn submit(&mut self, hooks: &mut dyn ConsoleHooks) {
        let line = self.buffer.text().to_string();
        if let Validation::Reject(reason) = hooks.validate_command(&line) {
            debug!(%reason, "command rejected by validator");
            self.freeze_prompt();
            self.push_message(&reason, Some(settings::CLASS_ERROR));
            self.new_prompt();
            return;
        }

        self.state = InputState::Executing;
        let resolved = match self.history.resolve_bang(&line) {
            Some(recalled) => {
                debug!(%line, %recalled, "expanded history reference");
                self.buffer.set_text(&recalled);
                self.refresh();
                recalled
            }
            None => line,
        };
        self.history.add(&resolved);

        let text = if self.continuation_mode {
            let joined = match self.continuation.take() {
                Some(previous) if !previous.is_empty() => format!("{previous}\n{resolved}"),
                _ => resolved,
            };
            self.continuation = Some(joined.clone());
            joined
        } else {
            self.continuation = None;
            resolved
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        debug!(ticket = ticket.id(), "dispatching command");

        match hooks.handle_command(&text, ticket) {
            Reply::Done(outcome) => {
                self.pending = None;
                self.command_result(Some(&outcome));
            }
            Reply::Deferred if self.continuation_mode => {
                // The next continuation line can be typed while this one runs.
                self.command_result(None);
            }
            Reply::Deferred => {}
        }
    }

    /// Deliver the outcome of a deferred command.
    ///
    /// Returns `false` for tickets that are stale or unknown.
    pub fn settle(&mut self, ticket: Ticket, outcome: CommandOutcome) -> bool {
        if self.pending != Some(ticket) {
            warn!(ticket = ticket.id(), "ignoring outcome for stale ticket");
            return false;
        }
        self.pending = None;
        debug!(
            ticket = ticket.id(),
            failed = outcome.is_failure(),
            "settling deferred command"
        );
        match self.state {
            InputState::Executing => self.command_result(Some(&outcome)),
            InputState::Accepting => {
                self.render_outcome(&outcome);
                self.effects.push(Effect::ScrollToLatest);
            }
        }
        true
    }

    /// Freeze the prompt, render `outcome`, and open a fresh prompt.
    fn command_result(&mut self, outcome: Option<&CommandOutcome>) {
        self.freeze_prompt();
        if let Some(outcome) = outcome {
            self.render_outcome(outcome);
        }
        self.new_prompt();
    }

    fn render_outcome(&mut self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::Ok(None) => {}
            CommandOutcome::Ok(Some(text)) if text.is_empty() => {}
            CommandOutcome::Ok(Some(text)) => {
                self.push_message(text, Some(settings::CLASS_SUCCESS));
            }
            CommandOutcome::OkList(items) => {
                for item in items {
                    self.push_message(item, None);
                }
            }
            CommandOutcome::Fail(reason) => {
                let text = reason
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .unwrap_or(settings::COMMAND_FAILED);
                self.push_message(text, Some(settings::CLASS_ERROR));
            }
        }
    }

    fn freeze_prompt(&mut self) {
        let label = self.prompt_label().to_string();
        self.transcript.push(Block::Prompt {
            label,
            text: self.buffer.text().to_string(),
        });
    }

    fn push_message(&mut self, text: &str, class: Option<&str>) {
        self.transcript.push(Block::Message {
            text: text.to_string(),
            class: class.map(str::to_string),
        });
    }

    /// Start a fresh, editable prompt line.
    fn new_prompt(&mut self) {
        self.buffer.clear();
        self.history.reset_recall();
        self.state = InputState::Accepting;
        self.refresh();
        self.effects.push(Effect::ScrollToLatest);
    }

    // -----------------------------------------------------------------------
    // Output and display
    // -----------------------------------------------------------------------

    /// Append a styled message to the transcript.
    pub fn message(&mut self, text: &str, class: Option<&str>) {
        self.push_message(text, class);
        self.effects.push(Effect::ScrollToLatest);
    }

    /// Render output above the prompt, keeping the line being edited.
    pub fn report(&mut self, text: &str, class: Option<&str>) {
        self.message(text, class);
    }

    /// Clear everything but the welcome message and start a fresh prompt.
    pub fn reset(&mut self) {
        self.transcript.clear_keep_welcome();
        self.effects.push(Effect::Reset {
            fade: self.options.fade_on_reset,
        });
        self.new_prompt();
        self.focus();
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.effects.push(Effect::Focus);
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Tab: ask the completer for suffixes of the current line.
    pub fn complete(&mut self, hooks: &mut dyn ConsoleHooks) {
        let prompt = self.buffer.text().to_string();
        let Some(candidates) = hooks.complete(&prompt) else {
            hooks.issue_complete(&prompt);
            self.effects.push(Effect::CompletionRequested(prompt));
            return;
        };

        match candidates.as_slice() {
            [] => {}
            [single] => {
                self.buffer.set_text(&format!("{prompt}{single}"));
                self.refresh();
            }
            _ => {
                let candidates: Vec<String> = candidates
                    .into_iter()
                    .filter(|candidate| !candidate.is_empty())
                    .collect();
                self.freeze_prompt();
                self.transcript.push(Block::Suggestions {
                    prompt: prompt.clone(),
                    candidates,
                });
                self.new_prompt();
                self.buffer.set_text(&prompt);
                self.refresh();
            }
        }
    }

    /// Take a suggestion from a rendered suggestion block.
    pub fn click_suggestion(&mut self, block_id: u64, index: usize) -> bool {
        let Some(Block::Suggestions { prompt, candidates }) = self.transcript.get(block_id) else {
            return false;
        };
        let Some(candidate) = candidates.get(index) else {
            return false;
        };
        let text = format!("{prompt}{candidate}");
        self.buffer.set_text(&text);
        self.refresh();
        self.focus();
        true
    }

    // -----------------------------------------------------------------------
    // Pointer, clicks, and paste
    // -----------------------------------------------------------------------

    pub fn pointer_moved(&mut self, x: i32, y: i32) {
        self.pointer.moved(Point { x, y });
    }

    /// Move the caret in response to a click, then focus.
    pub fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Before(position) => self.buffer.set_cursor(position),
            ClickTarget::After(offset) => {
                self.buffer.move_by(offset as isize);
            }
            ClickTarget::Elsewhere => {
                self.buffer.move_to_end();
            }
        }
        self.refresh();
        self.focus();
    }

    /// A paste started; its text becomes readable after `settle_after`.
    pub fn begin_paste(&mut self) -> PendingPaste {
        self.pointer.grab();
        let id = self.next_paste;
        self.next_paste += 1;
        self.pending_paste = Some(id);
        PendingPaste {
            id,
            settle_after: settings::PASTE_SETTLE,
        }
    }

    /// Insert the text of a settled paste. Returns `false` if it was dropped.
    pub fn finish_paste(&mut self, paste: PendingPaste, text: &str) -> bool {
        if self.pending_paste != Some(paste.id) {
            return false;
        }
        self.pending_paste = None;
        if !self.is_input_enabled() || text.is_empty() {
            return false;
        }
        self.insert(text);
        self.effects.push(Effect::ScrollToLatest);
        true
    }
}
