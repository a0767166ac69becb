//! End-to-end editing, history, and submit flows through the public API.

use promptline::console::{
    settings, Block, CommandOutcome, Console, ConsoleHooks, ConsoleOptions, Key, KeyInput, Reply,
    Ticket,
};

/// Hooks that record submissions and answer from a fixed reply.
struct Scripted {
    reply: Reply,
    submitted: Vec<String>,
    tickets: Vec<Ticket>,
}

impl Scripted {
    fn answering(reply: Reply) -> Self {
        Self {
            reply,
            submitted: Vec::new(),
            tickets: Vec::new(),
        }
    }
}

impl ConsoleHooks for Scripted {
    fn handle_command(&mut self, text: &str, ticket: Ticket) -> Reply {
        self.submitted.push(text.to_string());
        self.tickets.push(ticket);
        self.reply.clone()
    }
}

fn type_text(console: &mut Console, hooks: &mut Scripted, text: &str) {
    for ch in text.chars() {
        console.handle_key(KeyInput::plain(Key::Char(ch)), hooks);
    }
}

fn press(console: &mut Console, hooks: &mut Scripted, key: Key) {
    console.handle_key(KeyInput::plain(key), hooks);
}

fn messages(console: &Console) -> Vec<(String, Option<String>)> {
    console
        .transcript()
        .entries()
        .iter()
        .filter_map(|entry| match &entry.block {
            Block::Message { text, class } => Some((text.clone(), class.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn up_and_down_walk_history_and_restore_the_draft() {
    let mut console = Console::new(ConsoleOptions::default());
    let mut hooks = Scripted::answering(Reply::Done(CommandOutcome::ok()));
    console.add_to_history("ls");
    console.add_to_history("pwd");

    press(&mut console, &mut hooks, Key::Up);
    assert_eq!(console.prompt_text(), "pwd");
    assert_eq!(console.cursor(), 3);
    assert_eq!(console.history_cursor(), 1);

    press(&mut console, &mut hooks, Key::Up);
    assert_eq!(console.prompt_text(), "ls");
    assert_eq!(console.cursor(), 2);
    assert_eq!(console.history_cursor(), 2);

    press(&mut console, &mut hooks, Key::Down);
    press(&mut console, &mut hooks, Key::Down);
    assert_eq!(console.prompt_text(), "");
    assert_eq!(console.history_cursor(), 0);
}

#[test]
fn typed_draft_survives_a_trip_through_history() {
    let mut console = Console::new(ConsoleOptions::default());
    let mut hooks = Scripted::answering(Reply::Done(CommandOutcome::ok()));
    console.add_to_history("make test");
    type_text(&mut console, &mut hooks, "git st");

    press(&mut console, &mut hooks, Key::Up);
    assert_eq!(console.prompt_text(), "make test");
    press(&mut console, &mut hooks, Key::Down);
    assert_eq!(console.prompt_text(), "git st");
}

#[test]
fn bang_reference_submits_and_records_the_resolved_entry() {
    let mut console = Console::new(ConsoleOptions::default());
    let mut hooks = Scripted::answering(Reply::Done(CommandOutcome::ok()));
    console.add_to_history("echo a");
    console.add_to_history("echo b");

    type_text(&mut console, &mut hooks, "!1");
    press(&mut console, &mut hooks, Key::Enter);
    assert_eq!(hooks.submitted, vec!["echo b".to_string()]);
    assert_eq!(console.history().entries().last().map(String::as_str), Some("echo b"));
    assert!(!console.history().entries().iter().any(|e| e == "!1"));

    type_text(&mut console, &mut hooks, "!9");
    press(&mut console, &mut hooks, Key::Enter);
    assert_eq!(hooks.submitted[1], "echo b");
}

#[test]
fn failing_handler_renders_error_and_reopens_the_prompt() {
    let mut console = Console::new(ConsoleOptions::default());
    let mut hooks = Scripted::answering(Reply::Done(CommandOutcome::fail()));
    type_text(&mut console, &mut hooks, "explode");
    press(&mut console, &mut hooks, Key::Enter);

    assert!(console.is_input_enabled());
    assert_eq!(console.prompt_text(), "");
    assert_eq!(
        messages(&console),
        vec![(
            settings::COMMAND_FAILED.to_string(),
            Some(settings::CLASS_ERROR.to_string())
        )]
    );
}

#[test]
fn deferred_command_blocks_typing_until_settled() {
    let mut console = Console::new(ConsoleOptions::default());
    let mut hooks = Scripted::answering(Reply::Deferred);
    type_text(&mut console, &mut hooks, "slow");
    press(&mut console, &mut hooks, Key::Enter);
    assert!(!console.is_input_enabled());

    type_text(&mut console, &mut hooks, "x");
    assert_eq!(console.prompt_text(), "slow");

    let ticket = hooks.tickets[0];
    assert!(console.settle(ticket, CommandOutcome::message("done")));
    assert!(console.is_input_enabled());
    assert!(!console.settle(ticket, CommandOutcome::message("again")));
    assert_eq!(
        messages(&console),
        vec![("done".to_string(), Some(settings::CLASS_SUCCESS.to_string()))]
    );
}

#[test]
fn word_motion_and_kill_to_end_follow_the_line_editor_rules() {
    let mut console = Console::new(ConsoleOptions::default());
    console.set_prompt_text("ab  cd");
    console.move_to_start();
    console.move_to_next_word();
    assert_eq!(console.cursor(), 2);
    console.move_to_next_word();
    assert_eq!(console.cursor(), 6);

    console.set_prompt_text("hello");
    console.move_to_start();
    console.move_by(2);
    console.delete_to_end();
    assert_eq!(console.prompt_text(), "he");
    assert_eq!(console.cursor(), 2);
}

#[test]
fn rendered_prompt_has_a_single_caret() {
    let mut console = Console::new(ConsoleOptions::default());
    let mut hooks = Scripted::answering(Reply::Done(CommandOutcome::ok()));
    type_text(&mut console, &mut hooks, "a <b>");
    press(&mut console, &mut hooks, Key::Left);

    let markup = console.prompt_markup();
    assert_eq!(markup.matches(settings::CLASS_CURSOR).count(), 1);
    assert!(markup.contains("&lt;b"));
    assert!(console.to_html().contains(markup));
}
