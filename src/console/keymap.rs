//! Declarative chord tables and the precedence used to resolve them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logical key, independent of any platform key-code numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
    /// A modifier key pressed on its own.
    Control,
    Shift,
    Alt,
    Meta,
}

/// Modifier state accompanying a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

/// One normalized key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ctrl(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::CTRL)
    }

    pub fn alt(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::ALT)
    }

    pub fn shift(key: Key) -> Self {
        Self::new(key, Modifiers::SHIFT)
    }

    /// Keys that never reach the editor: bare Ctrl/Meta/Shift, Alt+Tab, Alt+`.
    pub fn is_ignorable(&self) -> bool {
        match self.key {
            Key::Control | Key::Meta | Key::Shift => true,
            Key::Tab | Key::Char('`') => self.modifiers.alt,
            _ => false,
        }
    }

    /// The char to insert for this press, if it is a printable keystroke.
    pub fn printable(&self) -> Option<char> {
        let Key::Char(ch) = self.key else {
            return None;
        };
        if self.modifiers.ctrl || self.modifiers.alt || self.modifiers.meta {
            return None;
        }
        (ch as u32 >= 32 && !ch.is_control()).then_some(ch)
    }
}

/// Every editing/history action a chord can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    MoveBackward,
    MoveForward,
    PreviousHistory,
    NextHistory,
    DeleteBackward,
    DeleteForward,
    MoveToStart,
    MoveToEnd,
    Submit,
    NewLine,
    Complete,
    DeleteToEnd,
    ClearScreen,
    ClearLine,
    Cancel,
    MoveToNextWord,
    MoveToPreviousWord,
    DeleteNextWord,
}

/// Resolution of a key press against the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Dropped before any processing.
    Ignored,
    /// Ctrl+C; fires regardless of input state.
    Cancel,
    /// A table chord.
    Operation(Operation),
    /// No chord matched; may still be a printable insert.
    Unbound,
}

/// Chord tables keyed by logical key, one per modifier class.
#[derive(Debug, Clone)]
pub struct Keymap {
    plain: BTreeMap<KeyName, Operation>,
    shift: BTreeMap<KeyName, Operation>,
    alt: BTreeMap<char, Operation>,
    ctrl: BTreeMap<char, Operation>,
}

/// Ordered stand-in for `Key` so tables stay sorted and printable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum KeyName {
    Enter,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

impl KeyName {
    fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::Enter => Self::Enter,
            Key::Tab => Self::Tab,
            Key::Backspace => Self::Backspace,
            Key::Delete => Self::Delete,
            Key::Left => Self::Left,
            Key::Right => Self::Right,
            Key::Up => Self::Up,
            Key::Down => Self::Down,
            Key::Home => Self::Home,
            Key::End => Self::End,
            _ => return None,
        })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        use Operation::*;
        let plain = BTreeMap::from([
            (KeyName::Left, MoveBackward),
            (KeyName::Right, MoveForward),
            (KeyName::Up, PreviousHistory),
            (KeyName::Down, NextHistory),
            (KeyName::Backspace, DeleteBackward),
            (KeyName::Delete, DeleteForward),
            (KeyName::End, MoveToEnd),
            (KeyName::Home, MoveToStart),
            (KeyName::Enter, Submit),
            (KeyName::Tab, Complete),
        ]);
        let shift = BTreeMap::from([(KeyName::Enter, NewLine)]);
        let alt = BTreeMap::from([
            ('f', MoveToNextWord),
            ('b', MoveToPreviousWord),
            ('d', DeleteNextWord),
        ]);
        let ctrl = BTreeMap::from([
            ('a', MoveToStart),
            ('e', MoveToEnd),
            ('d', DeleteForward),
            ('n', NextHistory),
            ('p', PreviousHistory),
            ('b', MoveBackward),
            ('f', MoveForward),
            ('k', DeleteToEnd),
            ('l', ClearScreen),
            ('u', ClearLine),
        ]);
        Self {
            plain,
            shift,
            alt,
            ctrl,
        }
    }
}

impl Keymap {
    /// Default tables with caller ctrl-chord overrides merged on top.
    pub fn with_ctrl_overrides(overrides: &BTreeMap<char, Operation>) -> Self {
        let mut keymap = Self::default();
        for (ch, op) in overrides {
            keymap.ctrl.insert(ch.to_ascii_lowercase(), *op);
        }
        keymap
    }

    /// Resolve a press: Ctrl+C, then shift, alt, ctrl, and plain tables.
    ///
    /// The first table that matches wins.
    pub fn resolve(&self, input: &KeyInput) -> Dispatch {
        if input.is_ignorable() {
            return Dispatch::Ignored;
        }
        let mods = input.modifiers;
        let letter = match input.key {
            Key::Char(ch) => Some(ch.to_ascii_lowercase()),
            _ => None,
        };
        if mods.ctrl && letter == Some('c') {
            return Dispatch::Cancel;
        }
        let named = KeyName::from_key(input.key);

        if mods.shift {
            if let Some(op) = named.and_then(|name| self.shift.get(&name)) {
                return Dispatch::Operation(*op);
            }
        }
        if mods.alt {
            if let Some(op) = letter.and_then(|ch| self.alt.get(&ch)) {
                return Dispatch::Operation(*op);
            }
        }
        if mods.ctrl {
            if let Some(op) = letter.and_then(|ch| self.ctrl.get(&ch)) {
                return Dispatch::Operation(*op);
            }
        }
        match named.and_then(|name| self.plain.get(&name)) {
            Some(op) => Dispatch::Operation(*op),
            None => Dispatch::Unbound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_documented_chords() {
        let keymap = Keymap::default();
        let cases = [
            (KeyInput::plain(Key::Left), Operation::MoveBackward),
            (KeyInput::ctrl('b'), Operation::MoveBackward),
            (KeyInput::plain(Key::Right), Operation::MoveForward),
            (KeyInput::ctrl('f'), Operation::MoveForward),
            (KeyInput::plain(Key::Up), Operation::PreviousHistory),
            (KeyInput::ctrl('p'), Operation::PreviousHistory),
            (KeyInput::plain(Key::Down), Operation::NextHistory),
            (KeyInput::ctrl('n'), Operation::NextHistory),
            (KeyInput::plain(Key::Backspace), Operation::DeleteBackward),
            (KeyInput::plain(Key::Delete), Operation::DeleteForward),
            (KeyInput::ctrl('d'), Operation::DeleteForward),
            (KeyInput::plain(Key::End), Operation::MoveToEnd),
            (KeyInput::ctrl('e'), Operation::MoveToEnd),
            (KeyInput::plain(Key::Home), Operation::MoveToStart),
            (KeyInput::ctrl('a'), Operation::MoveToStart),
            (KeyInput::plain(Key::Enter), Operation::Submit),
            (KeyInput::shift(Key::Enter), Operation::NewLine),
            (KeyInput::plain(Key::Tab), Operation::Complete),
            (KeyInput::ctrl('k'), Operation::DeleteToEnd),
            (KeyInput::ctrl('l'), Operation::ClearScreen),
            (KeyInput::ctrl('u'), Operation::ClearLine),
            (KeyInput::alt('f'), Operation::MoveToNextWord),
            (KeyInput::alt('b'), Operation::MoveToPreviousWord),
            (KeyInput::alt('d'), Operation::DeleteNextWord),
        ];
        for (input, expected) in cases {
            assert_eq!(
                keymap.resolve(&input),
                Dispatch::Operation(expected),
                "chord {input:?}"
            );
        }
    }

    #[test]
    fn ctrl_c_wins_over_overrides() {
        let overrides = BTreeMap::from([('c', Operation::ClearLine)]);
        let keymap = Keymap::with_ctrl_overrides(&overrides);
        assert_eq!(keymap.resolve(&KeyInput::ctrl('c')), Dispatch::Cancel);
        assert_eq!(keymap.resolve(&KeyInput::ctrl('C')), Dispatch::Cancel);
    }

    #[test]
    fn overrides_replace_and_extend_ctrl_table() {
        let overrides = BTreeMap::from([
            ('w', Operation::MoveToPreviousWord),
            ('A', Operation::MoveToEnd),
        ]);
        let keymap = Keymap::with_ctrl_overrides(&overrides);
        assert_eq!(
            keymap.resolve(&KeyInput::ctrl('w')),
            Dispatch::Operation(Operation::MoveToPreviousWord)
        );
        assert_eq!(
            keymap.resolve(&KeyInput::ctrl('a')),
            Dispatch::Operation(Operation::MoveToEnd)
        );
    }

    #[test]
    fn shift_chord_takes_precedence_over_plain() {
        let keymap = Keymap::default();
        let shifted_left = KeyInput::shift(Key::Left);
        // No shift binding for Left, so the plain table still applies.
        assert_eq!(
            keymap.resolve(&shifted_left),
            Dispatch::Operation(Operation::MoveBackward)
        );
    }

    #[test]
    fn ignorable_keys_are_dropped() {
        let keymap = Keymap::default();
        assert_eq!(keymap.resolve(&KeyInput::plain(Key::Control)), Dispatch::Ignored);
        assert_eq!(keymap.resolve(&KeyInput::plain(Key::Meta)), Dispatch::Ignored);
        assert_eq!(keymap.resolve(&KeyInput::plain(Key::Shift)), Dispatch::Ignored);
        assert_eq!(
            keymap.resolve(&KeyInput::new(Key::Tab, Modifiers::ALT)),
            Dispatch::Ignored
        );
        assert_eq!(keymap.resolve(&KeyInput::alt('`')), Dispatch::Ignored);
    }

    #[test]
    fn printable_filters_modified_and_control_chars() {
        assert_eq!(KeyInput::plain(Key::Char('x')).printable(), Some('x'));
        assert_eq!(KeyInput::shift(Key::Char('X')).printable(), Some('X'));
        assert_eq!(KeyInput::ctrl('x').printable(), None);
        assert_eq!(KeyInput::alt('x').printable(), None);
        assert_eq!(KeyInput::plain(Key::Char('\u{7}')).printable(), None);
        assert_eq!(KeyInput::plain(Key::Enter).printable(), None);
    }

    #[test]
    fn operations_deserialize_from_kebab_case() {
        let op: Operation = serde_json::from_str("\"move-to-previous-word\"").unwrap();
        assert_eq!(op, Operation::MoveToPreviousWord);
    }
}
