//! Translation from crossterm key events to console key input.

use crate::console::{Key, KeyInput, Modifiers};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

/// Normalize a crossterm key event, or `None` for keys the console never sees.
pub fn key_input_from_event(event: &KeyEvent) -> Option<KeyInput> {
    if event.kind != KeyEventKind::Press && event.kind != KeyEventKind::Repeat {
        return None;
    }
    let mut modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        meta: event.modifiers.contains(KeyModifiers::META)
            || event.modifiers.contains(KeyModifiers::SUPER),
    };

    let key = match event.code {
        KeyCode::Char(ch) => Key::Char(ch),
        // Terminals rarely report Shift+Enter; Alt+Enter stands in for it.
        KeyCode::Enter if modifiers.alt => {
            modifiers.alt = false;
            modifiers.shift = true;
            Key::Enter
        }
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            modifiers.shift = true;
            Key::Tab
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Esc => Key::Escape,
        KeyCode::Modifier(code) => match code {
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Key::Control,
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Key::Shift,
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Key::Alt,
            ModifierKeyCode::LeftMeta
            | ModifierKeyCode::RightMeta
            | ModifierKeyCode::LeftSuper
            | ModifierKeyCode::RightSuper => Key::Meta,
            _ => return None,
        },
        _ => return None,
    };
    Some(KeyInput::new(key, modifiers))
}
