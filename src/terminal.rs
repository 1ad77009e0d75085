//! Conversion of crossterm key events into engine key events

use crossterm::event::{self, KeyCode, KeyEventKind, KeyModifiers};

use crate::core::input::{Key, KeyEvent, Modifiers};

/// Convert a terminal key press, stamping it with `timestamp_ms`.
///
/// Releases and keys the engine has no name for give `None`.
pub fn key_event_from_crossterm(key_event: event::KeyEvent, timestamp_ms: u64) -> Option<KeyEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let mods = key_event.modifiers;
    let mut modifiers = Modifiers {
        shift: mods.contains(KeyModifiers::SHIFT),
        alt: mods.contains(KeyModifiers::ALT),
        ctrl: mods.contains(KeyModifiers::CONTROL),
    };

    let key = match key_event.code {
        KeyCode::Char(c) => {
            // Terminals report shifted letters as uppercase, sometimes without SHIFT
            if c.is_uppercase() {
                modifiers.shift = true;
            }
            Key::Char(c)
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab if modifiers.shift => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            modifiers.shift = true;
            Key::BackTab
        }
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::F(n),
        KeyCode::Esc => Key::Esc,
        _ => return None,
    };

    Some(KeyEvent::new(key, modifiers).at(timestamp_ms))
}
