//! Insert mode key handling
//!
//! Every key runs in its own nested edit group inside the group opened by
//! the insert-entering command, so a failing key rolls back alone and the
//! whole session still undoes as one step.

use tracing::warn;

use crate::core::commands::text::outdent_line;
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::input::{Key, KeyEvent};
use crate::core::motion::{Motion, MotionArgs};
use crate::core::text::{is_word_char, leading_whitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertKey {
    Char(char),
    Newline,
    Tab,
    Outdent,
    Backspace,
    Delete,
    Move(Motion),
}

/// Handle one key in Insert mode; false when the key means nothing here
pub(crate) fn handle_key(editor: &mut Editor, event: &KeyEvent) -> bool {
    let Some(key) = classify(event) else {
        return false;
    };
    editor.buffer.begin_group("insert");
    match apply(editor, key) {
        Ok(()) => editor.buffer.commit_group(),
        Err(err) => {
            warn!(?key, error = %err, "insert key failed, rolling back");
            editor.buffer.rollback_group();
            editor.message(err.to_string());
        }
    }
    true
}

fn classify(event: &KeyEvent) -> Option<InsertKey> {
    let mods = event.modifiers;
    if mods.ctrl && !mods.alt {
        let motion = match event.key {
            Key::Char(c) => match c.to_ascii_lowercase() {
                'h' => Motion::Left,
                'j' => Motion::Down,
                'k' => Motion::Up,
                'l' => Motion::Right,
                _ => return None,
            },
            _ => return None,
        };
        return Some(InsertKey::Move(motion));
    }
    let key = match event.key {
        Key::Enter => InsertKey::Newline,
        Key::Tab if mods.shift => InsertKey::Outdent,
        Key::Tab => InsertKey::Tab,
        Key::BackTab => InsertKey::Outdent,
        Key::Backspace => InsertKey::Backspace,
        Key::Delete => InsertKey::Delete,
        Key::Left => InsertKey::Move(Motion::Left),
        Key::Right => InsertKey::Move(Motion::Right),
        Key::Up => InsertKey::Move(Motion::Up),
        Key::Down => InsertKey::Move(Motion::Down),
        Key::Home => InsertKey::Move(Motion::LineStart),
        Key::End => InsertKey::Move(Motion::LineEnd),
        _ => InsertKey::Char(event.typed_char()?),
    };
    Some(key)
}

fn apply(editor: &mut Editor, key: InsertKey) -> Result<(), EditError> {
    match key {
        InsertKey::Char(c) => type_char(editor, c),
        InsertKey::Newline => newline(editor),
        InsertKey::Tab => tab(editor),
        InsertKey::Outdent => outdent(editor),
        InsertKey::Backspace => backspace(editor),
        InsertKey::Delete => {
            let pos = editor.position();
            if pos < editor.buffer.len_chars() {
                editor.buffer.delete(pos..pos + 1)?;
            }
            Ok(())
        }
        InsertKey::Move(motion) => {
            let args = MotionArgs {
                jump_lines: editor.settings.jump_lines,
                ..MotionArgs::default()
            };
            editor.window.move_cursor(&editor.buffer, motion, &args, false);
            Ok(())
        }
    }
}

fn closing(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

fn type_char(editor: &mut Editor, c: char) -> Result<(), EditError> {
    let pos = editor.position();
    let next = editor.buffer.char_at(pos);
    let is_closer = matches!(c, ')' | ']' | '}' | '"' | '\'');
    if is_closer && next == Some(c) {
        editor.set_cursor(pos + 1);
        return Ok(());
    }

    let prev = pos.checked_sub(1).and_then(|p| editor.buffer.char_at(p));
    let pair = match closing(c) {
        // Quotes only pair outside words, so `don't` types as written
        Some(close) if c == close => {
            let inside_word = prev.is_some_and(is_word_char) || next.is_some_and(is_word_char);
            (!inside_word).then_some(close)
        }
        other => other,
    };

    match pair {
        Some(close) => editor.buffer.insert(pos, &format!("{}{}", c, close))?,
        None => editor.buffer.insert(pos, c.encode_utf8(&mut [0u8; 4]))?,
    }
    editor.set_cursor(pos + 1);
    Ok(())
}

fn newline(editor: &mut Editor) -> Result<(), EditError> {
    let mut pos = editor.position();
    let line = editor.current_line();
    let start = editor.buffer.line_start(line);
    let before = editor.buffer.slice(start..pos);

    let mut indent = leading_whitespace(&before).to_string();
    if before.trim_end().ends_with(':') {
        indent.push_str(&editor.settings.indent_unit());
    }
    // A line holding nothing but indentation is left empty
    if !before.is_empty() && before.trim().is_empty() {
        editor.buffer.delete(start..pos)?;
        pos = start;
    }

    editor.buffer.insert(pos, &format!("\n{}", indent))?;
    editor.set_cursor(pos + 1 + indent.chars().count());
    Ok(())
}

fn tab(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    let column = editor.buffer.column_of(pos);
    let tab_width = editor.settings.tab_width;
    let spaces = tab_width - column % tab_width;
    editor.buffer.insert(pos, &" ".repeat(spaces))?;
    editor.set_cursor(pos + spaces);
    Ok(())
}

fn outdent(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    let line = editor.current_line();
    let start = editor.buffer.line_start(line);
    let before = editor.buffer.line_len(line);
    outdent_line(editor, line, 1)?;
    let removed = before - editor.buffer.line_len(line);
    editor.set_cursor(pos.saturating_sub(removed).max(start));
    Ok(())
}

fn backspace(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    if pos == 0 {
        return Ok(());
    }
    let prev = editor.buffer.char_at(pos - 1);
    let next = editor.buffer.char_at(pos);

    let empty_pair = prev.and_then(closing).is_some_and(|close| next == Some(close));
    if empty_pair {
        editor.buffer.delete(pos - 1..pos + 1)?;
        editor.set_cursor(pos - 1);
        return Ok(());
    }

    let start = editor.buffer.line_start(editor.current_line());
    let before = editor.buffer.slice(start..pos);
    let width = if !before.is_empty() && before.chars().all(|c| c == ' ') {
        let column = before.chars().count();
        let tab_width = editor.settings.tab_width;
        column - (column - 1) / tab_width * tab_width
    } else {
        1
    };
    editor.buffer.delete(pos - width..pos)?;
    editor.set_cursor(pos - width);
    Ok(())
}
