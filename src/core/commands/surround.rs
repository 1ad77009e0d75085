//! Delimiter pairs around the word under the cursor

use crate::core::command::CommandContext;
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::text::word_range_at;

/// Opening and closing delimiter for a typed char. Brackets map to their
/// canonical pair; anything else is used on both sides.
pub fn delimiters(c: char) -> (char, char) {
    match c {
        '(' | ')' => ('(', ')'),
        '[' | ']' => ('[', ']'),
        '{' | '}' => ('{', '}'),
        c => (c, c),
    }
}

/// `ysiw?`: wrap the word under the cursor
pub fn surround_word(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let Some(c) = ctx.literal(0) else {
        return Ok(());
    };
    let pos = editor.position();
    let Some(range) = word_range_at(&editor.buffer, pos) else {
        return Ok(());
    };
    let (open, close) = delimiters(c);
    editor.buffer.insert(range.end, &close.to_string())?;
    editor.buffer.insert(range.start, &open.to_string())?;
    editor.set_cursor(pos + 1);
    Ok(())
}

/// `ds?`: remove the nearest pair enclosing the cursor on its line
pub fn delete_surround(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let Some(c) = ctx.literal(0) else {
        return Ok(());
    };
    let Some((left, right)) = enclosing_pair(editor, delimiters(c)) else {
        return Ok(());
    };
    editor.buffer.delete(right..right + 1)?;
    editor.buffer.delete(left..left + 1)?;
    editor.set_cursor(left);
    Ok(())
}

/// `cs??`: swap the enclosing pair of the first char for the second
pub fn change_surround(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let (Some(from), Some(to)) = (ctx.literal(0), ctx.literal(1)) else {
        return Ok(());
    };
    let Some((left, right)) = enclosing_pair(editor, delimiters(from)) else {
        return Ok(());
    };
    let (open, close) = delimiters(to);
    editor.buffer.replace(right..right + 1, &close.to_string())?;
    editor.buffer.replace(left..left + 1, &open.to_string())?;
    editor.set_cursor(left);
    Ok(())
}

/// Document offsets of the delimiters around the cursor
fn enclosing_pair(editor: &Editor, (open, close): (char, char)) -> Option<(usize, usize)> {
    let line = editor.current_line();
    let start = editor.buffer.line_start(line);
    let chars: Vec<char> = editor.buffer.line_text(line).chars().collect();
    let column = editor.position() - start;
    find_enclosing(&chars, column, open, close).map(|(l, r)| (start + l, start + r))
}

fn find_enclosing(chars: &[char], column: usize, open: char, close: char) -> Option<(usize, usize)> {
    if chars.is_empty() {
        return None;
    }
    let column = column.min(chars.len() - 1);

    if open == close {
        let left = (0..=column).rev().find(|&i| chars[i] == open)?;
        let right = (left + 1..chars.len()).find(|&i| chars[i] == close)?;
        return Some((left, right));
    }

    let mut depth = 0usize;
    let mut left = None;
    for i in (0..=column).rev() {
        if chars[i] == close && i != column {
            depth += 1;
        } else if chars[i] == open {
            if depth == 0 {
                left = Some(i);
                break;
            }
            depth -= 1;
        }
    }
    let left = left?;
    depth = 0;
    for (i, &c) in chars.iter().enumerate().skip(left + 1) {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Some((left, i));
            }
            depth -= 1;
        }
    }
    None
}
