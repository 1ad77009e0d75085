//! Single-char edits, paste, join, insert entry and undo/redo

use crate::core::command::{CommandContext, InsertEntry};
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::mode::Mode;
use crate::core::text::leading_whitespace;

/// `x`: delete up to `count` chars of the current line into the register
pub fn delete_char(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let pos = editor.position();
    let end = (pos + ctx.count).min(editor.buffer.line_end(editor.current_line()));
    if end > pos {
        let removed = editor.buffer.delete(pos..end)?;
        editor.register.store(removed, false);
    }
    editor.set_cursor(pos);
    Ok(())
}

/// `s`: like `x`, then Insert
pub fn substitute_char(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    delete_char(editor, ctx)?;
    editor.set_mode(Mode::Insert);
    Ok(())
}

/// `r?`: overwrite `count` chars with the captured one; nothing happens
/// when the line is too short
pub fn replace_char(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let Some(c) = ctx.literal(0) else {
        return Ok(());
    };
    let pos = editor.position();
    let end = pos + ctx.count;
    if end > editor.buffer.line_end(editor.current_line()) {
        return Ok(());
    }
    let replacement: String = std::iter::repeat_n(c, ctx.count).collect();
    editor.buffer.replace(pos..end, &replacement)?;
    editor.set_cursor(end - 1);
    Ok(())
}

/// `J`: join `count` lines (at least two) with single spaces
pub fn join_lines(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let line = editor.current_line();
    let mut join_at = editor.position();
    for _ in 1..ctx.count.max(2) {
        if line >= editor.buffer.last_line() {
            break;
        }
        let current = editor.buffer.line_text(line);
        let trimmed_end = editor.buffer.line_start(line) + current.trim_end().chars().count();
        let next_content = editor.buffer.first_non_blank(line + 1);
        let next_is_blank = next_content == editor.buffer.line_end(line + 1);
        let separator = if current.trim().is_empty() || next_is_blank {
            ""
        } else {
            " "
        };
        editor
            .buffer
            .replace(trimmed_end..next_content, separator)?;
        join_at = trimmed_end;
    }
    editor.set_cursor(join_at);
    Ok(())
}

/// `p` / `P`: paste the register `count` times. Linewise text goes below
/// (or above) the cursor line, charwise text at the cursor.
pub fn paste(editor: &mut Editor, before: bool, ctx: &CommandContext) -> Result<(), EditError> {
    if editor.register.is_empty() {
        return Ok(());
    }
    let text = editor.register.text().repeat(ctx.count);
    let line = editor.current_line();

    if !editor.register.is_linewise() {
        let pos = editor.position();
        editor.buffer.insert(pos, &text)?;
        let last = pos + text.chars().count() - 1;
        editor.set_cursor(last);
        return Ok(());
    }

    let target_line = if before {
        let start = editor.buffer.line_start(line);
        editor.buffer.insert(start, &text)?;
        line
    } else if line < editor.buffer.last_line() {
        let start = editor.buffer.line_start(line + 1);
        editor.buffer.insert(start, &text)?;
        line + 1
    } else {
        let body = text.strip_suffix('\n').unwrap_or(&text);
        let end = editor.buffer.len_chars();
        editor.buffer.insert(end, &format!("\n{}", body))?;
        line + 1
    };
    let pos = editor.buffer.first_non_blank(target_line);
    editor.set_cursor(pos);
    Ok(())
}

/// Position the cursor for an insert-entering command and switch to Insert
pub fn enter_insert(editor: &mut Editor, entry: InsertEntry) -> Result<(), EditError> {
    let line = editor.current_line();
    let pos = editor.position();
    let target = match entry {
        InsertEntry::BeforeCursor => pos,
        InsertEntry::AfterCursor => (pos + 1).min(editor.buffer.line_end(line)),
        InsertEntry::LineStart => editor.buffer.first_non_blank(line),
        InsertEntry::LineEnd => editor.buffer.line_end(line),
        InsertEntry::LineBelow => {
            let indent = indent_after(editor, line);
            let end = editor.buffer.line_end(line);
            editor.buffer.insert(end, &format!("\n{}", indent))?;
            end + 1 + indent.chars().count()
        }
        InsertEntry::LineAbove => {
            let indent = leading_whitespace(&editor.buffer.line_text(line)).to_string();
            let start = editor.buffer.line_start(line);
            editor.buffer.insert(start, &format!("{}\n", indent))?;
            start + indent.chars().count()
        }
    };
    editor.set_cursor(target);
    editor.set_mode(Mode::Insert);
    Ok(())
}

/// Indentation for a new line below `line`: the same, plus one unit when
/// the line opens a block
pub(crate) fn indent_after(editor: &Editor, line: usize) -> String {
    let text = editor.buffer.line_text(line);
    let mut indent = leading_whitespace(&text).to_string();
    if text.trim_end().ends_with(':') {
        indent.push_str(&editor.settings.indent_unit());
    }
    indent
}

/// `v` / `V`: enter a visual mode, leave it when already in it, or switch
/// between the two
pub fn toggle_visual(editor: &mut Editor, mode: Mode) -> Result<(), EditError> {
    if editor.mode == mode {
        editor.set_mode(Mode::Normal);
    } else {
        editor.set_mode(mode);
    }
    Ok(())
}

pub fn undo(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    for _ in 0..ctx.count {
        match editor.buffer.undo() {
            Ok(pos) => editor.set_cursor(pos),
            Err(EditError::NothingToUndo) => {
                editor.message("Already at oldest change");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

pub fn redo(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    for _ in 0..ctx.count {
        match editor.buffer.redo() {
            Ok(pos) => editor.set_cursor(pos),
            Err(EditError::NothingToRedo) => {
                editor.message("Already at newest change");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
