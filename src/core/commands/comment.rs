//! Comment toggling with the active grammar's line-comment marker

use crate::core::command::{CommandContext, CommentOp};
use crate::core::commands::block_end;
use crate::core::commands::operator::selected_lines;
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::mode::Mode;
use crate::core::text::leading_whitespace;

/// New text for one line, or `None` when it stays as it is. Blank lines
/// never change.
pub fn comment_line(line: &str, marker: &str, op: CommentOp) -> Option<String> {
    if line.trim().is_empty() || marker.is_empty() {
        return None;
    }
    let indent = leading_whitespace(line);
    let body = &line[indent.len()..];
    let commented = body.starts_with(marker);
    let comment = match op {
        CommentOp::Toggle => !commented,
        CommentOp::Comment => true,
        CommentOp::Uncomment if commented => false,
        CommentOp::Uncomment => return None,
    };
    if comment {
        Some(format!("{}{} {}", indent, marker, body))
    } else {
        let rest = &body[marker.len()..];
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        Some(format!("{}{}", indent, rest))
    }
}

/// Leader `ci` / `cc` / `cu` on `count` lines, or on the selected lines
pub fn comment_lines(editor: &mut Editor, op: CommentOp, ctx: &CommandContext) -> Result<(), EditError> {
    let (first, last) = if editor.mode.is_visual() {
        selected_lines(editor)
    } else {
        let first = editor.current_line();
        (first, block_end(&editor.buffer, first, ctx.count))
    };
    let marker = editor.grammar.comment_marker.clone();
    for line in first..=last {
        let text = editor.buffer.line_text(line);
        if let Some(updated) = comment_line(&text, &marker, op) {
            let start = editor.buffer.line_start(line);
            let end = editor.buffer.line_end(line);
            editor.buffer.replace(start..end, &updated)?;
        }
    }
    editor.set_mode(Mode::Normal);
    let pos = editor.buffer.first_non_blank(first);
    editor.set_cursor(pos);
    Ok(())
}

/// Leader `cA`: append ` <marker> ` to the line and start typing the comment
pub fn comment_line_end(editor: &mut Editor) -> Result<(), EditError> {
    let end = editor.buffer.line_end(editor.current_line());
    let text = format!(" {} ", editor.grammar.comment_marker);
    editor.buffer.insert(end, &text)?;
    editor.set_cursor(end + text.chars().count());
    editor.set_mode(Mode::Insert);
    Ok(())
}

/// Leader `c$`: comment out the rest of the line from the cursor
pub fn comment_at_cursor(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    let text = format!("{} ", editor.grammar.comment_marker);
    editor.buffer.insert(pos, &text)?;
    editor.set_cursor(pos + text.chars().count());
    editor.set_mode(Mode::Insert);
    Ok(())
}
