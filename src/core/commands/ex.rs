//! Commands submitted on the command line

use crate::core::command_line::ExCommand;
use crate::core::commands::{search, text};
use crate::core::editor::{Editor, HostAction};
use crate::core::error::EditError;

pub fn execute(editor: &mut Editor, command: ExCommand) -> Result<(), EditError> {
    match command {
        ExCommand::Empty => {}
        ExCommand::Write => editor.request(HostAction::Save),
        ExCommand::Quit => editor.request(HostAction::ExitContext),
        ExCommand::WriteQuit => {
            editor.request(HostAction::Save);
            editor.request(HostAction::ExitContext);
        }
        ExCommand::TabNew => editor.request(HostAction::NewPage),
        ExCommand::TabClose => editor.request(HostAction::ClosePage),
        ExCommand::TabOnly => editor.request(HostAction::CloseOtherPages),
        ExCommand::Retab => {
            let changed = text::retab(editor)?;
            editor.message(format!("Retabbed {} line{}", changed, plural(changed)));
        }
        ExCommand::GotoLine(line) => goto_line(editor, line),
        ExCommand::Search(term) => search::search_term(editor, &term)?,
        ExCommand::Substitute {
            pattern,
            replacement,
            whole_document,
            global,
        } => substitute(editor, &pattern, &replacement, whole_document, global)?,
        ExCommand::Unknown(input) => {
            editor.message(format!("Not an editor command: {}", input));
        }
    }
    Ok(())
}

/// 1-based line, clamped to the document
pub fn goto_line(editor: &mut Editor, line: usize) {
    let line = line.saturating_sub(1).min(editor.buffer.last_line());
    let pos = editor.buffer.first_non_blank(line);
    editor.set_cursor(pos);
}

/// Literal replacement; `global` replaces every occurrence on a line
/// instead of the first one
fn substitute(
    editor: &mut Editor,
    pattern: &str,
    replacement: &str,
    whole_document: bool,
    global: bool,
) -> Result<(), EditError> {
    let count = if whole_document && global {
        editor.buffer.replace_all(pattern, replacement)?
    } else {
        let (first, last) = if whole_document {
            (0, editor.buffer.last_line())
        } else {
            let line = editor.current_line();
            (line, line)
        };
        let mut count = 0;
        for line in (first..=last).rev() {
            count += substitute_line(editor, line, pattern, replacement, global)?;
        }
        count
    };
    if count == 0 {
        editor.message(format!("Pattern not found: {}", pattern));
    } else {
        editor.message(format!("{} substitution{}", count, plural(count)));
    }
    Ok(())
}

fn substitute_line(
    editor: &mut Editor,
    line: usize,
    pattern: &str,
    replacement: &str,
    global: bool,
) -> Result<usize, EditError> {
    let text = editor.buffer.line_text(line);
    let start = editor.buffer.line_start(line);
    let mut hits: Vec<usize> = text
        .match_indices(pattern)
        .map(|(byte, _)| text[..byte].chars().count())
        .collect();
    if !global {
        hits.truncate(1);
    }
    let width = pattern.chars().count();
    for column in hits.iter().rev() {
        let pos = start + column;
        editor.buffer.replace(pos..pos + width, replacement)?;
    }
    Ok(hits.len())
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
