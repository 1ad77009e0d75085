//! Command implementations
//!
//! Every resolved `Action` lands in [`execute`], which matches it to one of
//! the functions in the sub-modules:
//!
//! - **movement**: cursor motions and view scrolling
//! - **operator**: delete/change/yank over motions, lines and selections
//! - **editing**: single-char edits, paste, join, insert entry, undo/redo
//! - **text**: indentation and case
//! - **comment**: grammar-aware comment toggling
//! - **surround**: delimiter pairs around the word under the cursor
//! - **search**: literal search and the command-line prompts
//! - **navigation**: definition lookup, jump list and page requests
//! - **ex**: commands submitted on the command line
//!
//! Commands run inside the edit group `Editor` opens for them; returning an
//! error rolls the whole command back.

use tracing::debug;

use crate::core::buffer::Buffer;
use crate::core::command::{Action, CommandContext};
use crate::core::editor::{Editor, HostAction};
use crate::core::error::EditError;

pub mod comment;
pub mod editing;
pub mod ex;
pub mod movement;
pub mod navigation;
pub mod operator;
pub mod search;
pub mod surround;
pub mod text;

pub fn execute(editor: &mut Editor, action: Action, ctx: &CommandContext) -> Result<(), EditError> {
    debug!(action = action.name(), count = ctx.count, "execute");
    match action {
        Action::Move(motion) => movement::move_cursor(editor, motion, ctx),
        Action::Delete(motion) => operator::delete(editor, motion, ctx),
        Action::Change(motion) => operator::change(editor, motion, ctx),
        Action::Yank(motion) => operator::yank(editor, motion, ctx),
        Action::DeleteLines => operator::delete_lines(editor, ctx),
        Action::ChangeLines => operator::change_lines(editor, ctx),
        Action::YankLines => operator::yank_lines(editor, ctx),
        Action::DeleteToLineEnd => operator::delete_to_line_end(editor),
        Action::DeleteChar => editing::delete_char(editor, ctx),
        Action::SubstituteChar => editing::substitute_char(editor, ctx),
        Action::ReplaceChar => editing::replace_char(editor, ctx),
        Action::JoinLines => editing::join_lines(editor, ctx),
        Action::Paste { before } => editing::paste(editor, before, ctx),
        Action::Insert(entry) => editing::enter_insert(editor, entry),
        Action::Visual(mode) => editing::toggle_visual(editor, mode),
        Action::DeleteSelection => operator::delete_selection(editor),
        Action::ChangeSelection => operator::change_selection(editor),
        Action::YankSelection => operator::yank_selection(editor),
        Action::Indent => text::shift(editor, ctx, true),
        Action::Outdent => text::shift(editor, ctx, false),
        Action::Case { upper } => text::change_case(editor, upper),
        Action::Comment(op) => comment::comment_lines(editor, op, ctx),
        Action::CommentLineEnd => comment::comment_line_end(editor),
        Action::CommentAtCursor => comment::comment_at_cursor(editor),
        Action::Surround => surround::surround_word(editor, ctx),
        Action::DeleteSurround => surround::delete_surround(editor, ctx),
        Action::ChangeSurround => surround::change_surround(editor, ctx),
        Action::SearchWord => search::search_word(editor),
        Action::SearchNext => search::search_next(editor, ctx, true),
        Action::SearchPrevious => search::search_next(editor, ctx, false),
        Action::ClearSearch => search::clear_search(editor),
        Action::OpenPrompt(prompt) => search::open_prompt(editor, prompt),
        Action::GotoDefinition => navigation::goto_definition(editor),
        Action::JumpBack => navigation::jump(editor, true),
        Action::JumpForward => navigation::jump(editor, false),
        Action::ScrollDown => movement::scroll(editor, ctx, true),
        Action::ScrollUp => movement::scroll(editor, ctx, false),
        Action::CenterView => movement::center_view(editor),
        Action::Undo => editing::undo(editor, ctx),
        Action::Redo => editing::redo(editor, ctx),
        Action::NextPage => host(editor, HostAction::NextPage),
        Action::PreviousPage => host(editor, HostAction::PreviousPage),
        Action::ZoomIn => host(editor, HostAction::ZoomIn),
        Action::ZoomOut => host(editor, HostAction::ZoomOut),
    }
}

fn host(editor: &mut Editor, action: HostAction) -> Result<(), EditError> {
    editor.request(action);
    Ok(())
}

/// Lines `first..=last` as register text: each line followed by `\n`
pub(crate) fn lines_text(buffer: &Buffer, first: usize, last: usize) -> String {
    let mut text = String::new();
    for line in first..=last.min(buffer.last_line()) {
        text.push_str(&buffer.line_text(line));
        text.push('\n');
    }
    text
}

/// Last line of a `count`-line block starting at `first`
pub(crate) fn block_end(buffer: &Buffer, first: usize, count: usize) -> usize {
    (first + count.max(1) - 1).min(buffer.last_line())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::core::editor::{Editor, EventOutcome};
    use crate::core::input::parse_keys;

    pub fn editor(text: &str) -> Editor {
        let config = Config::with_defaults().unwrap();
        Editor::with_text(&config, text).unwrap()
    }

    /// Feed vim-notation keys, returning the outcome of the last one
    pub fn keys(editor: &mut Editor, notation: &str) -> EventOutcome {
        let mut last = EventOutcome::default();
        for event in parse_keys(notation).unwrap() {
            last = editor.handle_key(event);
        }
        last
    }
}
