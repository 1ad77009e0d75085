//! Delete, change and yank over motions, whole lines and selections
//!
//! Every deletion writes the register. Linewise register text is stored as
//! complete lines, each ending in `\n`.

use std::ops::Range;

use crate::core::command::CommandContext;
use crate::core::commands::{block_end, lines_text};
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::mode::Mode;
use crate::core::motion::{Motion, MotionArgs, line_span};

pub fn delete(editor: &mut Editor, motion: Motion, ctx: &CommandContext) -> Result<(), EditError> {
    let args = ctx.motion_args(editor.settings.jump_lines);
    let pos = editor.position();
    if motion.is_linewise() {
        let (first, last) = motion_lines(editor, motion, &args);
        return delete_line_block(editor, first, last);
    }
    let (range, _) = motion.operator_range(&editor.buffer, pos, &args);
    delete_charwise(editor, range)
}

pub fn change(editor: &mut Editor, motion: Motion, ctx: &CommandContext) -> Result<(), EditError> {
    let args = ctx.motion_args(editor.settings.jump_lines);
    let pos = editor.position();
    if motion.is_linewise() {
        let (first, last) = motion_lines(editor, motion, &args);
        return change_line_block(editor, first, last);
    }
    let (range, _) = motion.operator_range(&editor.buffer, pos, &args);
    delete_charwise(editor, range)?;
    editor.set_mode(Mode::Insert);
    Ok(())
}

pub fn yank(editor: &mut Editor, motion: Motion, ctx: &CommandContext) -> Result<(), EditError> {
    let args = ctx.motion_args(editor.settings.jump_lines);
    let pos = editor.position();
    if motion.is_linewise() {
        let (first, last) = motion_lines(editor, motion, &args);
        let text = lines_text(&editor.buffer, first, last);
        editor.register.store(text, true);
        return Ok(());
    }
    let (range, _) = motion.operator_range(&editor.buffer, pos, &args);
    let text = editor.buffer.slice(range.clone());
    editor.register.store(text, false);
    editor.set_cursor(range.start);
    Ok(())
}

/// `dd`: delete `count` lines starting at the cursor line
pub fn delete_lines(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let first = editor.current_line();
    let last = block_end(&editor.buffer, first, ctx.count);
    delete_line_block(editor, first, last)
}

/// `cc`: replace `count` lines with one, keeping the first line's indentation
pub fn change_lines(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let first = editor.current_line();
    let last = block_end(&editor.buffer, first, ctx.count);
    change_line_block(editor, first, last)
}

pub fn yank_lines(editor: &mut Editor, ctx: &CommandContext) -> Result<(), EditError> {
    let first = editor.current_line();
    let last = block_end(&editor.buffer, first, ctx.count);
    let text = lines_text(&editor.buffer, first, last);
    editor.register.store(text, true);
    Ok(())
}

/// `D`: delete to the end of the line, then drop trailing whitespace left
/// before the cursor
pub fn delete_to_line_end(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    let line = editor.current_line();
    let end = editor.buffer.line_end(line);
    let removed = editor.buffer.delete(pos..end)?;
    if !removed.is_empty() {
        editor.register.store(removed, false);
    }
    let start = editor.buffer.line_start(line);
    let kept = start + editor.buffer.line_text(line).trim_end().chars().count();
    let end = editor.buffer.line_end(line);
    editor.buffer.delete(kept..end)?;
    editor.set_cursor(pos.min(kept));
    Ok(())
}

pub fn delete_selection(editor: &mut Editor) -> Result<(), EditError> {
    match selection(editor) {
        Selection::Lines(first, last) => delete_line_block(editor, first, last)?,
        Selection::Chars(range) => delete_charwise(editor, range)?,
    }
    editor.set_mode(Mode::Normal);
    Ok(())
}

pub fn change_selection(editor: &mut Editor) -> Result<(), EditError> {
    match selection(editor) {
        Selection::Lines(first, last) => change_line_block(editor, first, last),
        Selection::Chars(range) => {
            delete_charwise(editor, range)?;
            editor.set_mode(Mode::Insert);
            Ok(())
        }
    }
}

pub fn yank_selection(editor: &mut Editor) -> Result<(), EditError> {
    match selection(editor) {
        Selection::Lines(first, last) => {
            let text = lines_text(&editor.buffer, first, last);
            editor.register.store(text, true);
            let pos = editor.buffer.first_non_blank(first);
            editor.set_cursor(pos);
        }
        Selection::Chars(range) => {
            let text = editor.buffer.slice(range.clone());
            editor.register.store(text, false);
            editor.set_cursor(range.start);
        }
    }
    editor.set_mode(Mode::Normal);
    Ok(())
}

pub(crate) enum Selection {
    /// First and last line, inclusive
    Lines(usize, usize),
    Chars(Range<usize>),
}

/// What the visual selection covers; an empty charwise selection covers
/// the char under the cursor
pub(crate) fn selection(editor: &Editor) -> Selection {
    let cursor = editor.window.cursor;
    if editor.mode == Mode::VisualLine {
        let first = editor.buffer.line_of(cursor.start());
        let last = editor.buffer.line_of(cursor.end());
        return Selection::Lines(first, last);
    }
    let range = cursor.selection();
    if range.is_empty() {
        let line_end = editor.buffer.line_end(editor.buffer.line_of(range.start));
        return Selection::Chars(range.start..(range.start + 1).min(line_end));
    }
    Selection::Chars(range)
}

/// First and last line touched by the visual selection
pub(crate) fn selected_lines(editor: &Editor) -> (usize, usize) {
    match selection(editor) {
        Selection::Lines(first, last) => (first, last),
        Selection::Chars(range) => {
            let last_char = range.end.saturating_sub(1).max(range.start);
            (
                editor.buffer.line_of(range.start),
                editor.buffer.line_of(last_char),
            )
        }
    }
}

/// First and last line a linewise motion covers from the cursor
fn motion_lines(editor: &Editor, motion: Motion, args: &MotionArgs) -> (usize, usize) {
    let pos = editor.position();
    let target = motion.target(&editor.buffer, pos, args);
    let first = editor.buffer.line_of(pos.min(target));
    let last = editor.buffer.line_of(pos.max(target));
    (first, last)
}

fn delete_charwise(editor: &mut Editor, range: Range<usize>) -> Result<(), EditError> {
    if range.is_empty() {
        editor.set_cursor(range.start);
        return Ok(());
    }
    let text = editor.buffer.delete(range.clone())?;
    editor.register.store(text, false);
    editor.set_cursor(range.start);
    Ok(())
}

pub(crate) fn delete_line_block(editor: &mut Editor, first: usize, last: usize) -> Result<(), EditError> {
    let text = lines_text(&editor.buffer, first, last);
    let span = line_span(&editor.buffer, first, last);
    editor.buffer.delete(span)?;
    editor.register.store(text, true);
    let line = first.min(editor.buffer.last_line());
    let pos = editor.buffer.first_non_blank(line);
    editor.set_cursor(pos);
    Ok(())
}

fn change_line_block(editor: &mut Editor, first: usize, last: usize) -> Result<(), EditError> {
    let text = lines_text(&editor.buffer, first, last);
    let start = editor.buffer.first_non_blank(first);
    let end = editor.buffer.line_end(last);
    editor.buffer.delete(start..end)?;
    editor.register.store(text, true);
    editor.set_cursor(start);
    editor.set_mode(Mode::Insert);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::commands::test_support::{editor, keys};
    use crate::core::mode::Mode;

    #[test]
    fn test_count_delete_words() {
        let mut ed = editor("alpha beta gamma delta");
        keys(&mut ed, "3dw");
        assert_eq!(ed.text(), "delta");
        assert_eq!(ed.register().text(), "alpha beta gamma ");
        assert!(!ed.register().is_linewise());
    }

    #[test]
    fn test_dw_stops_at_line_break() {
        let mut ed = editor("one two\nthree");
        keys(&mut ed, "wdw");
        assert_eq!(ed.text(), "one \nthree");
    }

    #[test]
    fn test_delete_lines_with_count() {
        let mut ed = editor("a\n  b\nc\nd");
        keys(&mut ed, "2dd");
        assert_eq!(ed.text(), "c\nd");
        assert_eq!(ed.register().text(), "a\n  b\n");
        assert!(ed.register().is_linewise());

        let mut ed = editor("a\nb\nc");
        keys(&mut ed, "Gdd");
        assert_eq!(ed.text(), "a\nb");
        assert_eq!(ed.cursor_position(), (1, 0));
    }

    #[test]
    fn test_linewise_motions() {
        let mut ed = editor("a\nb\nc\nd");
        keys(&mut ed, "jdj");
        assert_eq!(ed.text(), "a\nd");
        let mut ed = editor("a\nb\nc\nd");
        keys(&mut ed, "jdG");
        assert_eq!(ed.text(), "a");
        let mut ed = editor("a\nb\nc\nd");
        keys(&mut ed, "jjdgg");
        assert_eq!(ed.text(), "d");
        let mut ed = editor("a\nb\nc\nd");
        keys(&mut ed, "Gdk");
        assert_eq!(ed.text(), "a\nb");
    }

    #[test]
    fn test_find_operators_are_inclusive() {
        let mut ed = editor("call(a, b)");
        keys(&mut ed, "df,");
        assert_eq!(ed.text(), " b)");
        let mut ed = editor("call(a, b)");
        keys(&mut ed, "f)dF(");
        assert_eq!(ed.text(), "call)");
    }

    #[test]
    fn test_change_word_and_line() {
        let mut ed = editor("foo bar");
        keys(&mut ed, "cwbaz<Esc>");
        assert_eq!(ed.text(), "baz bar");
        assert_eq!(ed.mode(), Mode::Normal);

        let mut ed = editor("    old line\nnext");
        keys(&mut ed, "ccnew<Esc>");
        assert_eq!(ed.text(), "    new\nnext");
    }

    #[test]
    fn test_delete_and_change_to_line_end() {
        let mut ed = editor("keep this   and drop");
        keys(&mut ed, "2wD");
        assert_eq!(ed.text(), "keep this");
        assert_eq!(ed.register().text(), "and drop");

        let mut ed = editor("x = 1");
        keys(&mut ed, "wwC2<Esc>");
        assert_eq!(ed.text(), "x = 2");
    }

    #[test]
    fn test_yank_does_not_mutate() {
        let mut ed = editor("alpha beta\nsecond");
        keys(&mut ed, "wyw");
        assert_eq!(ed.text(), "alpha beta\nsecond");
        assert_eq!(ed.register().text(), "beta");
        keys(&mut ed, "yy");
        assert_eq!(ed.register().text(), "alpha beta\n");
        assert!(ed.register().is_linewise());
        keys(&mut ed, "yj");
        assert_eq!(ed.register().text(), "alpha beta\nsecond\n");
    }

    #[test]
    fn test_visual_operators() {
        let mut ed = editor("alpha beta gamma");
        keys(&mut ed, "wvwd");
        assert_eq!(ed.text(), "alpha gamma");
        assert_eq!(ed.mode(), Mode::Normal);

        let mut ed = editor("one\ntwo\nthree");
        keys(&mut ed, "Vjy");
        assert_eq!(ed.register().text(), "one\ntwo\n");
        assert!(ed.register().is_linewise());
        assert_eq!(ed.mode(), Mode::Normal);

        let mut ed = editor("one\ntwo\nthree");
        keys(&mut ed, "jVd");
        assert_eq!(ed.text(), "one\nthree");

        let mut ed = editor("one two");
        keys(&mut ed, "vecX<Esc>");
        assert_eq!(ed.text(), "Xe two");
    }

    #[test]
    fn test_empty_delete_keeps_register() {
        let mut ed = editor("");
        keys(&mut ed, "yy");
        keys(&mut ed, "dw");
        assert_eq!(ed.text(), "");
        assert_eq!(ed.register().text(), "\n");
    }
}
