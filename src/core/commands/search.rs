//! Search commands and the command-line prompts

use crate::core::command::{CommandContext, Prompt};
use crate::core::command_line::CommandLine;
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::text::word_range_at;

/// `*`: highlight every whole-word match of the word under the cursor.
/// The cursor stays put; `n`/`N` walk the matches from there.
pub fn search_word(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    let Some(range) = word_range_at(&editor.buffer, pos) else {
        editor.message("No word under cursor");
        return Ok(());
    };
    let word = editor.buffer.slice(range.clone());
    editor.search.set(&word, true, &editor.buffer)?;
    report_matches(editor, &word);
    Ok(())
}

/// Literal search for `term` from the cursor, as submitted with `/term`
pub fn search_term(editor: &mut Editor, term: &str) -> Result<(), EditError> {
    let count = editor.search.set(term, false, &editor.buffer)?;
    if count == 0 {
        if !term.is_empty() {
            editor.message(format!("Pattern not found: {}", term));
        }
        return Ok(());
    }
    let pos = editor.position();
    if let Some(target) = editor.search.next(pos, 1) {
        editor.set_cursor(target);
    }
    report_matches(editor, term);
    Ok(())
}

/// `n` / `N`, wrapping at the document bounds
pub fn search_next(editor: &mut Editor, ctx: &CommandContext, forward: bool) -> Result<(), EditError> {
    editor.search.resume(&editor.buffer)?;
    let pos = editor.position();
    let target = if forward {
        editor.search.next(pos, ctx.count)
    } else {
        editor.search.previous(pos, ctx.count)
    };
    if let Some(target) = target {
        editor.set_cursor(target);
        return Ok(());
    }
    let message = match editor.search.term() {
        Some(term) => format!("Pattern not found: {}", term),
        None => "No previous search".to_string(),
    };
    editor.message(message);
    Ok(())
}

/// Drop the match highlights
pub fn clear_search(editor: &mut Editor) -> Result<(), EditError> {
    editor.search.clear();
    Ok(())
}

pub fn open_prompt(editor: &mut Editor, prompt: Prompt) -> Result<(), EditError> {
    editor.open_command_line(CommandLine::new(prompt));
    Ok(())
}

fn report_matches(editor: &mut Editor, term: &str) {
    let count = editor.search.matches().len();
    editor.message(format!("{} match{} for {}", count, if count == 1 { "" } else { "es" }, term));
}

#[cfg(test)]
mod tests {
    use crate::core::commands::test_support::{editor, keys};

    #[test]
    fn test_star_searches_whole_word() {
        let mut ed = editor("foo food foo\nfoo");
        keys(&mut ed, "l");
        let outcome = keys(&mut ed, "*");
        assert_eq!(ed.cursor_position(), (0, 1));
        assert_eq!(ed.search_matches().len(), 3);
        assert_eq!(outcome.message.as_deref(), Some("3 matches for foo"));
        keys(&mut ed, "n");
        assert_eq!(ed.cursor_position(), (0, 9));
        keys(&mut ed, "n");
        assert_eq!(ed.cursor_position(), (1, 0));
        keys(&mut ed, "n");
        assert_eq!(ed.cursor_position(), (0, 0));
        keys(&mut ed, "N");
        assert_eq!(ed.cursor_position(), (1, 0));
    }

    #[test]
    fn test_slash_prompt_searches_literally() {
        let mut ed = editor("a.b axb a.b");
        keys(&mut ed, "/a.b<CR>");
        assert_eq!(ed.cursor_position(), (0, 8));
        assert_eq!(ed.search_matches().len(), 2);
        keys(&mut ed, "2n");
        assert_eq!(ed.cursor_position(), (0, 8));
        keys(&mut ed, "n");
        assert_eq!(ed.cursor_position(), (0, 0));
    }

    #[test]
    fn test_clear_then_next_resumes() {
        let mut ed = editor("x y x");
        keys(&mut ed, "*<C-[>");
        assert!(ed.search_matches().is_empty());
        keys(&mut ed, "n");
        assert_eq!(ed.cursor_position(), (0, 4));
        assert_eq!(ed.search_matches().len(), 2);
    }

    #[test]
    fn test_walk_starts_at_nearest_match() {
        // The `|` is three chars from both matches
        let mut ed = editor("ab.|..ab");
        keys(&mut ed, "fa*");
        assert_eq!(ed.search_matches().len(), 2);
        keys(&mut ed, "3h");
        assert_eq!(ed.cursor_position(), (0, 3));
        keys(&mut ed, "n");
        assert_eq!(ed.cursor_position(), (0, 6));
        keys(&mut ed, "3hN");
        assert_eq!(ed.cursor_position(), (0, 0));
    }

    #[test]
    fn test_matches_follow_edits() {
        let mut ed = editor("ab ab");
        keys(&mut ed, "*");
        assert_eq!(ed.search_matches().len(), 2);
        keys(&mut ed, "Iab <Esc>");
        assert_eq!(ed.search_matches().len(), 3);
    }
}
