//! Definition lookup and the jump list

use tracing::warn;

use crate::core::definition::Lookup;
use crate::core::editor::{Editor, HostAction};
use crate::core::error::{DefinitionError, EditError};
use crate::core::text::word_at;

const MAX_JUMPS: usize = 100;

/// Offsets to return to with `ctrl+o` and go forward to with `ctrl+i`
#[derive(Debug, Clone, Default)]
pub struct JumpList {
    back: Vec<usize>,
    forward: Vec<usize>,
}

impl JumpList {
    /// Record the offset a jump leaves from
    pub fn push(&mut self, pos: usize) {
        if self.back.len() >= MAX_JUMPS {
            self.back.remove(0);
        }
        self.back.push(pos);
        self.forward.clear();
    }

    pub fn back(&mut self, current: usize) -> Option<usize> {
        let pos = self.back.pop()?;
        self.forward.push(current);
        Some(pos)
    }

    pub fn forward(&mut self, current: usize) -> Option<usize> {
        let pos = self.forward.pop()?;
        self.back.push(current);
        Some(pos)
    }

    pub fn clear(&mut self) {
        self.back.clear();
        self.forward.clear();
    }
}

/// `ctrl+]`: jump to the top-level definition of the identifier under the
/// cursor. Failures are reported and leave the cursor where it is.
pub fn goto_definition(editor: &mut Editor) -> Result<(), EditError> {
    let pos = editor.position();
    let Some(name) = word_at(&editor.buffer, pos) else {
        editor.message("No identifier under cursor");
        return Ok(());
    };
    let source = editor.buffer.to_string();
    match editor.locators.lookup(&editor.grammar.name, &source, &name) {
        Ok(Lookup::Found(location)) => {
            editor.jumps.push(pos);
            let target = editor.buffer.offset_at(location.line, location.column);
            editor.set_cursor(target);
            editor.window.center_on_cursor(&editor.buffer);
        }
        Ok(Lookup::NotFound) => {
            editor.message(format!("Definition of {} not found", name));
        }
        Ok(Lookup::Unsupported) => {
            let message = format!("Goto definition is not available for {}", editor.grammar.name);
            editor.message(message);
        }
        Err(DefinitionError::Parse { line }) => {
            warn!(line, "definition lookup hit a syntax error");
            editor.message(format!("Syntax error on line {}", line));
            editor.request(HostAction::ReportLineError(line));
        }
        Err(err) => {
            warn!(error = %err, "definition lookup failed");
            editor.message(err.to_string());
        }
    }
    Ok(())
}

/// `ctrl+o` / `ctrl+i`
pub fn jump(editor: &mut Editor, back: bool) -> Result<(), EditError> {
    let current = editor.position();
    let target = if back {
        editor.jumps.back(current)
    } else {
        editor.jumps.forward(current)
    };
    if let Some(target) = target {
        editor.set_cursor(target);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::test_support::{editor, keys};

    const SOURCE: &str = "def f():\n    x = 1\n    return x\n\nprint(f())";

    #[test]
    fn test_jump_list() {
        let mut jumps = JumpList::default();
        jumps.push(10);
        jumps.push(20);
        assert_eq!(jumps.back(30), Some(20));
        assert_eq!(jumps.back(20), Some(10));
        assert_eq!(jumps.back(10), None);
        assert_eq!(jumps.forward(10), Some(20));
        jumps.push(5);
        assert_eq!(jumps.forward(5), None);
    }

    #[test]
    fn test_goto_definition_and_back() {
        let mut ed = editor(SOURCE);
        keys(&mut ed, "5Gww");
        assert_eq!(ed.cursor_position(), (4, 6));
        keys(&mut ed, "<C-]>");
        assert_eq!(ed.cursor_position(), (0, 4));
        keys(&mut ed, "<C-o>");
        assert_eq!(ed.cursor_position(), (4, 6));
        keys(&mut ed, "<C-i>");
        assert_eq!(ed.cursor_position(), (0, 4));
    }

    #[test]
    fn test_missing_definition_keeps_cursor() {
        let mut ed = editor(SOURCE);
        let outcome = keys(&mut ed, "G0<C-]>");
        assert_eq!(ed.cursor_position(), (4, 0));
        assert_eq!(outcome.message.as_deref(), Some("Definition of print not found"));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let mut ed = editor("def ok():\n    pass\n\ndef broken(:\n    pass");
        let outcome = keys(&mut ed, "<C-]>");
        assert_eq!(ed.cursor_position(), (0, 0));
        assert!(outcome.host_actions.iter().any(|a| matches!(a, HostAction::ReportLineError(_))));
    }

    #[test]
    fn test_unsupported_grammar() {
        let mut ed = editor("proc f {} {}\nf");
        ed.set_grammar("tcl").unwrap();
        let outcome = keys(&mut ed, "j<C-]>");
        assert_eq!(ed.cursor_position(), (1, 0));
        assert_eq!(outcome.message.as_deref(), Some("Goto definition is not available for tcl"));
    }
}
