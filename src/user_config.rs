// scripter default configuration
// Edit this file to change the default chord tables and settings

use crate::config::Config;
use crate::core::command::{Action, CommentOp, InsertEntry, Prompt};
use crate::core::error::KeyParseError;
use crate::core::keymap::KeyTable::{LeaderNormal, LeaderVisual, Normal, Visual};
use crate::core::mode::Mode;
use crate::core::motion::Motion;

/// Motions shared by Normal and both visual modes
const MOTIONS: &[(&str, Motion)] = &[
    ("h", Motion::Left),
    ("j", Motion::Down),
    ("k", Motion::Up),
    ("l", Motion::Right),
    ("0", Motion::LineStart),
    ("$", Motion::LineEnd),
    ("^", Motion::FirstNonBlank),
    ("_", Motion::FirstNonBlank),
    ("w", Motion::WordForward),
    ("e", Motion::WordEnd),
    ("b", Motion::WordBackward),
    ("f?", Motion::FindChar { backward: false }),
    ("F?", Motion::FindChar { backward: true }),
    ("gg", Motion::DocumentStart),
    ("G", Motion::DocumentEnd),
    ("ctrl+d", Motion::JumpDown),
    ("ctrl+u", Motion::JumpUp),
];

/// Motions the `d`, `c` and `y` operators combine with
const OPERATOR_MOTIONS: &[(&str, Motion)] = &[
    ("0", Motion::LineStart),
    ("_", Motion::FirstNonBlank),
    ("$", Motion::LineEnd),
    ("b", Motion::WordBackward),
    ("e", Motion::WordEnd),
    ("w", Motion::WordForward),
    ("f?", Motion::FindChar { backward: false }),
    ("F?", Motion::FindChar { backward: true }),
    ("h", Motion::Left),
    ("j", Motion::Down),
    ("k", Motion::Up),
    ("l", Motion::Right),
    ("gg", Motion::DocumentStart),
    ("G", Motion::DocumentEnd),
];

/// User configuration function
pub fn configure(config: &mut Config) -> Result<(), KeyParseError> {
    // Settings
    config.set("tab_width", 4);
    config.set("leader_key", ",");
    config.set("leader_timeout_ms", 1000);
    config.set("chord_timeout_ms", 0);
    config.set("redeliver_unmatched", true);
    config.set("jump_lines", 10);
    config.set("scroll_lines", 1);
    config.set("view_height", 40);
    config.set("grammar", "python");

    for &(keys, motion) in MOTIONS {
        config.bind(Normal, keys, Action::Move(motion))?;
        config.bind(Visual, keys, Action::Move(motion))?;
    }
    // Normal `$` rests on the last char; the half-open selection needs the
    // line end
    config.bind(Normal, "$", Action::Move(Motion::LastChar))?;

    // Operators
    for &(keys, motion) in OPERATOR_MOTIONS {
        config.bind(Normal, &format!("d{}", keys), Action::Delete(motion))?;
        config.bind(Normal, &format!("c{}", keys), Action::Change(motion))?;
        config.bind(Normal, &format!("y{}", keys), Action::Yank(motion))?;
    }
    // `cw` behaves like `ce`
    config.bind(Normal, "cw", Action::Change(Motion::WordEnd))?;
    config.bind(Normal, "dd", Action::DeleteLines)?;
    config.bind(Normal, "cc", Action::ChangeLines)?;
    config.bind(Normal, "yy", Action::YankLines)?;
    config.bind(Normal, "D", Action::DeleteToLineEnd)?;
    config.bind(Normal, "C", Action::Change(Motion::LineEnd))?;

    // Editing
    config.bind(Normal, "x", Action::DeleteChar)?;
    config.bind(Normal, "s", Action::SubstituteChar)?;
    config.bind(Normal, "r?", Action::ReplaceChar)?;
    config.bind(Normal, "J", Action::JoinLines)?;
    config.bind(Normal, "p", Action::Paste { before: false })?;
    config.bind(Normal, "P", Action::Paste { before: true })?;
    config.bind(Normal, ">>", Action::Indent)?;
    config.bind(Normal, "<<", Action::Outdent)?;
    config.bind(Normal, "gUaw", Action::Case { upper: true })?;
    config.bind(Normal, "guaw", Action::Case { upper: false })?;
    config.bind(Normal, "ysiw?", Action::Surround)?;
    config.bind(Normal, "ds?", Action::DeleteSurround)?;
    config.bind(Normal, "cs??", Action::ChangeSurround)?;
    config.bind(Normal, "u", Action::Undo)?;
    config.bind(Normal, "ctrl+r", Action::Redo)?;

    // Insert
    config.bind(Normal, "i", Action::Insert(InsertEntry::BeforeCursor))?;
    config.bind(Normal, "a", Action::Insert(InsertEntry::AfterCursor))?;
    config.bind(Normal, "I", Action::Insert(InsertEntry::LineStart))?;
    config.bind(Normal, "A", Action::Insert(InsertEntry::LineEnd))?;
    config.bind(Normal, "o", Action::Insert(InsertEntry::LineBelow))?;
    config.bind(Normal, "O", Action::Insert(InsertEntry::LineAbove))?;

    // Visual
    config.bind(Normal, "v", Action::Visual(Mode::Visual))?;
    config.bind(Normal, "V", Action::Visual(Mode::VisualLine))?;

    // Search
    config.bind(Normal, "*", Action::SearchWord)?;
    config.bind(Normal, "n", Action::SearchNext)?;
    config.bind(Normal, "N", Action::SearchPrevious)?;
    config.bind(Normal, "/", Action::OpenPrompt(Prompt::Search))?;
    config.bind(Normal, ":", Action::OpenPrompt(Prompt::Command))?;
    config.bind(Normal, "ctrl+[", Action::ClearSearch)?;

    // View
    config.bind(Normal, "ctrl+e", Action::ScrollDown)?;
    config.bind(Normal, "ctrl+y", Action::ScrollUp)?;
    config.bind(Normal, "zz", Action::CenterView)?;
    config.bind(Visual, "ctrl+e", Action::ScrollDown)?;
    config.bind(Visual, "ctrl+y", Action::ScrollUp)?;

    // Navigation and host
    config.bind(Normal, "ctrl+]", Action::GotoDefinition)?;
    config.bind(Normal, "ctrl+o", Action::JumpBack)?;
    config.bind(Normal, "ctrl+i", Action::JumpForward)?;
    config.bind(Normal, "gt", Action::NextPage)?;
    config.bind(Normal, "gT", Action::PreviousPage)?;
    config.bind(Normal, "ctrl++", Action::ZoomIn)?;
    config.bind(Normal, "ctrl+=", Action::ZoomIn)?;
    config.bind(Normal, "ctrl+-", Action::ZoomOut)?;

    // Leader
    config.bind(LeaderNormal, "ci", Action::Comment(CommentOp::Toggle))?;
    config.bind(LeaderNormal, "cc", Action::Comment(CommentOp::Comment))?;
    config.bind(LeaderNormal, "cu", Action::Comment(CommentOp::Uncomment))?;
    config.bind(LeaderNormal, "cA", Action::CommentLineEnd)?;
    config.bind(LeaderNormal, "c$", Action::CommentAtCursor)?;

    // Selection
    config.bind(Visual, "d", Action::DeleteSelection)?;
    config.bind(Visual, "x", Action::DeleteSelection)?;
    config.bind(Visual, "c", Action::ChangeSelection)?;
    config.bind(Visual, "y", Action::YankSelection)?;
    config.bind(Visual, "u", Action::Case { upper: false })?;
    config.bind(Visual, "U", Action::Case { upper: true })?;
    config.bind(Visual, ">", Action::Indent)?;
    config.bind(Visual, "<", Action::Outdent)?;
    config.bind(Visual, "v", Action::Visual(Mode::Visual))?;
    config.bind(Visual, "V", Action::Visual(Mode::VisualLine))?;

    config.bind(LeaderVisual, "ci", Action::Comment(CommentOp::Toggle))?;
    config.bind(LeaderVisual, "cc", Action::Comment(CommentOp::Comment))?;
    config.bind(LeaderVisual, "cu", Action::Comment(CommentOp::Uncomment))?;

    Ok(())
}
