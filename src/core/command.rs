//! Command table entries
//!
//! Every binding maps a chord to an `Action`: a tagged variant carrying its
//! bound arguments. Actions are resolved by explicit matching in
//! `commands::execute`, with runtime data (count, captured chars) passed in
//! a `CommandContext`.

use crate::core::mode::Mode;
use crate::core::motion::{Motion, MotionArgs};

/// Where an insert-entering command puts the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    /// `i`
    BeforeCursor,
    /// `a`
    AfterCursor,
    /// `I`
    LineStart,
    /// `A`
    LineEnd,
    /// `o`
    LineBelow,
    /// `O`
    LineAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOp {
    Toggle,
    Comment,
    Uncomment,
}

/// Input line opened by `:` or `/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Command,
    Search,
}

impl Prompt {
    pub fn prefix(self) -> &'static str {
        match self {
            Prompt::Command => ":",
            Prompt::Search => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move, extending the selection in visual modes
    Move(Motion),
    Delete(Motion),
    Change(Motion),
    Yank(Motion),
    DeleteLines,
    ChangeLines,
    YankLines,
    /// `D`: delete to end of line and trim what is left
    DeleteToLineEnd,
    DeleteChar,
    SubstituteChar,
    ReplaceChar,
    JoinLines,
    Paste { before: bool },
    Insert(InsertEntry),
    /// Enter (or toggle/switch) a visual mode
    Visual(Mode),
    DeleteSelection,
    ChangeSelection,
    YankSelection,
    Indent,
    Outdent,
    /// Word under cursor in Normal, selection in visual modes
    Case { upper: bool },
    Comment(CommentOp),
    CommentLineEnd,
    CommentAtCursor,
    Surround,
    DeleteSurround,
    ChangeSurround,
    SearchWord,
    SearchNext,
    SearchPrevious,
    ClearSearch,
    OpenPrompt(Prompt),
    GotoDefinition,
    JumpBack,
    JumpForward,
    ScrollDown,
    ScrollUp,
    CenterView,
    Undo,
    Redo,
    NextPage,
    PreviousPage,
    ZoomIn,
    ZoomOut,
}

impl Action {
    /// Stable name used for logging and undo group descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Delete(_) => "delete-towards",
            Action::Change(_) => "change-towards",
            Action::Yank(_) => "yank-towards",
            Action::DeleteLines => "delete-lines",
            Action::ChangeLines => "change-lines",
            Action::YankLines => "yank-lines",
            Action::DeleteToLineEnd => "delete-to-line-end",
            Action::DeleteChar => "delete-char",
            Action::SubstituteChar => "substitute-char",
            Action::ReplaceChar => "replace-char",
            Action::JoinLines => "join-lines",
            Action::Paste { .. } => "paste",
            Action::Insert(_) => "insert",
            Action::Visual(_) => "visual",
            Action::DeleteSelection => "delete-selection",
            Action::ChangeSelection => "change-selection",
            Action::YankSelection => "yank-selection",
            Action::Indent => "indent",
            Action::Outdent => "outdent",
            Action::Case { .. } => "change-case",
            Action::Comment(_) => "comment",
            Action::CommentLineEnd => "comment-line-end",
            Action::CommentAtCursor => "comment-at-cursor",
            Action::Surround => "surround",
            Action::DeleteSurround => "delete-surround",
            Action::ChangeSurround => "change-surround",
            Action::SearchWord => "search-word",
            Action::SearchNext => "search-next",
            Action::SearchPrevious => "search-previous",
            Action::ClearSearch => "clear-search",
            Action::OpenPrompt(_) => "open-prompt",
            Action::GotoDefinition => "goto-definition",
            Action::JumpBack => "jump-back",
            Action::JumpForward => "jump-forward",
            Action::ScrollDown => "scroll-down",
            Action::ScrollUp => "scroll-up",
            Action::CenterView => "center-view",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::NextPage => "next-page",
            Action::PreviousPage => "previous-page",
            Action::ZoomIn => "zoom-in",
            Action::ZoomOut => "zoom-out",
        }
    }
}

/// Runtime arguments of a resolved chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Repeat count, at least 1
    pub count: usize,
    /// Whether digits were typed
    pub explicit_count: bool,
    /// Chars captured by `?` fragments, in order
    pub literals: Vec<char>,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::with_count(1)
    }
}

impl CommandContext {
    pub fn with_count(count: usize) -> Self {
        Self {
            count: count.max(1),
            explicit_count: false,
            literals: Vec::new(),
        }
    }

    pub fn literal(&self, index: usize) -> Option<char> {
        self.literals.get(index).copied()
    }

    pub fn motion_args(&self, jump_lines: usize) -> MotionArgs {
        MotionArgs {
            count: self.count,
            literal: self.literal(0),
            line: self.explicit_count.then_some(self.count),
            column: None,
            jump_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_args_from_context() {
        let ctx = CommandContext {
            count: 3,
            explicit_count: true,
            literals: vec!['x'],
        };
        let args = ctx.motion_args(10);
        assert_eq!(args.count, 3);
        assert_eq!(args.literal, Some('x'));
        assert_eq!(args.line, Some(3));

        let implicit = CommandContext::default().motion_args(10);
        assert_eq!(implicit.line, None);
        assert_eq!(implicit.count, 1);
    }

    #[test]
    fn test_names_are_kebab_case() {
        assert_eq!(Action::Delete(Motion::WordForward).name(), "delete-towards");
        assert_eq!(Action::Paste { before: true }.name(), "paste");
        assert_eq!(Prompt::Search.prefix(), "/");
    }
}
