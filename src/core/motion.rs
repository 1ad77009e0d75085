//! Motions
//!
//! A motion maps a cursor offset to a target offset. Motions never fail:
//! anything past a document or line bound is clamped.

use std::ops::Range;

use crate::core::buffer::Buffer;
use crate::core::text::{CharClass, char_class};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    /// Column 0
    LineStart,
    /// Just past the last char of the line
    LineEnd,
    /// On the last char of the line
    LastChar,
    FirstNonBlank,
    WordForward,
    WordEnd,
    WordBackward,
    /// Find the captured char on the current line
    FindChar { backward: bool },
    DocumentStart,
    DocumentEnd,
    JumpDown,
    JumpUp,
}

/// Everything a motion may need besides the buffer and the start offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionArgs {
    pub count: usize,
    /// Char captured by an argument chord (`f?`)
    pub literal: Option<char>,
    /// Explicit 1-based line for `gg`/`G`
    pub line: Option<usize>,
    /// Sticky column for vertical motions
    pub column: Option<usize>,
    pub jump_lines: usize,
}

impl Default for MotionArgs {
    fn default() -> Self {
        Self {
            count: 1,
            literal: None,
            line: None,
            column: None,
            jump_lines: 10,
        }
    }
}

impl MotionArgs {
    pub fn with_count(count: usize) -> Self {
        Self {
            count: count.max(1),
            ..Self::default()
        }
    }
}

impl Motion {
    /// Operators act on whole lines for these
    pub fn is_linewise(self) -> bool {
        matches!(
            self,
            Motion::Up
                | Motion::Down
                | Motion::DocumentStart
                | Motion::DocumentEnd
                | Motion::JumpDown
                | Motion::JumpUp
        )
    }

    /// Operators include the char at the target for these
    pub fn is_inclusive(self) -> bool {
        matches!(
            self,
            Motion::WordEnd | Motion::LastChar | Motion::FindChar { backward: false }
        )
    }

    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Motion::Up | Motion::Down | Motion::JumpDown | Motion::JumpUp
        )
    }

    /// Target offset of this motion from `pos`
    pub fn target(self, buffer: &Buffer, pos: usize, args: &MotionArgs) -> usize {
        let pos = pos.min(buffer.len_chars());
        let count = args.count.max(1);
        let line = buffer.line_of(pos);
        let column = buffer.column_of(pos);

        match self {
            Motion::Left => pos - count.min(column),
            Motion::Right => (pos + count).min(buffer.line_end(line)),
            Motion::Up => vertical(buffer, line.saturating_sub(count), column, args),
            Motion::Down => vertical(buffer, line.saturating_add(count), column, args),
            Motion::JumpUp => {
                let lines = count.saturating_mul(args.jump_lines);
                vertical(buffer, line.saturating_sub(lines), column, args)
            }
            Motion::JumpDown => {
                let lines = count.saturating_mul(args.jump_lines);
                vertical(buffer, line.saturating_add(lines), column, args)
            }
            Motion::LineStart => buffer.line_start(line),
            Motion::LineEnd => buffer.line_end(line),
            Motion::LastChar => buffer.line_end(line).saturating_sub(1).max(buffer.line_start(line)),
            Motion::FirstNonBlank => buffer.first_non_blank(line),
            Motion::WordForward => repeat(count, pos, |p| word_forward(buffer, p)),
            Motion::WordEnd => repeat(count, pos, |p| word_end(buffer, p)),
            Motion::WordBackward => repeat(count, pos, |p| word_backward(buffer, p)),
            Motion::FindChar { backward } => match args.literal {
                Some(target) => find_char(buffer, pos, target, count, backward).unwrap_or(pos),
                None => pos,
            },
            Motion::DocumentStart => match args.line {
                Some(n) => buffer.first_non_blank(n.saturating_sub(1)),
                None => 0,
            },
            Motion::DocumentEnd => match args.line {
                Some(n) => buffer.first_non_blank(n.saturating_sub(1)),
                None => buffer.len_chars(),
            },
        }
    }

    /// Range an operator (`d`, `c`, `y`) covers for this motion, and
    /// whether it is linewise
    pub fn operator_range(self, buffer: &Buffer, pos: usize, args: &MotionArgs) -> (Range<usize>, bool) {
        let pos = pos.min(buffer.len_chars());
        let target = self.target(buffer, pos, args);

        if self.is_linewise() {
            let first = buffer.line_of(pos.min(target));
            let last = buffer.line_of(pos.max(target));
            return (line_span(buffer, first, last), true);
        }

        let mut end = target;
        if self.is_inclusive() && target >= pos && target < buffer.len_chars() {
            end = target + 1;
        }
        // `dw` on the last word of a line stops at the line break
        if self == Motion::WordForward {
            let start_line = buffer.line_of(pos);
            let target_line = buffer.line_of(end);
            if target_line > start_line {
                end = buffer.line_end(target_line - 1).max(pos);
            }
        }
        (pos.min(end)..pos.max(end), false)
    }
}

/// Range covering lines `first..=last`, including the line break that
/// separates them from their neighbours
pub fn line_span(buffer: &Buffer, first: usize, last: usize) -> Range<usize> {
    let last_line = buffer.last_line();
    let first = first.min(last_line);
    let last = last.min(last_line);
    if last < last_line {
        buffer.line_start(first)..buffer.line_start(last + 1)
    } else if first > 0 {
        buffer.line_end(first - 1)..buffer.len_chars()
    } else {
        0..buffer.len_chars()
    }
}

fn vertical(buffer: &Buffer, line: usize, column: usize, args: &MotionArgs) -> usize {
    buffer.offset_at(line, args.column.unwrap_or(column))
}

fn repeat(count: usize, pos: usize, step: impl Fn(usize) -> usize) -> usize {
    (0..count).fold(pos, |p, _| step(p))
}

fn class_at(buffer: &Buffer, pos: usize) -> CharClass {
    buffer.char_at(pos).map_or(CharClass::Whitespace, char_class)
}

fn word_forward(buffer: &Buffer, pos: usize) -> usize {
    let len = buffer.len_chars();
    let mut p = pos;
    if p >= len {
        return len;
    }
    let class = class_at(buffer, p);
    if class != CharClass::Whitespace {
        while p < len && class_at(buffer, p) == class {
            p += 1;
        }
    }
    while p < len && class_at(buffer, p) == CharClass::Whitespace {
        p += 1;
    }
    p
}

fn word_end(buffer: &Buffer, pos: usize) -> usize {
    let len = buffer.len_chars();
    if len == 0 {
        return 0;
    }
    let mut p = pos + 1;
    while p < len && class_at(buffer, p) == CharClass::Whitespace {
        p += 1;
    }
    if p >= len {
        return len - 1;
    }
    let class = class_at(buffer, p);
    while p + 1 < len && class_at(buffer, p + 1) == class {
        p += 1;
    }
    p
}

fn word_backward(buffer: &Buffer, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = pos - 1;
    while p > 0 && class_at(buffer, p) == CharClass::Whitespace {
        p -= 1;
    }
    let class = class_at(buffer, p);
    while p > 0 && class_at(buffer, p - 1) == class {
        p -= 1;
    }
    p
}

fn find_char(buffer: &Buffer, pos: usize, target: char, count: usize, backward: bool) -> Option<usize> {
    let line = buffer.line_of(pos);
    let start = buffer.line_start(line);
    let column = pos - start;
    let chars: Vec<char> = buffer.line_text(line).chars().collect();

    let found = if backward {
        chars[..column.min(chars.len())]
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| **c == target)
            .nth(count - 1)
            .map(|(i, _)| i)
    } else {
        chars
            .iter()
            .enumerate()
            .skip(column + 1)
            .filter(|(_, c)| **c == target)
            .nth(count - 1)
            .map(|(i, _)| i)
    };
    found.map(|col| start + col)
}
