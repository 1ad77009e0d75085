//! Buffer: text content plus edit history
//! No cursor, scrolling, or mode state (those belong to Window and Editor)
//!
//! Uses a ropey Rope. Every offset in this module is a char offset, lines
//! and columns are zero-based, and columns never include the line break.

use ropey::Rope;
use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

use regex::Regex;
use tracing::{debug, trace};

use crate::core::error::EditError;
use crate::core::undo_group::UndoGroup;

/// Maximum undo stack depth to prevent OOM from unbounded undo history
const MAX_UNDO_DEPTH: usize = 10_000;

/// Represents an edit operation for undo/redo
#[derive(Debug, Clone)]
pub enum Edit {
    /// Insert: (position, text inserted)
    Insert { pos: usize, text: Rope },
    /// Delete: (position, text deleted)
    Delete { pos: usize, text: Rope },
}

impl Edit {
    pub fn position(&self) -> usize {
        match self {
            Edit::Insert { pos, .. } | Edit::Delete { pos, .. } => *pos,
        }
    }
}

/// Lines touched since the last highlight pass, in current coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyLines {
    pub first: usize,
    pub last: usize,
}

/// Buffer: text and edit history
#[derive(Debug)]
pub struct Buffer {
    rope: Rope,
    /// Version counter, bumped on every mutation
    pub version: u64,
    undo_stack: VecDeque<UndoGroup>,
    redo_stack: VecDeque<UndoGroup>,
    /// Group currently collecting edits
    open_group: Option<UndoGroup>,
    /// Edit count at each nested `begin_group`
    group_marks: Vec<usize>,
    dirty: Option<DirtyLines>,
}

impl Buffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::from_string("")
    }

    /// Create a buffer from text
    pub fn from_string(content: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(content.as_ref()),
            version: 0,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            open_group: None,
            group_marks: Vec::new(),
            dirty: None,
        }
    }

    // ==================== Queries ====================

    /// Length in chars
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines (a trailing newline opens an empty last line)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn last_line(&self) -> usize {
        self.line_count().saturating_sub(1)
    }

    /// Text of a line without its line break
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.line_count() {
            return None;
        }
        let mut text = self.rope.line(line_idx).to_string();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Text of a line, empty when the line does not exist
    pub fn line_text(&self, line_idx: usize) -> String {
        self.line(line_idx).unwrap_or_default()
    }

    /// Length of a line in chars, without its line break
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line_idx);
        let mut len = slice.len_chars();
        while len > 0 {
            match slice.char(len - 1) {
                '\n' | '\r' => len -= 1,
                _ => break,
            }
        }
        len
    }

    /// Offset of the first char of a line, clamped to the last line
    pub fn line_start(&self, line_idx: usize) -> usize {
        self.rope.line_to_char(line_idx.min(self.last_line()))
    }

    /// Offset just past the last char of a line (before its line break)
    pub fn line_end(&self, line_idx: usize) -> usize {
        let line_idx = line_idx.min(self.last_line());
        self.line_start(line_idx) + self.line_len(line_idx)
    }

    /// Line containing an offset (clamped)
    pub fn line_of(&self, pos: usize) -> usize {
        self.rope.char_to_line(pos.min(self.len_chars()))
    }

    /// Column of an offset within its line
    pub fn column_of(&self, pos: usize) -> usize {
        let pos = pos.min(self.len_chars());
        pos - self.line_start(self.line_of(pos))
    }

    /// Offset of (line, column), both clamped
    pub fn offset_at(&self, line_idx: usize, column: usize) -> usize {
        let line_idx = line_idx.min(self.last_line());
        self.line_start(line_idx) + column.min(self.line_len(line_idx))
    }

    /// Offset of the first non-blank char of a line (line end when blank)
    pub fn first_non_blank(&self, line_idx: usize) -> usize {
        let start = self.line_start(line_idx);
        let indent = self
            .line_text(line_idx)
            .chars()
            .take_while(|c| c.is_whitespace())
            .count();
        start + indent
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.rope.get_char(pos)
    }

    /// Text of a char range, clamped to the document
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    // ==================== Editing Operations ====================

    /// Insert text at a char offset
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<(), EditError> {
        let len = self.len_chars();
        if pos > len {
            return Err(EditError::OutOfRange { pos, len });
        }
        if text.is_empty() {
            return Ok(());
        }
        let rope_text = Rope::from_str(text);
        self.raw_insert(pos, &rope_text);
        self.record(Edit::Insert {
            pos,
            text: rope_text,
        });
        Ok(())
    }

    /// Delete a char range, returning the removed text
    pub fn delete(&mut self, range: Range<usize>) -> Result<String, EditError> {
        let len = self.len_chars();
        if range.start > range.end {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > len {
            return Err(EditError::OutOfRange {
                pos: range.end,
                len,
            });
        }
        if range.is_empty() {
            return Ok(String::new());
        }
        let removed = Rope::from(self.rope.slice(range.clone()));
        let text = removed.to_string();
        self.raw_remove(range.start, &removed);
        self.record(Edit::Delete {
            pos: range.start,
            text: removed,
        });
        Ok(text)
    }

    /// Replace a char range with text, returning the removed text
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<String, EditError> {
        let start = range.start;
        let removed = self.delete(range)?;
        self.insert(start, text)?;
        Ok(removed)
    }

    fn raw_insert(&mut self, pos: usize, text: &Rope) {
        let line = self.line_of(pos);
        let newlines = text.len_lines() - 1;
        let mut idx = pos;
        for chunk in text.chunks() {
            self.rope.insert(idx, chunk);
            idx += chunk.chars().count();
        }
        self.mark_dirty(line, line + newlines, newlines as isize);
        self.version += 1;
    }

    fn raw_remove(&mut self, pos: usize, text: &Rope) {
        let line = self.line_of(pos);
        let newlines = text.len_lines() - 1;
        self.rope.remove(pos..pos + text.len_chars());
        self.mark_dirty(line, line, -(newlines as isize));
        self.version += 1;
    }

    fn record(&mut self, edit: Edit) {
        self.redo_stack.clear();
        match self.open_group.as_mut() {
            Some(group) => group.add_edit(edit),
            None => {
                let mut group = UndoGroup::new();
                group.add_edit(edit);
                self.push_undo(group);
            }
        }
    }

    fn push_undo(&mut self, group: UndoGroup) {
        if self.undo_stack.len() >= MAX_UNDO_DEPTH {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(group);
    }

    // ==================== Edit Groups ====================

    /// Open a (possibly nested) edit group
    pub fn begin_group(&mut self, description: &str) {
        let group = self
            .open_group
            .get_or_insert_with(|| UndoGroup::with_description(description));
        self.group_marks.push(group.len());
    }

    pub fn in_group(&self) -> bool {
        !self.group_marks.is_empty()
    }

    /// Close the innermost group; the outermost one lands on the undo stack
    pub fn commit_group(&mut self) {
        if self.group_marks.pop().is_none() || !self.group_marks.is_empty() {
            return;
        }
        if let Some(group) = self.open_group.take() {
            if !group.is_empty() {
                self.push_undo(group);
            }
        }
    }

    /// Revert every edit made since the innermost `begin_group`
    pub fn rollback_group(&mut self) {
        let Some(mark) = self.group_marks.pop() else {
            return;
        };
        let reverted = match self.open_group.as_mut() {
            Some(group) => group.edits.split_off(mark),
            None => Vec::new(),
        };
        debug!(edits = reverted.len(), "rolling back edit group");
        for edit in reverted.iter().rev() {
            self.revert(edit);
        }
        if self.group_marks.is_empty() {
            if let Some(group) = self.open_group.take() {
                if !group.is_empty() {
                    self.push_undo(group);
                }
            }
        }
    }

    fn revert(&mut self, edit: &Edit) {
        match edit {
            Edit::Insert { pos, text } => self.raw_remove(*pos, text),
            Edit::Delete { pos, text } => self.raw_insert(*pos, text),
        }
    }

    fn reapply(&mut self, edit: &Edit) {
        match edit {
            Edit::Insert { pos, text } => self.raw_insert(*pos, text),
            Edit::Delete { pos, text } => self.raw_remove(*pos, text),
        }
    }

    // ==================== Undo/Redo ====================

    /// Undo the last group, returning where the cursor should go
    pub fn undo(&mut self) -> Result<usize, EditError> {
        while self.in_group() {
            self.commit_group();
        }
        let group = self.undo_stack.pop_back().ok_or(EditError::NothingToUndo)?;
        for edit in group.edits.iter().rev() {
            self.revert(edit);
        }
        let pos = group.anchor_position().unwrap_or(0);
        trace!(edits = group.len(), "undo");
        self.redo_stack.push_back(group);
        Ok(pos.min(self.len_chars()))
    }

    /// Redo the last undone group, returning where the cursor should go
    pub fn redo(&mut self) -> Result<usize, EditError> {
        let group = self.redo_stack.pop_back().ok_or(EditError::NothingToRedo)?;
        for edit in &group.edits {
            self.reapply(edit);
        }
        let pos = group.anchor_position().unwrap_or(0);
        trace!(edits = group.len(), "redo");
        self.undo_stack.push_back(group);
        Ok(pos.min(self.len_chars()))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    // ==================== Dirty Tracking ====================

    fn mark_dirty(&mut self, first: usize, last: usize, line_delta: isize) {
        let merged = match self.dirty {
            Some(mut dirty) => {
                if dirty.last > first {
                    dirty.last = (dirty.last as isize + line_delta).max(first as isize) as usize;
                }
                DirtyLines {
                    first: dirty.first.min(first),
                    last: dirty.last.max(last),
                }
            }
            None => DirtyLines { first, last },
        };
        self.dirty = Some(merged);
    }

    /// Take the lines touched since the last call
    pub fn take_dirty(&mut self) -> Option<DirtyLines> {
        self.dirty.take()
    }

    // ==================== Search Operations ====================

    /// All matches of a regex as char ranges
    pub fn find_all(&self, pattern: &Regex) -> Vec<Range<usize>> {
        let text = self.rope.to_string();
        let mut results = Vec::new();
        let mut chars_before = 0;
        let mut last_byte = 0;
        for m in pattern.find_iter(&text) {
            if m.start() == m.end() {
                continue;
            }
            chars_before += text[last_byte..m.start()].chars().count();
            let len = m.as_str().chars().count();
            results.push(chars_before..chars_before + len);
            chars_before += len;
            last_byte = m.end();
        }
        results
    }

    /// Replace every literal occurrence of `needle`, returning the count
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize, EditError> {
        if needle.is_empty() {
            return Ok(0);
        }
        let pattern = Regex::new(&regex::escape(needle))?;
        let matches = self.find_all(&pattern);
        for range in matches.iter().rev() {
            self.replace(range.clone(), replacement)?;
        }
        Ok(matches.len())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
