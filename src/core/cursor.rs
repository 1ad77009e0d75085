//! Cursor Model
//!
//! A cursor is a position plus an anchor. When both are equal there is no
//! selection. Selections are half-open: `start()..end()`.

use std::cmp::{max, min};
use std::ops::Range;

// =============================================================================
// CURSOR STRUCT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Where the selection started
    pub anchor: usize,
    /// Where the cursor is
    pub position: usize,
}

impl Cursor {
    /// A cursor with no selection
    pub fn at(pos: usize) -> Self {
        Self {
            anchor: pos,
            position: pos,
        }
    }

    pub fn new(anchor: usize, position: usize) -> Self {
        Self { anchor, position }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    pub fn start(&self) -> usize {
        min(self.anchor, self.position)
    }

    pub fn end(&self) -> usize {
        max(self.anchor, self.position)
    }

    pub fn selection(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Move the cursor, keeping the anchor when extending
    pub fn move_to(&mut self, pos: usize, extend: bool) {
        self.position = pos;
        if !extend {
            self.anchor = pos;
        }
    }

    /// Drop the selection, keeping the position
    pub fn collapse(&mut self) {
        self.anchor = self.position;
    }

    /// Keep both ends inside a document of `len` chars
    pub fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.position = self.position.min(len);
    }
}
