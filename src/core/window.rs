//! Window: cursor and viewport over a buffer
//! The window owns no text; every method takes the buffer it views.

use crate::core::buffer::Buffer;
use crate::core::cursor::Cursor;
use crate::core::motion::{Motion, MotionArgs};

#[derive(Debug, Clone)]
pub struct Window {
    pub cursor: Cursor,
    /// First visible line
    pub scroll_offset: usize,
    /// Visible lines
    pub height: usize,
    /// Column kept across vertical motions
    pub preferred_column: Option<usize>,
}

impl Window {
    pub fn new(height: usize) -> Self {
        Self {
            cursor: Cursor::default(),
            scroll_offset: 0,
            height: height.max(1),
            preferred_column: None,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position
    }

    /// Place the cursor, dropping any selection
    pub fn set_cursor(&mut self, buffer: &Buffer, pos: usize) {
        self.cursor = Cursor::at(pos.min(buffer.len_chars()));
        self.preferred_column = None;
    }

    pub fn set_selection(&mut self, buffer: &Buffer, anchor: usize, position: usize) {
        let len = buffer.len_chars();
        self.cursor = Cursor::new(anchor.min(len), position.min(len));
        self.preferred_column = None;
    }

    /// Apply a motion, returning the resulting cursor
    pub fn move_cursor(&mut self, buffer: &Buffer, motion: Motion, args: &MotionArgs, extend: bool) -> Cursor {
        let pos = self.cursor.position;
        let column = if motion.is_vertical() {
            Some(self.preferred_column.unwrap_or_else(|| buffer.column_of(pos)))
        } else {
            None
        };
        let args = MotionArgs { column, ..*args };
        let target = motion.target(buffer, pos, &args);
        self.cursor.move_to(target, extend);
        self.preferred_column = column;
        self.ensure_cursor_visible(buffer);
        self.cursor
    }

    /// Cursor line and column
    pub fn line_col(&self, buffer: &Buffer) -> (usize, usize) {
        let pos = self.cursor.position;
        (buffer.line_of(pos), buffer.column_of(pos))
    }

    /// Keep the cursor inside the document
    pub fn ensure_cursor_valid(&mut self, buffer: &Buffer) {
        self.cursor.clamp(buffer.len_chars());
    }

    /// Scroll only when the cursor leaves the viewport
    pub fn ensure_cursor_visible(&mut self, buffer: &Buffer) {
        let line = buffer.line_of(self.cursor.position);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + self.height {
            self.scroll_offset = line + 1 - self.height;
        }
    }

    /// Put the cursor line in the middle of the viewport
    pub fn center_on_cursor(&mut self, buffer: &Buffer) {
        let line = buffer.line_of(self.cursor.position);
        self.scroll_offset = line.saturating_sub(self.height / 2);
    }

    /// Scroll by a number of lines (positive = down, negative = up);
    /// the cursor is pulled back into view
    pub fn scroll_by(&mut self, lines: isize, buffer: &Buffer) {
        let max_scroll = buffer.line_count().saturating_sub(1);
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(lines)
            .min(max_scroll);

        let (line, column) = self.line_col(buffer);
        let last_visible = self.scroll_offset + self.height - 1;
        let clamped = line.clamp(self.scroll_offset, last_visible);
        if clamped != line {
            self.cursor = Cursor::at(buffer.offset_at(clamped, column));
        }
    }

    /// Visible line range (start, end exclusive)
    pub fn visible_range(&self, buffer: &Buffer) -> (usize, usize) {
        let start = self.scroll_offset;
        let end = (self.scroll_offset + self.height).min(buffer.line_count());
        (start, end)
    }
}
