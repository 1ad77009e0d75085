//! Literal search state
//!
//! The term is matched literally and matches are recomputed whenever the
//! buffer changes; `next`/`previous` wrap at the document bounds.

use std::ops::Range;

use regex::Regex;

use crate::core::buffer::Buffer;
use crate::core::error::EditError;

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: Option<String>,
    whole_word: bool,
    pattern: Option<Regex>,
    matches: Vec<Range<usize>>,
    version: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Start searching for `term`; `whole_word` only matches it between
    /// word boundaries
    pub fn set(&mut self, term: &str, whole_word: bool, buffer: &Buffer) -> Result<usize, EditError> {
        if term.is_empty() {
            self.clear();
            return Ok(0);
        }
        let escaped = regex::escape(term);
        let source = if whole_word {
            format!(r"\b{}\b", escaped)
        } else {
            escaped
        };
        self.pattern = Some(Regex::new(&source)?);
        self.term = Some(term.to_string());
        self.whole_word = whole_word;
        self.refresh(buffer);
        Ok(self.matches.len())
    }

    /// Drop the highlighted matches; the term is kept for `n`/`N`
    pub fn clear(&mut self) {
        self.pattern = None;
        self.matches.clear();
    }

    /// Recompute matches if the buffer changed since the last pass
    pub fn refresh(&mut self, buffer: &Buffer) {
        let Some(pattern) = &self.pattern else {
            return;
        };
        self.matches = buffer.find_all(pattern);
        self.version = buffer.version;
    }

    pub fn is_stale(&self, buffer: &Buffer) -> bool {
        self.pattern.is_some() && self.version != buffer.version
    }

    /// Re-arm a cleared search with the last term
    pub fn resume(&mut self, buffer: &Buffer) -> Result<(), EditError> {
        if self.pattern.is_none() {
            if let Some(term) = self.term.clone() {
                self.set(&term, self.whole_word, buffer)?;
            }
        }
        Ok(())
    }

    /// Start of the `count`-th match after `pos`, wrapping around. The walk
    /// starts from the match nearest to `pos`.
    pub fn next(&self, pos: usize, count: usize) -> Option<usize> {
        let n = self.matches.len();
        let nearest = self.nearest_index(pos)?;
        let mut steps = count.max(1);
        if self.matches[nearest].start > pos {
            steps -= 1;
        }
        Some(self.matches[(nearest + steps % n) % n].start)
    }

    /// Start of the `count`-th match before `pos`, wrapping around
    pub fn previous(&self, pos: usize, count: usize) -> Option<usize> {
        let n = self.matches.len();
        let nearest = self.nearest_index(pos)?;
        let mut steps = count.max(1);
        if self.matches[nearest].start < pos {
            steps -= 1;
        }
        Some(self.matches[(nearest + n - steps % n) % n].start)
    }

    /// Match whose start is nearest to `pos`; ties go to the earlier one
    pub fn nearest(&self, pos: usize) -> Option<usize> {
        self.nearest_index(pos).map(|i| self.matches[i].start)
    }

    fn nearest_index(&self, pos: usize) -> Option<usize> {
        self.matches
            .iter()
            .enumerate()
            .min_by_key(|(i, m)| (m.start.abs_diff(pos), *i))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_previous_wrap() {
        let buffer = Buffer::from_string("foo bar foo baz foo");
        let mut search = SearchState::new();
        assert_eq!(search.set("foo", false, &buffer).unwrap(), 3);
        assert_eq!(search.next(0, 1), Some(8));
        assert_eq!(search.next(16, 1), Some(0));
        assert_eq!(search.next(0, 2), Some(16));
        assert_eq!(search.previous(8, 1), Some(0));
        assert_eq!(search.previous(0, 1), Some(16));
        assert_eq!(search.previous(16, 2), Some(0));
    }

    #[test]
    fn test_whole_word_and_literal() {
        let buffer = Buffer::from_string("x xs x.y x");
        let mut search = SearchState::new();
        assert_eq!(search.set("x", true, &buffer).unwrap(), 3);
        assert_eq!(search.set("x.", false, &buffer).unwrap(), 1);
        assert_eq!(search.set("(", false, &Buffer::from_string("f(a) (")).unwrap(), 2);
    }

    #[test]
    fn test_nearest_breaks_ties_early() {
        let buffer = Buffer::from_string("ab....ab....ab");
        let mut search = SearchState::new();
        search.set("ab", false, &buffer).unwrap();
        assert_eq!(search.nearest(3), Some(0));
        assert_eq!(search.nearest(5), Some(6));
        // Equidistant from 0 and 6: the walk starts at 0
        assert_eq!(search.next(3, 1), Some(6));
        assert_eq!(search.previous(3, 1), Some(0));
        assert_eq!(search.next(7, 1), Some(12));
        assert_eq!(search.previous(13, 1), Some(12));
    }

    #[test]
    fn test_clear_and_resume() {
        let mut buffer = Buffer::from_string("one two one");
        let mut search = SearchState::new();
        search.set("one", false, &buffer).unwrap();
        search.clear();
        assert!(search.matches().is_empty());
        assert_eq!(search.term(), Some("one"));
        search.resume(&buffer).unwrap();
        assert_eq!(search.matches().len(), 2);

        buffer.insert(0, "one ").unwrap();
        assert!(search.is_stale(&buffer));
        search.refresh(&buffer);
        assert_eq!(search.matches().len(), 3);
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let buffer = Buffer::from_string("héllo wörld héllo");
        let mut search = SearchState::new();
        search.set("héllo", false, &buffer).unwrap();
        assert_eq!(search.matches(), &[0..5, 12..17]);
    }
}
