//! Character classes and small string helpers shared by motions and commands

use std::ops::Range;

use crate::core::buffer::Buffer;

/// Class of a char for word motions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    /// Alphanumerics and underscore
    Word,
    Punctuation,
}

pub fn char_class(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if is_word_char(c) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Range of the identifier under (or just left of) `pos`
pub fn word_range_at(buffer: &Buffer, pos: usize) -> Option<Range<usize>> {
    let len = buffer.len_chars();
    let anchor = match buffer.char_at(pos) {
        Some(c) if is_word_char(c) => pos,
        _ if pos > 0 && buffer.char_at(pos - 1).is_some_and(is_word_char) => pos - 1,
        _ => return None,
    };
    let mut start = anchor;
    while start > 0 && buffer.char_at(start - 1).is_some_and(is_word_char) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < len && buffer.char_at(end).is_some_and(is_word_char) {
        end += 1;
    }
    Some(start..end)
}

/// Identifier under (or just left of) `pos`
pub fn word_at(buffer: &Buffer, pos: usize) -> Option<String> {
    word_range_at(buffer, pos).map(|range| buffer.slice(range))
}

/// Leading whitespace of a line
pub fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Width of leading whitespace, counting a tab as `tab_width` columns
pub fn indent_width(line: &str, tab_width: usize) -> usize {
    leading_whitespace(line)
        .chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classes() {
        assert_eq!(char_class('a'), CharClass::Word);
        assert_eq!(char_class('_'), CharClass::Word);
        assert_eq!(char_class('9'), CharClass::Word);
        assert_eq!(char_class('('), CharClass::Punctuation);
        assert_eq!(char_class('\n'), CharClass::Whitespace);
    }

    #[test]
    fn test_word_at_inside_and_after() {
        let buf = Buffer::from_string("foo(bar_baz) x");
        assert_eq!(word_at(&buf, 0).as_deref(), Some("foo"));
        assert_eq!(word_at(&buf, 3).as_deref(), Some("foo"));
        assert_eq!(word_at(&buf, 6).as_deref(), Some("bar_baz"));
        assert_eq!(word_at(&buf, 12), None);
        assert_eq!(word_range_at(&buf, 14), Some(13..14));
    }

    #[test]
    fn test_indent_helpers() {
        assert_eq!(leading_whitespace("    x = 1"), "    ");
        assert_eq!(indent_width("\t  y", 4), 6);
        assert_eq!(indent_width("", 4), 0);
    }
}
