//! Syntax Highlighting Module
//!
//! `highlight_line` is a pure function of one line's text and the carry
//! state left by the previous line. `HighlightCache` remembers each line's
//! outgoing state so that after an edit only the affected lines are
//! re-tokenized.

use std::ops::RangeInclusive;

use tracing::trace;

use crate::core::buffer::{Buffer, DirtyLines};
use crate::core::grammar::{Grammar, MultilineConstruct, TokenClass};

// =============================================================================
// CARRY STATE
// =============================================================================

/// State carried from one line into the next: 0 means "not inside any
/// multi-line construct", otherwise the construct's carry id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HighlightState(u8);

impl HighlightState {
    pub const NONE: HighlightState = HighlightState(0);

    pub fn inside(state: u8) -> Self {
        HighlightState(state)
    }

    pub fn construct_id(self) -> Option<u8> {
        (self.0 != 0).then_some(self.0)
    }

    pub fn is_inside(self) -> bool {
        self.0 != 0
    }
}

// =============================================================================
// HIGHLIGHT SPAN (for rendering)
// =============================================================================

/// A classified region of a line, in char columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    /// Exclusive
    pub end: usize,
    pub class: TokenClass,
}

impl HighlightSpan {
    pub fn new(start: usize, end: usize, class: TokenClass) -> Self {
        Self { start, end, class }
    }
}

// =============================================================================
// LINE TOKENIZER
// =============================================================================

/// Classify one line. Rules apply in grammar order, each overwriting
/// earlier classes on overlap; multi-line constructs apply last.
pub fn highlight_line(
    grammar: &Grammar,
    text: &str,
    incoming: HighlightState,
) -> (Vec<HighlightSpan>, HighlightState) {
    let byte_to_char = char_index_map(text);
    let mut classes: Vec<Option<TokenClass>> = vec![None; text.chars().count()];
    let mut paint = |start: usize, end: usize, class: TokenClass| {
        for slot in &mut classes[byte_to_char[start]..byte_to_char[end]] {
            *slot = Some(class);
        }
    };

    for rule in &grammar.rules {
        for caps in rule.pattern.captures_iter(text) {
            if let Some(m) = caps.get(rule.group) {
                if m.start() < m.end() {
                    paint(m.start(), m.end(), rule.class);
                }
            }
        }
    }

    let outgoing = scan_constructs(grammar, text, incoming, &mut paint);
    (collect_spans(&classes), outgoing)
}

fn scan_constructs(
    grammar: &Grammar,
    text: &str,
    incoming: HighlightState,
    paint: &mut impl FnMut(usize, usize, TokenClass),
) -> HighlightState {
    let mut pos = 0;

    if let Some(open) = incoming.construct_id().and_then(|id| grammar.construct(id)) {
        match text.find(&open.close) {
            Some(end) => {
                pos = end + open.close.len();
                paint(0, pos, open.class);
            }
            None => {
                paint(0, text.len(), open.class);
                return incoming;
            }
        }
    }

    while let Some((start, construct)) = earliest_open(&grammar.constructs, text, pos) {
        let body = start + construct.open.len();
        match text[body..].find(&construct.close) {
            Some(offset) => {
                let end = body + offset + construct.close.len();
                paint(start, end, construct.class);
                pos = end;
            }
            None => {
                paint(start, text.len(), construct.class);
                return HighlightState::inside(construct.state);
            }
        }
    }
    HighlightState::NONE
}

fn earliest_open<'g>(
    constructs: &'g [MultilineConstruct],
    text: &str,
    from: usize,
) -> Option<(usize, &'g MultilineConstruct)> {
    constructs
        .iter()
        .filter_map(|c| text[from..].find(&c.open).map(|i| (from + i, c)))
        .min_by_key(|(start, _)| *start)
}

/// For every byte offset (and one past the end) the index of the char
/// starting at or after it
fn char_index_map(text: &str) -> Vec<usize> {
    let mut map = vec![0; text.len() + 1];
    let mut count = 0;
    for (index, (byte, c)) in text.char_indices().enumerate() {
        map[byte] = index;
        for slot in &mut map[byte + 1..byte + c.len_utf8()] {
            *slot = index + 1;
        }
        count = index + 1;
    }
    map[text.len()] = count;
    map
}

fn collect_spans(classes: &[Option<TokenClass>]) -> Vec<HighlightSpan> {
    let mut spans: Vec<HighlightSpan> = Vec::new();
    for (col, class) in classes.iter().enumerate() {
        let Some(class) = *class else { continue };
        if class == TokenClass::Plain {
            continue;
        }
        match spans.last_mut() {
            Some(last) if last.end == col && last.class == class => last.end = col + 1,
            _ => spans.push(HighlightSpan::new(col, col + 1, class)),
        }
    }
    spans
}

// =============================================================================
// INCREMENTAL CACHE
// =============================================================================

/// Outgoing carry state of every line of one buffer
#[derive(Debug, Clone, Default)]
pub struct HighlightCache {
    states: Vec<HighlightState>,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State entering `line`
    pub fn state_before(&self, line: usize) -> HighlightState {
        match line {
            0 => HighlightState::NONE,
            n => self.state_after(n - 1),
        }
    }

    /// State leaving `line`
    pub fn state_after(&self, line: usize) -> HighlightState {
        self.states.get(line).copied().unwrap_or_default()
    }

    pub fn invalidate(&mut self) {
        self.states.clear();
    }

    /// Recompute every line
    pub fn rebuild(&mut self, grammar: &Grammar, buffer: &Buffer) -> RangeInclusive<usize> {
        self.states.clear();
        let mut state = HighlightState::NONE;
        for line in 0..buffer.line_count() {
            state = highlight_line(grammar, &buffer.line_text(line), state).1;
            self.states.push(state);
        }
        0..=buffer.last_line()
    }

    /// Re-tokenize from the first dirty line until a line's outgoing state
    /// matches the recorded one past the dirty region, returning the lines
    /// that were recomputed
    pub fn update(
        &mut self,
        grammar: &Grammar,
        buffer: &Buffer,
        dirty: DirtyLines,
    ) -> RangeInclusive<usize> {
        if self.states.is_empty() {
            return self.rebuild(grammar, buffer);
        }
        let count = buffer.line_count();
        let first = dirty.first.min(count - 1);
        let last = dirty.last.min(count - 1).max(first);

        // Keep entries past the dirty region aligned with their lines
        let old = self.states.len();
        if count > old {
            let filler = std::iter::repeat_n(HighlightState::NONE, count - old);
            self.states.splice(first..first, filler);
        } else if count < old {
            let removed = (old - count).min(old - first);
            self.states.drain(first..first + removed);
        }
        self.states.resize(count, HighlightState::NONE);

        let mut line = first;
        loop {
            let incoming = self.state_before(line);
            let (_, outgoing) = highlight_line(grammar, &buffer.line_text(line), incoming);
            let settled = self.states[line] == outgoing;
            self.states[line] = outgoing;
            if (line >= last && settled) || line + 1 >= count {
                break;
            }
            line += 1;
        }
        trace!(first, line, "re-highlighted");
        first..=line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> Grammar {
        Grammar::python().unwrap()
    }

    fn classes_of(spans: &[HighlightSpan], text: &str, class: TokenClass) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        spans
            .iter()
            .filter(|s| s.class == class)
            .map(|s| chars[s.start..s.end].iter().collect())
            .collect()
    }

    #[test]
    fn test_python_keywords_strings_comments() {
        let text = "if x in 'abc': return None  # done";
        let (spans, state) = highlight_line(&python(), text, HighlightState::NONE);
        assert_eq!(state, HighlightState::NONE);
        assert_eq!(classes_of(&spans, text, TokenClass::Keyword), vec!["if", "in", "return"]);
        assert_eq!(classes_of(&spans, text, TokenClass::String), vec!["'abc'"]);
        assert_eq!(classes_of(&spans, text, TokenClass::Constant), vec!["None"]);
        assert_eq!(classes_of(&spans, text, TokenClass::Comment), vec!["# done"]);
    }

    #[test]
    fn test_python_def_and_errors() {
        let text = "def run(node): raise ValueError(nuke)";
        let (spans, _) = highlight_line(&python(), text, HighlightState::NONE);
        assert_eq!(classes_of(&spans, text, TokenClass::Function), vec!["run"]);
        assert_eq!(classes_of(&spans, text, TokenClass::ErrorType), vec!["ValueError"]);
        assert_eq!(classes_of(&spans, text, TokenClass::Module), vec!["nuke"]);
        assert_eq!(classes_of(&spans, text, TokenClass::Builtin), vec!["def"]);
    }

    #[test]
    fn test_later_rule_wins_over_longer_earlier_match() {
        // The comment rule comes after the string rule, so the tail of the
        // string is repainted as comment.
        let text = "x = '# not a comment'";
        let (spans, _) = highlight_line(&python(), text, HighlightState::NONE);
        assert_eq!(classes_of(&spans, text, TokenClass::String), vec!["'"]);
        assert_eq!(classes_of(&spans, text, TokenClass::Comment), vec!["# not a comment'"]);
    }

    #[test]
    fn test_triple_quote_carry() {
        let g = python();
        let (spans, state) = highlight_line(&g, "doc = '''start", HighlightState::NONE);
        assert_eq!(state, HighlightState::inside(1));
        assert_eq!(spans.last().map(|s| (s.start, s.end)), Some((6, 14)));

        let (spans, state) = highlight_line(&g, "middle if", state);
        assert_eq!(state, HighlightState::inside(1));
        assert_eq!(spans, vec![HighlightSpan::new(0, 9, TokenClass::String)]);

        let (_, state) = highlight_line(&g, "end''' + 1", state);
        assert_eq!(state, HighlightState::NONE);
    }

    #[test]
    fn test_other_delimiter_inside_construct_is_text() {
        let g = python();
        let (_, state) = highlight_line(&g, r#"a = """ has ''' inside"#, HighlightState::NONE);
        assert_eq!(state, HighlightState::inside(2));
        let (_, state) = highlight_line(&g, r#"''' still """ x = '''"#, state);
        assert_eq!(state, HighlightState::inside(1));
    }

    #[test]
    fn test_blink_block_comment() {
        let g = Grammar::blink().unwrap();
        let (spans, state) = highlight_line(&g, "float4 v; /* open", HighlightState::NONE);
        assert_eq!(state, HighlightState::inside(1));
        assert_eq!(classes_of(&spans, "float4 v; /* open", TokenClass::Type), vec!["float4"]);
        let (spans, state) = highlight_line(&g, "close */ int i;", state);
        assert_eq!(state, HighlightState::NONE);
        assert_eq!(spans[0], HighlightSpan::new(0, 8, TokenClass::Comment));
    }

    #[test]
    fn test_tcl_variables_and_math() {
        let g = Grammar::tcl().unwrap();
        let text = "set y [expr sin($x)] # wave";
        let (spans, state) = highlight_line(&g, text, HighlightState::NONE);
        assert_eq!(state, HighlightState::NONE);
        assert_eq!(classes_of(&spans, text, TokenClass::Variable), vec!["$x"]);
        assert!(classes_of(&spans, text, TokenClass::Builtin).contains(&"sin".to_string()));
        assert_eq!(classes_of(&spans, text, TokenClass::Comment), vec!["# wave"]);
    }

    #[test]
    fn test_multibyte_columns_are_chars() {
        let text = "é = 'ü'";
        let (spans, _) = highlight_line(&python(), text, HighlightState::NONE);
        assert!(spans.contains(&HighlightSpan::new(4, 7, TokenClass::String)));
    }

    #[test]
    fn test_char_index_map() {
        assert_eq!(char_index_map("aé b"), vec![0, 1, 2, 2, 3, 4]);
        assert_eq!(char_index_map(""), vec![0]);
    }

    #[test]
    fn test_cache_update_stops_when_state_settles() {
        let g = python();
        let mut buffer = Buffer::from_string("a = 1\nb = 2\nc = 3\nd = 4");
        let mut cache = HighlightCache::new();
        cache.rebuild(&g, &buffer);

        buffer.insert(buffer.line_start(1), "x").unwrap();
        let dirty = buffer.take_dirty().unwrap();
        assert_eq!(cache.update(&g, &buffer, dirty), 1..=1);
    }

    #[test]
    fn test_cache_update_walks_through_opened_string() {
        let g = python();
        let mut buffer = Buffer::from_string("a = 1\nb = 2\nc = 3\nd = 4");
        let mut cache = HighlightCache::new();
        cache.rebuild(&g, &buffer);

        buffer.insert(buffer.line_start(1), "'''").unwrap();
        let dirty = buffer.take_dirty().unwrap();
        assert_eq!(cache.update(&g, &buffer, dirty), 1..=3);
        assert!(cache.state_after(3).is_inside());
    }
}
