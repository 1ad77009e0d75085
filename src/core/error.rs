//! Error types for the editing engine
//!
//! Nothing in here is fatal to a session. Edit errors roll back the
//! current edit group, definition errors are reported to the host and
//! the cursor stays put.

use thiserror::Error;

/// Failure while mutating a buffer
#[derive(Debug, Error)]
pub enum EditError {
    #[error("position {pos} is outside the document (length {len})")]
    OutOfRange { pos: usize, len: usize },
    #[error("invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("bad pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failure while building or selecting a grammar
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("unknown grammar '{0}'")]
    UnknownGrammar(String),
    #[error("rule '{pattern}' does not compile: {source}")]
    BadRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Definition lookup failure (not-found and unsupported are outcomes, not errors)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// `line` is 1-based
    #[error("syntax error on line {line}")]
    Parse { line: usize },
    #[error("parser unavailable: {0}")]
    Backend(String),
}

/// Bad key notation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unterminated key name starting at '{0}'")]
    Unterminated(String),
    #[error("empty chord")]
    EmptyChord,
    #[error("chord '{0}' is longer than five keys")]
    TooLong(String),
}

/// Failure while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error(transparent)]
    Key(#[from] KeyParseError),
}

/// Errors surfaced when constructing an editing session
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_line() {
        let err = DefinitionError::Parse { line: 3 };
        assert_eq!(err.to_string(), "syntax error on line 3");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = EditError::OutOfRange { pos: 12, len: 4 };
        assert!(err.to_string().contains("12"));
    }
}
