//! Runners behind the `scripter` subcommands
//!
//! Each runner loads a script, drives an `Editor` over it and returns a
//! report that prints as plain text or serializes to JSON.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::Command;
use crate::config::Config;
use crate::core::definition::{DefinitionLocators, Lookup};
use crate::core::editor::Editor;
use crate::core::error::DefinitionError;
use crate::core::grammar::GrammarRegistry;
use crate::core::input::parse_keys;

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Run one subcommand, returning what should be printed
pub fn run(command: &Command, config: &Config, json: bool) -> Result<String> {
    match command {
        Command::Replay { file, keys } => {
            let report = replay(config, &read_source(file)?, keys)?;
            render(&report, json)
        }
        Command::Highlight { file } => {
            let report = highlight(config, &read_source(file)?)?;
            render(&report, json)
        }
        Command::Goto { file, name } => {
            let report = goto(config, &read_source(file)?, name)?;
            render(&report, json)
        }
    }
}

fn render<T: Serialize + fmt::Display>(report: &T, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(report).context("cannot serialize report")
    } else {
        Ok(report.to_string())
    }
}

// ==================== Replay ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub text: String,
    pub mode: String,
    /// Zero-based
    pub line: usize,
    pub column: usize,
    pub host_actions: Vec<String>,
    pub messages: Vec<String>,
}

/// Feed `keys` (vim notation) to an editor over `text`
pub fn replay(config: &Config, text: &str, keys: &str) -> Result<ReplayReport> {
    let events = parse_keys(keys).with_context(|| format!("bad key notation '{}'", keys))?;
    let mut editor = Editor::with_text(config, text).context("cannot start editor")?;
    let mut host_actions = Vec::new();
    let mut messages = Vec::new();

    for event in events {
        let outcome = editor.handle_key(event);
        host_actions.extend(outcome.host_actions.iter().map(|a| format!("{:?}", a)));
        messages.extend(outcome.message);
    }
    let (line, column) = editor.cursor_position();
    info!(keys, line, column, "replay finished");

    Ok(ReplayReport {
        text: editor.text(),
        mode: editor.mode().to_string(),
        line,
        column,
        host_actions,
        messages,
    })
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.text)?;
        writeln!(f, "---")?;
        write!(f, "mode {} at {}:{}", self.mode, self.line + 1, self.column + 1)?;
        for action in &self.host_actions {
            write!(f, "\nhost {}", action)?;
        }
        for message in &self.messages {
            write!(f, "\nmessage {}", message)?;
        }
        Ok(())
    }
}

// ==================== Highlight ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanReport {
    pub start: usize,
    pub end: usize,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub line: usize,
    pub spans: Vec<SpanReport>,
    /// Carry id of the construct still open at the end of the line
    pub carry: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    pub grammar: String,
    pub lines: Vec<LineReport>,
}

pub fn highlight(config: &Config, text: &str) -> Result<HighlightReport> {
    let editor = Editor::with_text(config, text).context("cannot start editor")?;
    let lines = (0..editor.buffer().line_count())
        .map(|line| LineReport {
            line,
            spans: editor
                .highlight_line(line)
                .into_iter()
                .map(|span| SpanReport {
                    start: span.start,
                    end: span.end,
                    class: format!("{:?}", span.class),
                })
                .collect(),
            carry: editor.line_state(line).construct_id(),
        })
        .collect();
    Ok(HighlightReport {
        grammar: editor.grammar().name.clone(),
        lines,
    })
}

impl fmt::Display for HighlightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grammar {}", self.grammar)?;
        for line in &self.lines {
            write!(f, "\n{:>4}:", line.line + 1)?;
            for span in &line.spans {
                write!(f, " {}..{} {}", span.start, span.end, span.class)?;
            }
            if let Some(carry) = line.carry {
                write!(f, " | carry {}", carry)?;
            }
        }
        Ok(())
    }
}

// ==================== Goto ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GotoReport {
    /// Zero-based
    Found { line: usize, column: usize },
    NotFound,
    Unsupported { grammar: String },
    /// 1-based line of the first syntax error
    SyntaxError { line: usize },
}

pub fn goto(config: &Config, text: &str, name: &str) -> Result<GotoReport> {
    let grammar = GrammarRegistry::builtin()?.get(&config.grammar())?;
    let report = match DefinitionLocators::builtin().lookup(&grammar.name, text, name) {
        Ok(Lookup::Found(location)) => GotoReport::Found {
            line: location.line,
            column: location.column,
        },
        Ok(Lookup::NotFound) => GotoReport::NotFound,
        Ok(Lookup::Unsupported) => GotoReport::Unsupported {
            grammar: grammar.name.clone(),
        },
        Err(DefinitionError::Parse { line }) => GotoReport::SyntaxError { line },
        Err(err) => return Err(err).context("definition lookup failed"),
    };
    debug!(name, ?report, "goto");
    Ok(report)
}

impl fmt::Display for GotoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GotoReport::Found { line, column } => write!(f, "found at {}:{}", line + 1, column + 1),
            GotoReport::NotFound => write!(f, "not found"),
            GotoReport::Unsupported { grammar } => {
                write!(f, "goto definition is not available for {}", grammar)
            }
            GotoReport::SyntaxError { line } => write!(f, "syntax error on line {}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> Config {
        Config::with_defaults().unwrap()
    }

    #[test]
    fn test_replay_reports_text_and_cursor() {
        let report = replay(&config(), "alpha beta gamma delta", "3dw").unwrap();
        assert_eq!(report.text, "delta");
        assert_eq!(report.mode, "NORMAL");
        assert_eq!((report.line, report.column), (0, 0));

        let report = replay(&config(), "x", ":wq<CR><Esc>").unwrap();
        assert_eq!(report.host_actions, vec!["Save", "ExitContext", "ExitContext"]);
    }

    #[test]
    fn test_replay_rejects_bad_notation() {
        assert!(replay(&config(), "", "<Bogus>").is_err());
    }

    #[test]
    fn test_highlight_carries_open_string() {
        let report = highlight(&config(), "x = '''\nstill open\n'''\ny = 1").unwrap();
        assert_eq!(report.grammar, "python");
        assert!(report.lines[0].carry.is_some());
        assert!(report.lines[1].carry.is_some());
        assert_eq!(report.lines[2].carry, None);
        assert!(report.lines[3].spans.iter().any(|s| s.class == "Number"));
    }

    #[test]
    fn test_goto_outcomes() {
        let source = "import os\n\ndef main():\n    pass\n";
        assert_eq!(
            goto(&config(), source, "main").unwrap(),
            GotoReport::Found { line: 2, column: 4 }
        );
        assert_eq!(goto(&config(), source, "other").unwrap(), GotoReport::NotFound);
        assert!(matches!(
            goto(&config(), "def broken(:\n", "broken").unwrap(),
            GotoReport::SyntaxError { line } if line >= 1
        ));

        let mut tcl = config();
        tcl.set("grammar", "tcl");
        assert_eq!(
            goto(&tcl, "proc a {} {}", "a").unwrap(),
            GotoReport::Unsupported { grammar: "tcl".to_string() }
        );
    }

    #[test]
    fn test_run_reads_file_and_renders_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "def f():\n    return 1\n").unwrap();
        let command = Command::Goto {
            file: file.path().to_path_buf(),
            name: "f".to_string(),
        };
        let text = run(&command, &config(), false).unwrap();
        assert_eq!(text, "found at 1:5");
        let json = run(&command, &config(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"], "found");
        assert_eq!(value["column"], 4);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::Highlight {
            file: dir.path().join("nope.py"),
        };
        assert!(run(&command, &config(), false).is_err());
    }
}
