//! Command-line argument parsing for scripter.
//!
//! This module provides the `Cli` struct which encapsulates all command-line
//! options and the subcommand to run.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::error::ConfigError;

/// Command-line interface configuration.
#[derive(Debug, Parser)]
#[command(name = "scripter", version, about = "Modal, chord-driven script editing engine")]
pub struct Cli {
    /// Grammar to use (python, blink, tcl or an alias)
    #[arg(short, long, global = true)]
    pub grammar: Option<String>,

    /// JSON file with setting overrides
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Replay keys against a file and print the result
    Replay {
        file: PathBuf,
        /// Key notation, e.g. `3dw` or `ihello<Esc>`
        #[arg(short, long)]
        keys: String,
    },
    /// Print the highlight spans and carry state of every line
    Highlight { file: PathBuf },
    /// Locate the top-level definition of a name
    Goto { file: PathBuf, name: String },
}

impl Cli {
    /// Apply CLI overrides to a configuration object.
    pub fn apply_to_config(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(path) = &self.config {
            config.load_json_file(path)?;
        }
        if let Some(grammar) = &self.grammar {
            config.set("grammar", grammar.as_str());
        }
        Ok(())
    }
}
