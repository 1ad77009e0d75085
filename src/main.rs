//! scripter - replay chords, highlight and locate definitions in scripts
//!
//! This is the main entry point. It parses CLI arguments, builds the
//! configuration and delegates to the subcommand runner.

use anyhow::{Context, Result};
use clap::Parser;

use scripter::cli::Cli;
use scripter::config::Config;
use scripter::{logging, run};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Load configuration
    let mut config = Config::with_defaults().context("default configuration is invalid")?;

    // Apply CLI overrides
    cli.apply_to_config(&mut config).context("cannot apply configuration")?;

    let output = run::run(&cli.command, &config, cli.json)?;
    println!("{}", output);
    Ok(())
}
