//! The subcommand runners against real files

use std::io::Write;

use scripter::cli::{Cli, Command};
use scripter::config::Config;
use scripter::run;

fn script(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn configured(args: &[&str]) -> (Cli, Config) {
    let cli = <Cli as clap::Parser>::try_parse_from(args).unwrap();
    let mut config = Config::with_defaults().unwrap();
    cli.apply_to_config(&mut config).unwrap();
    (cli, config)
}

#[test]
fn replay_prints_text_mode_and_cursor() {
    let file = script("alpha beta gamma delta");
    let path = file.path().to_str().unwrap();
    let (cli, config) = configured(&["scripter", "replay", path, "--keys", "3dw"]);
    let output = run::run(&cli.command, &config, cli.json).unwrap();
    assert_eq!(output, "delta\n---\nmode NORMAL at 1:1");
}

#[test]
fn replay_as_json() {
    let file = script("x = 1\n");
    let path = file.path().to_str().unwrap();
    let (cli, config) = configured(&["scripter", "--json", "replay", path, "-k", ",ci:w<CR>"]);
    let output = run::run(&cli.command, &config, cli.json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["text"], "# x = 1\n");
    assert_eq!(value["host_actions"][0], "Save");
}

#[test]
fn highlight_with_grammar_override() {
    let file = script("set y [expr sin($x)]\n");
    let path = file.path().to_str().unwrap();
    let (cli, config) = configured(&["scripter", "highlight", path, "--grammar", "tcl"]);
    let output = run::run(&cli.command, &config, false).unwrap();
    assert!(output.starts_with("grammar tcl"));
    assert!(output.contains("Variable"));
}

#[test]
fn goto_reports_location_or_failure() {
    let file = script("class Node:\n    pass\n");
    let path = file.path().to_str().unwrap();
    let (cli, config) = configured(&["scripter", "goto", path, "Node"]);
    assert_eq!(run::run(&cli.command, &config, false).unwrap(), "found at 1:7");

    let (cli, config) = configured(&["scripter", "goto", path, "Missing"]);
    assert_eq!(run::run(&cli.command, &config, false).unwrap(), "not found");
}

#[test]
fn config_file_changes_behavior() {
    let mut settings = tempfile::NamedTempFile::new().unwrap();
    settings.write_all(br#"{"tab_width": 2}"#).unwrap();
    let file = script("x\n");
    let (cli, config) = configured(&[
        "scripter",
        "replay",
        file.path().to_str().unwrap(),
        "--keys",
        ">>",
        "--config",
        settings.path().to_str().unwrap(),
    ]);
    let report = match &cli.command {
        Command::Replay { keys, .. } => run::replay(&config, "x\n", keys).unwrap(),
        other => panic!("unexpected command {:?}", other),
    };
    assert_eq!(report.text, "  x\n");
}
