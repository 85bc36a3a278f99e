// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::anyhow;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use super::{format_error, Cli, Commands};

// -- Argument parsing -------------------------------------------------------

#[test]
fn version_flag() {
    let err = Cli::try_parse_from(["winow", "--version"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn no_subcommand_parses() {
    let cli = Cli::try_parse_from(["winow"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn start_parses_agent_and_prompt() {
    let cli = Cli::try_parse_from(["winow", "start", "claude", "fix the bug"]).unwrap();
    let Some(Commands::Start(args)) = cli.command else {
        panic!("expected start");
    };
    assert_eq!(args.agent, "claude");
    assert_eq!(args.prompt.as_deref(), Some("fix the bug"));
    assert!(args.name.is_none());
}

#[test]
fn start_accepts_explicit_name() {
    let cli =
        Cli::try_parse_from(["winow", "start", "--name", "bugfix", "claude", "task"]).unwrap();
    let Some(Commands::Start(args)) = cli.command else {
        panic!("expected start");
    };
    assert_eq!(args.name.as_deref(), Some("bugfix"));
}

#[test]
fn send_requires_session_and_message() {
    let err = Cli::try_parse_from(["winow", "send", "fix-bug"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

    let cli = Cli::try_parse_from(["winow", "send", "fix-bug", "also add tests"]).unwrap();
    let Some(Commands::Send(args)) = cli.command else {
        panic!("expected send");
    };
    assert_eq!(args.session, "fix-bug");
    assert_eq!(args.message, "also add tests");
}

#[test]
fn peek_lines_defaults_to_40() {
    let cli = Cli::try_parse_from(["winow", "peek", "fix-bug"]).unwrap();
    let Some(Commands::Peek(args)) = cli.command else {
        panic!("expected peek");
    };
    assert_eq!(args.lines, 40);
}

#[test]
fn output_flag_is_global() {
    let cli = Cli::try_parse_from(["winow", "ps", "--output", "json"]).unwrap();
    assert_eq!(cli.output, crate::output::OutputFormat::Json);
}

#[test]
fn help_lists_every_verb() {
    let mut buf = Vec::new();
    Cli::command().write_help(&mut buf).unwrap();
    let help = String::from_utf8(buf).unwrap();
    for verb in ["start", "ps", "send", "peek", "attach", "stop"] {
        assert!(help.contains(verb), "help missing verb {verb}:\n{help}");
    }
}

// -- Error formatting -------------------------------------------------------

#[test]
fn format_error_skips_redundant_chain() {
    let inner = anyhow!("tmux has no session fix-bug");
    let err = inner.context("tmux has no session fix-bug while sending");
    assert_eq!(
        format_error(&err),
        "tmux has no session fix-bug while sending"
    );
}

#[test]
fn format_error_renders_informative_chain() {
    let inner = anyhow!("permission denied");
    let err = inner.context("could not open state directory");
    let out = format_error(&err);
    assert!(out.contains("could not open state directory"));
    assert!(out.contains("Caused by"));
    assert!(out.contains("permission denied"));
}
