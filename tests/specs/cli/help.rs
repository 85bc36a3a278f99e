//! CLI help output specs
//!
//! Verify help text displays for all verbs without touching any backend.

use crate::prelude::*;

#[test]
fn winow_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn winow_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn winow_help_lists_every_verb() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("ps")
        .stdout_has("send")
        .stdout_has("peek")
        .stdout_has("attach")
        .stdout_has("stop");
}

#[test]
fn winow_start_help_shows_usage() {
    cli()
        .args(&["start", "--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--name");
}

#[test]
fn winow_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
