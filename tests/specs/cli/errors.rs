//! CLI error handling specs
//!
//! Verify typed error messages and exit codes for bad references and bad
//! environments.

use crate::prelude::*;

#[test]
fn unknown_subcommand_is_a_usage_error() {
    cli()
        .args(&["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn send_without_message_is_a_usage_error() {
    cli().args(&["send", "fix-bug"]).fails().stderr_has("Usage:");
}

#[test]
fn send_to_unknown_session_reports_not_found() {
    require_backends!();
    let project = Project::repo();

    project
        .winow()
        .args(&["send", "no-such-session", "hello"])
        .fails()
        .stderr_has("no session matches 'no-such-session'");
}

#[test]
fn stop_of_unknown_session_reports_not_found() {
    require_backends!();
    let project = Project::repo();

    project
        .winow()
        .args(&["stop", "no-such-session"])
        .fails()
        .stderr_has("no session matches 'no-such-session'");
}

#[test]
fn start_outside_a_repository_is_fatal() {
    require_backends!();
    let project = Project::empty();

    project
        .winow()
        .args(&["start", "opencode", "fix the bug"])
        .fails()
        .stderr_has("git repository");
}

#[test]
fn start_with_unknown_agent_lists_known_kinds() {
    require_backends!();
    let project = Project::repo();

    project
        .winow()
        .args(&["start", "frobnibot", "fix the bug"])
        .fails()
        .stderr_has("unknown agent 'frobnibot'")
        .stderr_has("opencode");
}

#[test]
fn ps_with_no_sessions_prints_empty_listing() {
    require_backends!();
    let project = Project::repo();

    project.winow().args(&["ps"]).passes().stdout_eq("No sessions\n");
}
