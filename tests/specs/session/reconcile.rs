//! Reconciliation specs: registry state corrected against live tmux state.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial(tmux)]
fn out_of_band_kill_shows_stopped_on_next_ps() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "rework the search index"])
        .passes()
        .stdout_eq("rework-search-index\n");

    // Operator kills the terminal session behind winow's back.
    let killed = std::process::Command::new("tmux")
        .args(["kill-session", "-t", "=winow-rework-search-index"])
        .status()
        .unwrap()
        .success();
    assert!(killed, "tmux kill-session should succeed");

    project
        .winow()
        .args(&["ps"])
        .passes()
        .stdout_has("rework-search-index")
        .stdout_has("stopped")
        .stdout_lacks("running");
}

#[test]
#[serial(tmux)]
fn send_after_out_of_band_kill_reports_not_running() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "prune the feature flags"])
        .passes();

    std::process::Command::new("tmux")
        .args(["kill-session", "-t", "=winow-prune-feature-flags"])
        .status()
        .unwrap();

    project
        .winow()
        .args(&["send", "prune-feature-flags", "hello"])
        .fails()
        .stderr_has("not running");
}
