//! Session lifecycle specs against real git and tmux.
//!
//! Serialized because every spec in this binary shares the host's tmux
//! server. Each spec uses a distinct prompt so derived session names never
//! collide across specs.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial(tmux)]
fn start_provisions_worktree_and_reports_running() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "polish the nav menu"])
        .passes()
        .stdout_eq("polish-nav-menu\n");

    let worktree = project.state_path().join("workspaces/polish-nav-menu");
    assert!(worktree.is_dir(), "worktree should exist at {worktree:?}");

    project
        .winow()
        .args(&["ps"])
        .passes()
        .stdout_has("polish-nav-menu")
        .stdout_has("running")
        .stdout_has("workspaces/polish-nav-menu");

    project
        .winow()
        .args(&["stop", "polish-nav-menu"])
        .passes()
        .stdout_eq("stopped polish-nav-menu\n");
}

#[test]
#[serial(tmux)]
fn stop_removes_worktree_and_branch() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "repaint the footer"])
        .passes();
    let worktree = project.state_path().join("workspaces/repaint-footer");
    assert!(worktree.is_dir());

    project.winow().args(&["stop", "repaint-footer"]).passes();

    assert!(!worktree.exists(), "worktree should be removed");
    let branches = std::process::Command::new("git")
        .args(["branch", "--list", "winow/repaint-footer"])
        .current_dir(project.path())
        .output()
        .unwrap();
    assert!(
        String::from_utf8_lossy(&branches.stdout).trim().is_empty(),
        "branch should be deleted"
    );

    project
        .winow()
        .args(&["ps"])
        .passes()
        .stdout_has("repaint-footer")
        .stdout_has("stopped");
}

#[test]
#[serial(tmux)]
fn concurrent_name_derivation_disambiguates() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "tidy the sidebar"])
        .passes()
        .stdout_eq("tidy-sidebar\n");
    project
        .winow()
        .args(&["start", "tidy the sidebar"])
        .passes()
        .stdout_eq("tidy-sidebar-2\n");

    project
        .winow()
        .args(&["ps"])
        .passes()
        .stdout_has("tidy-sidebar")
        .stdout_has("tidy-sidebar-2");

    project.winow().args(&["stop", "tidy-sidebar"]).passes();
    project.winow().args(&["stop", "tidy-sidebar-2"]).passes();
}

#[test]
#[serial(tmux)]
fn name_is_reusable_after_stop() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "untangle the router"])
        .passes()
        .stdout_eq("untangle-router\n");
    project.winow().args(&["stop", "untangle-router"]).passes();

    // The prior session is terminal, so the derived name is free again.
    project
        .winow()
        .args(&["start", "untangle the router"])
        .passes()
        .stdout_eq("untangle-router\n");
    project.winow().args(&["stop", "untangle-router"]).passes();
}

#[test]
#[serial(tmux)]
fn send_reaches_the_pane() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "migrate the login form"])
        .passes();

    project
        .winow()
        .args(&["send", "migrate-login-form", "echo winow-spec-marker"])
        .passes()
        .stdout_eq("sent to migrate-login-form\n");

    let delivered = wait_for(SPEC_WAIT_MAX_MS, || {
        project
            .winow()
            .args(&["peek", "migrate-login-form"])
            .passes()
            .stdout()
            .contains("winow-spec-marker")
    });
    assert!(delivered, "sent text should appear in the pane");

    project.winow().args(&["stop", "migrate-login-form"]).passes();
}

#[test]
#[serial(tmux)]
fn explicit_name_overrides_derivation() {
    require_backends!();
    let project = Project::repo();
    project.with_shell_agent();

    project
        .winow()
        .args(&["start", "--name", "spec-pinned-name", "shellbot", "any task"])
        .passes()
        .stdout_eq("spec-pinned-name\n");

    project.winow().args(&["stop", "spec-pinned-name"]).passes();
}
