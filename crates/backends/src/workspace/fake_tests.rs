// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;

fn fake_path(name: &str) -> PathBuf {
    PathBuf::from("/fake/workspaces").join(name)
}

#[tokio::test]
async fn provision_creates_worktree_on_fresh_branch() {
    let backend = FakeWorkspaceBackend::new();

    let ws = backend.provision("fix-bug").await.unwrap();

    assert_eq!(ws.path, fake_path("fix-bug"));
    assert_eq!(ws.branch, "winow/fix-bug");
    assert!(backend.has_worktree(&ws.path));
    assert!(backend.has_branch(&ws.branch));
    assert_eq!(
        backend.calls(),
        vec![WorkspaceCall::Provision {
            name: "fix-bug".to_string()
        }]
    );
}

#[tokio::test]
async fn provision_suffixes_taken_branch() {
    let backend = FakeWorkspaceBackend::new();
    backend.add_branch("winow/fix-bug");
    backend.add_branch("winow/fix-bug-2");

    let ws = backend.provision("fix-bug").await.unwrap();

    assert_eq!(ws.branch, "winow/fix-bug-3");
}

#[tokio::test]
async fn provision_rejects_existing_path() {
    let backend = FakeWorkspaceBackend::new();
    backend.add_existing_path(&fake_path("fix-bug"));

    let err = backend.provision("fix-bug").await.unwrap_err();

    assert!(matches!(err, WorkspaceError::PathExists(_)));
}

#[tokio::test]
async fn provision_rejects_live_worktree_path() {
    let backend = FakeWorkspaceBackend::new();
    backend.provision("fix-bug").await.unwrap();

    let err = backend.provision("fix-bug").await.unwrap_err();

    assert!(matches!(err, WorkspaceError::PathExists(_)));
}

#[tokio::test]
async fn fail_next_provision_fails_once() {
    let backend = FakeWorkspaceBackend::new();
    backend.fail_next_provision("disk full");

    let err = backend.provision("fix-bug").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::GitFailed { .. }));
    assert!(err.to_string().contains("disk full"));

    backend.provision("fix-bug").await.unwrap();
}

#[tokio::test]
async fn teardown_removes_worktree_and_keeps_branch() {
    let backend = FakeWorkspaceBackend::new();
    let ws = backend.provision("fix-bug").await.unwrap();

    backend.teardown(&ws.path, &ws.branch, false).await.unwrap();

    assert!(!backend.has_worktree(&ws.path));
    assert!(backend.has_branch(&ws.branch));
}

#[tokio::test]
async fn teardown_deletes_branch_on_request() {
    let backend = FakeWorkspaceBackend::new();
    let ws = backend.provision("fix-bug").await.unwrap();

    backend.teardown(&ws.path, &ws.branch, true).await.unwrap();

    assert!(!backend.has_worktree(&ws.path));
    assert!(!backend.has_branch(&ws.branch));
}

#[tokio::test]
async fn teardown_refuses_dirty_worktree() {
    let backend = FakeWorkspaceBackend::new();
    let ws = backend.provision("fix-bug").await.unwrap();
    backend.mark_dirty(&ws.path);

    let err = backend.teardown(&ws.path, &ws.branch, true).await.unwrap_err();

    assert!(matches!(err, WorkspaceError::GitFailed { .. }));
    // The stranded work survives, branch included.
    assert!(backend.has_worktree(&ws.path));
    assert!(backend.has_branch(&ws.branch));
}

#[tokio::test]
async fn teardown_of_unknown_path_succeeds() {
    let backend = FakeWorkspaceBackend::new();

    backend
        .teardown(&fake_path("ghost"), "winow/ghost", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn unreachable_fails_every_call() {
    let backend = FakeWorkspaceBackend::new();
    backend.set_unreachable(true);

    let err = backend.provision("fix-bug").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::Unreachable(_)));
    let err = backend
        .teardown(&fake_path("fix-bug"), "winow/fix-bug", false)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::Unreachable(_)));

    // Calls are still recorded, and the backend recovers.
    assert_eq!(backend.calls().len(), 2);
    backend.set_unreachable(false);
    backend.provision("fix-bug").await.unwrap();
}

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let backend = FakeWorkspaceBackend::new();
    let ws = backend.provision("fix-bug").await.unwrap();
    backend.teardown(&ws.path, &ws.branch, true).await.unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            WorkspaceCall::Provision {
                name: "fix-bug".to_string()
            },
            WorkspaceCall::Teardown {
                path: ws.path.clone(),
                branch: ws.branch.clone(),
                delete_branch: true
            },
        ]
    );
}
