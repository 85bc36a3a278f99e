//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for testing winow CLI behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Returns the path to the winow binary, checking the llvm-cov target
/// directory first. Works with both standard builds and llvm-cov coverage
/// runs. Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree into a
/// shared target directory).
fn winow_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug/winow");
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug/winow");
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where winow is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("winow");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Create a CLI builder for winow commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// Whether a usable tmux is on PATH. Session specs bail out without one.
pub fn tmux_available() -> bool {
    Command::new("tmux")
        .arg("-V")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Whether a usable git is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Skip the test (early return) when the real backends are missing.
macro_rules! require_backends {
    () => {
        if !crate::prelude::tmux_available() || !crate::prelude::git_available() {
            eprintln!("skipping: tmux and git are required for this spec");
            return;
        }
    };
}
pub(crate) use require_backends;

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            // No keystroke pacing in tests; the shell accepts input
            // immediately.
            envs: vec![("WINOW_BOOT_SETTLE_MS".into(), "0".into())],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(winow_binary());
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        // A real state dir from the invoking user's machine must never
        // leak into tests.
        cmd.env_remove("WINOW_STATE_DIR");
        cmd.env_remove("XDG_STATE_HOME");

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    /// **Prefer this for format specs** - catches format regressions.
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    /// Use when exact comparison isn't practical.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Project
// =============================================================================

/// Temporary git repository with an isolated winow state directory.
pub struct Project {
    dir: tempfile::TempDir,
    state_dir: tempfile::TempDir,
}

impl Project {
    /// Create a project directory without a git repository.
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Create a git repository with one commit, ready for worktrees.
    pub fn repo() -> Self {
        let project = Self::empty();
        project.git(&["init", "-q", "-b", "main"]);
        project.file("README.md", "# test fixture\n");
        project.git(&["add", "."]);
        project.git(&["commit", "-q", "-m", "initial"]);
        project
    }

    /// Get the project path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the isolated state directory path
    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Run a git command in the project, with identity pinned so commits
    /// work on hosts without global git config.
    pub fn git(&self, args: &[&str]) {
        let status = Command::new("git")
            .args([
                "-c",
                "user.email=spec@example.invalid",
                "-c",
                "user.name=spec",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.path())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .expect("git should run");
        assert!(status.success(), "git {:?} failed", args);
    }

    /// Write a file at the given path (parent directories created
    /// automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Configure a harmless default agent whose invocation line is the
    /// shell's `clear`, so launches succeed without any real coding agent
    /// installed.
    pub fn with_shell_agent(&self) -> &Self {
        self.file(
            ".winow.toml",
            "[defaults]\nagent = \"shellbot\"\n\n[agents.shellbot]\ncommand = \"clear\"\n",
        );
        self
    }

    /// Run winow in this project's context
    pub fn winow(&self) -> CliBuilder {
        cli()
            .pwd(self.path())
            .env("WINOW_STATE_DIR", self.state_path())
            // Keep the invoking user's ~/.config/winow out of specs.
            .env("XDG_CONFIG_HOME", self.state_path().join("xdg-config"))
    }

    /// Terminal session ids recorded in this project's registry, live or
    /// not. Used for teardown.
    fn recorded_terminal_ids(&self) -> Vec<String> {
        let store = self.state_path().join("sessions.json");
        let Ok(raw) = std::fs::read_to_string(store) else {
            return Vec::new();
        };
        let Ok(doc) = serde_json::from_str::<serde_json::Value>(&raw) else {
            return Vec::new();
        };
        let Some(sessions) = doc.get("sessions").and_then(|s| s.as_object()) else {
            return Vec::new();
        };
        sessions
            .values()
            .filter_map(|s| s.get("terminal_id").and_then(|t| t.as_str()))
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .collect()
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        // Kill any tmux session this project's registry knows about, so
        // failed specs never strand terminal sessions on the host.
        for id in self.recorded_terminal_ids() {
            let _ = Command::new("tmux")
                .args(["kill-session", "-t", &format!("={id}")])
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .status();
        }
    }
}
