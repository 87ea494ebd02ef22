//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for driving the stylecheck binary against
//! throwaway projects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the tool directory inside every test project.
pub const TOOL_DIR: &str = "style_check";

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the stylecheck binary
/// with a clean stylecheck environment.
pub fn stylecheck_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stylecheck"));
    for var in [
        "STYLECHECK_CONFIG",
        "STYLECHECK_HOME",
        "STYLECHECK_PYTHON",
        "STYLECHECK_LOG",
        "STYLECHECK_DEBUG",
        "COLOR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// =============================================================================
// Project
// =============================================================================

/// Temporary project: a root directory with the tool directory inside it.
///
/// ```ignore
/// let project = Project::empty();
/// project.file("app/main.py", "print(1)\n");
/// project.run().passes().stdout_has("no applicable files");
/// ```
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    /// Create a project containing only the tool directory.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(TOOL_DIR)).unwrap();
        Self { dir }
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Tool directory (linter configs, node_modules, stylecheck.toml).
    pub fn tool_dir(&self) -> PathBuf {
        self.path().join(TOOL_DIR)
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Write `stylecheck.toml` in the tool directory
    /// (auto-prefixes with `version = 1` if not present).
    pub fn config(&self, content: &str) {
        let content = if content.contains("version") {
            content.to_string()
        } else {
            format!("version = 1\n{}", content)
        };
        std::fs::write(self.tool_dir().join("stylecheck.toml"), content).unwrap();
    }

    /// Install a fake executable into `.bin/` and return that directory.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.path().join(".bin");
        std::fs::create_dir_all(&bin).unwrap();
        let path = bin.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        bin
    }

    /// `check` builder rooted at this project.
    pub fn run(&self) -> RunBuilder {
        RunBuilder::new("check", self)
    }

    /// `fix` builder rooted at this project.
    pub fn fix(&self) -> RunBuilder {
        RunBuilder::new("fix", self)
    }
}

// =============================================================================
// RunBuilder
// =============================================================================

/// Fluent builder for `stylecheck check|fix` invocations.
pub struct RunBuilder {
    cmd: Command,
}

impl RunBuilder {
    fn new(subcommand: &str, project: &Project) -> Self {
        let mut cmd = stylecheck_cmd();
        cmd.arg(subcommand)
            .arg("--root")
            .arg(project.path())
            .arg("--tool-dir")
            .arg(project.tool_dir())
            .arg("--no-color")
            .current_dir(project.path());
        Self { cmd }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Restrict PATH to the given directory.
    pub fn path_only(self, dir: &Path) -> Self {
        self.env("PATH", dir)
    }

    pub fn passes(self) -> RunAssert {
        run_exits(self.cmd, 0)
    }

    pub fn fails(self) -> RunAssert {
        run_fails(self.cmd)
    }

    pub fn exits(self, code: i32) -> RunAssert {
        run_exits(self.cmd, code)
    }
}

fn run_fails(mut cmd: Command) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert!(
        !output.status.success(),
        "expected run to fail, but it passed\nstdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    RunAssert { output }
}

fn run_exits(mut cmd: Command, code: i32) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit code {}, got {:?}\nstdout: {}\nstderr: {}",
        code,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    RunAssert { output }
}

/// Command result with assertion helpers.
pub struct RunAssert {
    output: std::process::Output,
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

    /// Parse stdout as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).expect("stdout should be valid JSON")
    }

    /// Assert stdout matches predicate.
    ///
    /// ```ignore
    /// .stdout_has("FAIL")  // contains
    /// ```
    pub fn stdout_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            predicate.into_predicate().eval(&stdout),
            "stdout predicate failed:\n{}",
            stdout
        );
        self
    }

    /// Assert stdout does not match predicate.
    pub fn stdout_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            !predicate.into_predicate().eval(&stdout),
            "stdout should NOT match predicate:\n{}",
            stdout
        );
        self
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }

    /// Assert stderr does not match predicate.
    pub fn stderr_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            !predicate.into_predicate().eval(&stderr),
            "stderr should NOT match predicate:\n{}",
            stderr
        );
        self
    }
}

// =============================================================================
// Fake tools
// =============================================================================

/// `python3` stand-in: reports pyflakes as importable and flags any line
/// containing `x = 1` as an unused variable. Uses only shell builtins so it
/// works with a PATH restricted to the fake bin directory.
#[cfg(unix)]
pub const FAKE_PYTHON: &str = r#"
if [ "$1" = "-c" ]; then
  exit 0
fi
shift 2
status=0
for f in "$@"; do
  n=0
  while IFS= read -r line; do
    n=$((n + 1))
    case "$line" in
      *"x = 1"*)
        echo "$f:$n:5: local variable 'x' is assigned to but never used"
        status=1
        ;;
    esac
  done < "$f"
done
exit $status
"#;

/// `python3` stand-in that crashes when linting.
#[cfg(unix)]
pub const CRASHING_PYTHON: &str = r#"
if [ "$1" = "-c" ]; then
  exit 0
fi
echo "Traceback (most recent call last):" >&2
exit 127
"#;
