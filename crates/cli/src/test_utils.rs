//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};

/// Creates a temp project with a `style_check` tool directory inside it.
///
/// Returns the temp dir (project root) and the tool directory path.
pub fn temp_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let tool_dir = dir.path().join("style_check");
    fs::create_dir_all(&tool_dir).unwrap();
    (dir, tool_dir)
}

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
///
/// # Example
///
/// ```ignore
/// let (tmp, _) = temp_project();
/// create_tree(tmp.path(), &[
///     ("src/app.py", "import os\n"),
///     ("web/app.js", "let x = 1;\n"),
/// ]);
/// ```
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Marks Node packages as installed under `tool_dir/node_modules`.
pub fn install_node_packages(tool_dir: &Path, packages: &[&str]) {
    for package in packages {
        let dir = tool_dir.join("node_modules").join(package);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), "{}").unwrap();
    }
}

type Responder = Box<dyn Fn(&CommandSpec) -> Result<CommandOutput, ExecError> + Send + Sync>;

struct Rule {
    program: String,
    /// Argument that must appear for the rule to match (None = any).
    arg: Option<String>,
    respond: Responder,
}

/// Scripted [`CommandRunner`] that records every invocation.
///
/// Rules are matched in insertion order on program name and an optional
/// argument. Unmatched commands fail with `NotFound`.
#[derive(Default)]
pub struct FakeRunner {
    programs: HashMap<String, PathBuf>,
    rules: Vec<Rule>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a program resolvable without scripting any response.
    pub fn with_program(self, program: &str) -> Self {
        let path = PathBuf::from("/usr/bin").join(program);
        self.with_program_at(program, path)
    }

    /// Make a program resolve to a specific path (e.g. `npx.cmd`).
    pub fn with_program_at(mut self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(program.to_string(), path.into());
        self
    }

    /// Respond to `program` (optionally only when `arg` is present) with an exit code and stdout.
    pub fn on(self, program: &str, arg: Option<&str>, code: i32, stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.on_with(program, arg, move |_| {
            Ok(CommandOutput {
                code: Some(code),
                stdout: stdout.clone(),
                stderr: String::new(),
                duration: Duration::from_millis(1),
            })
        })
    }

    /// Respond with a custom closure (for side effects or errors).
    pub fn on_with<F>(mut self, program: &str, arg: Option<&str>, respond: F) -> Self
    where
        F: Fn(&CommandSpec) -> Result<CommandOutput, ExecError> + Send + Sync + 'static,
    {
        self.programs
            .entry(program.to_string())
            .or_insert_with(|| PathBuf::from("/usr/bin").join(program));
        self.rules.push(Rule {
            program: program.to_string(),
            arg: arg.map(str::to_string),
            respond: Box::new(respond),
        });
        self
    }

    /// All recorded invocations, in call order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded invocations whose arguments contain `arg`.
    pub fn calls_with(&self, arg: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.iter().any(|a| a == arg))
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        self.calls.lock().unwrap().push(spec.clone());
        let rule = self.rules.iter().find(|r| {
            r.program == spec.program
                && r.arg
                    .as_ref()
                    .is_none_or(|arg| spec.args.iter().any(|a| a == arg))
        });
        match rule {
            Some(rule) => (rule.respond)(spec),
            None => Err(ExecError::NotFound {
                program: spec.program.clone(),
            }),
        }
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.programs.get(program).cloned()
    }
}
