// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! External command execution.
//!
//! Every external process (availability probes, installers, linters) goes
//! through the [`CommandRunner`] trait so orchestration logic can be tested
//! with a scripted runner. [`SystemRunner`] is the real implementation: it
//! resolves programs on `PATH`, drains output on reader threads, enforces an
//! optional timeout, and kills the child's whole process tree when the
//! timeout expires or the run is cancelled.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Interval between child status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line for logs and diagnostics.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }

    /// Bytes this command occupies on a command line.
    pub fn command_line_len(&self) -> usize {
        self.program.len() + self.args.iter().map(|a| a.len() + 1).sum::<usize>()
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if terminated by a signal).
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Why a command could not produce a [`CommandOutput`].
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// Program is not on PATH or does not exist.
    #[error("command not found: {program}")]
    NotFound { program: String },

    /// Program exists but could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Program ran longer than its timeout and was killed.
    #[error("{program} timed out after {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    /// The run was cancelled while the program was running; it was killed.
    #[error("{program} was interrupted")]
    Cancelled { program: String },

    /// Waiting on the child failed.
    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing its output.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError>;

    /// Resolve a program name to an executable path, if available.
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// Shared cancellation flag.
///
/// Set by the interrupt handler; running commands observe it and kill
/// their child process.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cancel: CancelToken,
}

impl SystemRunner {
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        if self.cancel.is_cancelled() {
            return Err(ExecError::Cancelled {
                program: spec.program.clone(),
            });
        }

        // Resolve through PATH (and PATHEXT on Windows, so `npx` finds `npx.cmd`).
        let program = self
            .resolve(&spec.program)
            .ok_or_else(|| ExecError::NotFound {
                program: spec.program.clone(),
            })?;

        tracing::debug!("exec: {} (in {})", spec.display(), spec.cwd.display());

        let start = Instant::now();
        let mut command = Command::new(&program);
        command
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a kill also reaches what the child started
        // (`npx` runs `node` as a grandchild).
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let mut child = command
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ExecError::NotFound {
                    program: spec.program.clone(),
                },
                _ => ExecError::Spawn {
                    program: spec.program.clone(),
                    source,
                },
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let code = wait_for(&mut child, spec, &self.cancel, start)?;

        Ok(CommandOutput {
            code,
            stdout: join_drain(stdout),
            stderr: join_drain(stderr),
            duration: start.elapsed(),
        })
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        let path = Path::new(program);
        if path.components().count() > 1 {
            return path.is_file().then(|| path.to_path_buf());
        }
        which::which(program).ok()
    }
}

/// Poll a child until it exits, the timeout expires, or the run is cancelled.
fn wait_for(
    child: &mut Child,
    spec: &CommandSpec,
    cancel: &CancelToken,
    start: Instant,
) -> Result<Option<i32>, ExecError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status.code()),
            Ok(None) => {
                if cancel.is_cancelled() {
                    kill(child);
                    return Err(ExecError::Cancelled {
                        program: spec.program.clone(),
                    });
                }
                if let Some(timeout) = spec.timeout
                    && start.elapsed() > timeout
                {
                    kill(child);
                    return Err(ExecError::TimedOut {
                        program: spec.program.clone(),
                        timeout,
                    });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                kill(child);
                return Err(ExecError::Wait {
                    program: spec.program.clone(),
                    source,
                });
            }
        }
    }
}

/// Kill the child and every process it started.
fn kill(child: &mut Child) {
    kill_tree(child.id());
    child.kill().ok();
    child.wait().ok();
}

/// Signal the child's process group.
#[cfg(unix)]
fn kill_tree(pid: u32) {
    let group = format!("-{pid}");
    let status = Command::new("kill")
        .args(["-s", "KILL", "--", &group])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = status {
        tracing::debug!("cannot kill process group {}: {}", pid, e);
    }
}

/// Terminate the child's process tree.
#[cfg(windows)]
fn kill_tree(pid: u32) {
    let status = Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = status {
        tracing::debug!("cannot kill process tree {}: {}", pid, e);
    }
}

#[cfg(not(any(unix, windows)))]
fn kill_tree(_pid: u32) {}

/// Read a pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).ok();
            buf
        })
    })
}

fn join_drain(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
