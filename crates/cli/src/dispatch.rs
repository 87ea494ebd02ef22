// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Linter dispatch.
//!
//! Runs each satisfied family over its bucket, in parallel across families
//! using rayon. A family's file list is split into chunks so no command line
//! exceeds the platform's argument budget; chunks of one family run in
//! order and their output is concatenated.
//!
//! Failures are isolated per family: findings or a crashed tool in one
//! family never stop the others. Only cancellation aborts dispatch.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::bootstrap::Satisfaction;
use crate::error::{Error, Result};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};
use crate::family::{CommandTemplate, FamilyId, LinterFamily, Mode, WorkDir};
use crate::scan::{Buckets, DiscoveredFile};
use crate::verbose::VerboseLogger;

/// Command line budget per invocation.
#[cfg(windows)]
pub const MAX_ARG_BYTES: usize = 32_000;

/// Command line budget per invocation.
#[cfg(not(windows))]
pub const MAX_ARG_BYTES: usize = 128 * 1024;

/// Command line budget for `.cmd`/`.bat` launchers, which run through
/// `cmd.exe` and its 8191-character line limit.
pub const BATCH_SCRIPT_MAX_ARG_BYTES: usize = 8_000;

/// Upper bound on concurrent families when `jobs` is not set.
pub const MAX_DEFAULT_JOBS: usize = 8;

/// Default worker count: min(8, available cores).
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_JOBS)
}

/// Settings for one dispatch phase.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub root: PathBuf,
    pub tool_dir: PathBuf,
    pub python: Option<String>,
    pub mode: Mode,
    /// Families run concurrently (1 = sequential).
    pub jobs: usize,
    /// Per-invocation timeout.
    pub timeout: Option<Duration>,
    pub max_arg_bytes: usize,
}

/// How a family's run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every invocation exited 0.
    Passed,
    /// The tool ran and reported problems.
    Findings,
    /// The tool could not be run, crashed, or timed out.
    FailedToRun { reason: String },
}

impl Outcome {
    /// Severity rank for keeping the worst outcome across chunks.
    fn rank(&self) -> u8 {
        match self {
            Outcome::Passed => 0,
            Outcome::Findings => 1,
            Outcome::FailedToRun { .. } => 2,
        }
    }
}

/// Result of running one family over its bucket.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub family: FamilyId,
    pub files: usize,
    pub invocations: usize,
    pub outcome: Outcome,
    /// Exit code of the worst invocation.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl DispatchResult {
    /// Combined tool output, stdout first.
    pub fn output(&self) -> String {
        let mut text = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }
}

/// Families from `buckets` that will actually be dispatched.
pub fn dispatchable(buckets: &Buckets, satisfaction: &Satisfaction, mode: Mode) -> Vec<FamilyId> {
    buckets
        .iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(id, _)| *id)
        .filter(|id| satisfaction.is_satisfied(*id))
        .filter(|id| id.family().template(mode).is_some())
        .collect()
}

/// Runs linters over discovered files.
pub struct Dispatcher<'a> {
    ctx: &'a DispatchContext,
    runner: &'a dyn CommandRunner,
    verbose: VerboseLogger,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        ctx: &'a DispatchContext,
        runner: &'a dyn CommandRunner,
        verbose: VerboseLogger,
    ) -> Self {
        Self {
            ctx,
            runner,
            verbose,
        }
    }

    /// Run every dispatchable family. Results are in family order.
    pub fn dispatch(
        &self,
        buckets: &Buckets,
        satisfaction: &Satisfaction,
    ) -> Result<Vec<DispatchResult>> {
        let families = dispatchable(buckets, satisfaction, self.ctx.mode);
        if families.is_empty() {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.ctx.jobs.max(1))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build dispatch pool: {e}")))?;

        let results: Vec<Result<DispatchResult>> = pool.install(|| {
            families
                .par_iter()
                .map(|id| {
                    let files = buckets.get(id).map(Vec::as_slice).unwrap_or(&[]);
                    self.run_family(id.family(), files)
                })
                .collect()
        });

        results.into_iter().collect()
    }

    /// Run one family over its files, chunk by chunk.
    pub fn run_family(
        &self,
        family: &LinterFamily,
        files: &[DiscoveredFile],
    ) -> Result<DispatchResult> {
        let start = Instant::now();
        let mut result = DispatchResult {
            family: family.id,
            files: files.len(),
            invocations: 0,
            outcome: Outcome::Passed,
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::ZERO,
        };

        let Some(template) = family.template(self.ctx.mode) else {
            return Err(Error::Internal(format!(
                "{} has no {} command",
                family.name, self.ctx.mode
            )));
        };

        let paths: Vec<String> = files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect();

        let python = self.ctx.python.as_deref();
        let program = match template.argv.first() {
            Some(&"{python}") => python,
            other => other.copied(),
        };
        let resolved = program.and_then(|p| self.runner.resolve(p));
        let budget = arg_budget(resolved.as_deref(), self.ctx.max_arg_bytes);
        let chunks = match chunk_files(template, python, &paths, family.batch, budget) {
            Ok(chunks) => chunks,
            Err(reason) => {
                result.outcome = Outcome::FailedToRun { reason };
                result.exit_code = None;
                return Ok(result);
            }
        };

        for chunk in chunks {
            let spec = self.render(template, chunk)?;
            self.verbose.command(&spec);
            result.invocations += 1;

            let (outcome, code) = match self.runner.run(&spec) {
                Ok(output) => {
                    let outcome = classify(family, &output);
                    append_output(&mut result, &output);
                    (outcome, output.code)
                }
                Err(ExecError::Cancelled { .. }) => return Err(Error::Cancelled),
                Err(e) => (
                    Outcome::FailedToRun {
                        reason: e.to_string(),
                    },
                    None,
                ),
            };

            tracing::debug!("{}: chunk exited {:?}", family.name, code);
            let stop = matches!(outcome, Outcome::FailedToRun { .. });
            if outcome.rank() > result.outcome.rank() {
                result.outcome = outcome;
                result.exit_code = code;
            }
            // A broken tool fails the same way on every chunk.
            if stop {
                break;
            }
        }

        result.duration = start.elapsed();
        Ok(result)
    }

    fn render(&self, template: &CommandTemplate, files: &[String]) -> Result<CommandSpec> {
        let argv =
            render_argv(template, self.ctx.python.as_deref(), files).map_err(Error::Internal)?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Internal("empty command template".to_string()))?;
        let cwd = match template.cwd {
            WorkDir::ProjectRoot => &self.ctx.root,
            WorkDir::ToolDir => &self.ctx.tool_dir,
        };
        Ok(CommandSpec::new(program.as_str(), cwd)
            .args(args.iter().cloned())
            .timeout(self.ctx.timeout))
    }
}

/// Argument budget for a resolved program: batch-script launchers (`npx.cmd`)
/// get the tighter `cmd.exe` limit.
pub fn arg_budget(resolved: Option<&Path>, budget: usize) -> usize {
    let batch_script = resolved
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cmd") || ext.eq_ignore_ascii_case("bat"));
    if batch_script {
        budget.min(BATCH_SCRIPT_MAX_ARG_BYTES)
    } else {
        budget
    }
}

/// Expand `{python}` and `{files}` in a template.
pub fn render_argv(
    template: &CommandTemplate,
    python: Option<&str>,
    files: &[String],
) -> std::result::Result<Vec<String>, String> {
    let mut argv = Vec::with_capacity(template.argv.len() + files.len());
    for token in template.argv {
        match *token {
            "{files}" => argv.extend(files.iter().cloned()),
            "{python}" => argv.push(python.ok_or("no Python interpreter available")?.to_string()),
            other => argv.push(other.to_string()),
        }
    }
    Ok(argv)
}

/// Split `files` into chunks whose rendered command lines fit in `budget` bytes.
///
/// A single file longer than the budget still gets its own chunk. Non-batch
/// tools get one file per chunk.
pub fn chunk_files<'f>(
    template: &CommandTemplate,
    python: Option<&str>,
    files: &'f [String],
    batch: bool,
    budget: usize,
) -> std::result::Result<Vec<&'f [String]>, String> {
    if !batch {
        return Ok(files.chunks(1).collect());
    }

    let base: usize = render_argv(template, python, &[])?
        .iter()
        .map(|a| a.len() + 1)
        .sum();

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut len = base;
    for (i, file) in files.iter().enumerate() {
        let cost = file.len() + 1;
        if i > start && len + cost > budget {
            chunks.push(&files[start..i]);
            start = i;
            len = base;
        }
        len += cost;
    }
    if start < files.len() {
        chunks.push(&files[start..]);
    }
    Ok(chunks)
}

/// Map a completed invocation to an outcome.
fn classify(family: &LinterFamily, output: &CommandOutput) -> Outcome {
    match output.code {
        Some(0) => Outcome::Passed,
        Some(code) if family.fault_codes.contains(&code) => Outcome::FailedToRun {
            reason: format!("{} exited with {} (tool error)", family.name, code),
        },
        Some(_) => Outcome::Findings,
        None => Outcome::FailedToRun {
            reason: format!("{} was terminated by a signal", family.name),
        },
    }
}

fn append_output(result: &mut DispatchResult, output: &CommandOutput) {
    result.stdout.push_str(&output.stdout);
    result.stderr.push_str(&output.stderr);
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
