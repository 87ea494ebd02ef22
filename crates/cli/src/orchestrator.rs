// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run state machine.
//!
//! `Idle → Scanning → Bootstrapping → Dispatching → Aggregating → Reported`.
//! Phases run strictly in order; each transition is logged at debug level.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::bootstrap::{BootstrapContext, BootstrapReport, Bootstrapper, resolve_python};
use crate::dispatch::{DispatchContext, Dispatcher, MAX_ARG_BYTES};
use crate::error::{Error, Result};
use crate::exclude::ExclusionMatcher;
use crate::exec::CommandRunner;
use crate::family::{FamilyId, Mode};
use crate::report::{ReportInputs, RunReport};
use crate::scan::{self, Buckets, ScanResult};
use crate::verbose::VerboseLogger;
use crate::walker::{FileWalker, WalkerConfig};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
    Bootstrapping,
    Dispatching,
    Aggregating,
    Reported,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Scanning => "scanning",
            Phase::Bootstrapping => "bootstrapping",
            Phase::Dispatching => "dispatching",
            Phase::Aggregating => "aggregating",
            Phase::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Everything a run needs, resolved from CLI and config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: Mode,
    pub root: PathBuf,
    pub tool_dir: PathBuf,
    /// Interpreter override (`STYLECHECK_PYTHON`).
    pub python: Option<String>,
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub install: bool,
    pub matcher: ExclusionMatcher,
    pub walker: WalkerConfig,
    /// Families allowed to run.
    pub enabled: BTreeSet<FamilyId>,
    pub max_arg_bytes: usize,
}

impl RunOptions {
    /// Options with every family enabled and default exclusions.
    pub fn new(mode: Mode, root: PathBuf, tool_dir: PathBuf) -> Self {
        let tool_name = tool_dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Self {
            mode,
            root,
            tool_dir,
            python: None,
            jobs: crate::dispatch::default_jobs(),
            timeout: None,
            install: true,
            matcher: ExclusionMatcher::with_defaults(tool_name.as_deref()),
            walker: WalkerConfig::default(),
            enabled: FamilyId::ALL.into_iter().collect(),
            max_arg_bytes: MAX_ARG_BYTES,
        }
    }

    fn disabled(&self) -> BTreeSet<FamilyId> {
        FamilyId::ALL
            .into_iter()
            .filter(|id| !self.enabled.contains(id))
            .collect()
    }
}

/// Drives one run through its phases.
pub struct Orchestrator<'a> {
    options: RunOptions,
    runner: &'a dyn CommandRunner,
    verbose: VerboseLogger,
    phase: Phase,
}

impl<'a> Orchestrator<'a> {
    pub fn new(options: RunOptions, runner: &'a dyn CommandRunner, verbose: VerboseLogger) -> Self {
        Self {
            options,
            runner,
            verbose,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    fn enter(&mut self, next: Phase) {
        tracing::debug!("phase: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Discover and bucket files under the root.
    pub fn scan(&mut self) -> Result<ScanResult> {
        self.enter(Phase::Scanning);
        let walker = FileWalker::new(self.options.walker.clone(), self.options.matcher.clone());
        let result = scan::scan(&self.options.root, &walker)?;

        self.verbose.section("Scan");
        self.verbose.log(&format!("root: {}", self.options.root.display()));
        self.verbose.log(&format!(
            "files: {} found, {} claimed, {} unclaimed",
            result.stats.files_found,
            result.claimed_count(),
            result.unclaimed.len()
        ));
        self.verbose.log(&format!(
            "pruned: {} directories, {} files",
            result.stats.dirs_pruned, result.stats.files_excluded
        ));
        if result.stats.errors + result.stats.symlink_loops > 0 {
            self.verbose.log(&format!(
                "warnings: {} unreadable, {} symlink loops",
                result.stats.errors, result.stats.symlink_loops
            ));
        }
        Ok(result)
    }

    /// Run all phases up to aggregation.
    pub fn run(&mut self) -> Result<RunReport> {
        let start = Instant::now();
        let scan = self.scan()?;

        self.enter(Phase::Bootstrapping);
        let python = resolve_python(self.options.python.as_deref(), self.runner);
        let needed = self.families_needing_tools(&scan);
        let bootstrap = if needed.is_empty() {
            BootstrapReport::default()
        } else {
            self.verbose.section("Bootstrap");
            let ctx = BootstrapContext {
                root: self.options.root.clone(),
                tool_dir: self.options.tool_dir.clone(),
                python: python.clone(),
                install_enabled: self.options.install,
            };
            Bootstrapper::new(&ctx, self.runner, self.verbose).run(&needed)?
        };

        self.enter(Phase::Dispatching);
        self.verbose.section("Dispatch");
        let ctx = DispatchContext {
            root: self.options.root.clone(),
            tool_dir: self.options.tool_dir.clone(),
            python,
            mode: self.options.mode,
            jobs: self.options.jobs,
            timeout: self.options.timeout,
            max_arg_bytes: self.options.max_arg_bytes,
        };
        let enabled_buckets: Buckets = scan
            .buckets
            .iter()
            .filter(|(id, _)| self.options.enabled.contains(*id))
            .map(|(id, files)| (*id, files.clone()))
            .collect();
        let results = Dispatcher::new(&ctx, self.runner, self.verbose)
            .dispatch(&enabled_buckets, &bootstrap.satisfaction)?;

        self.enter(Phase::Aggregating);
        let disabled = self.options.disabled();
        Ok(RunReport::build(ReportInputs {
            mode: self.options.mode,
            root: self.options.root.clone(),
            scan: &scan,
            bootstrap: &bootstrap,
            results,
            disabled: &disabled,
            duration: start.elapsed(),
        }))
    }

    /// Mark the report as emitted.
    pub fn finish(&mut self) -> Result<()> {
        if self.phase != Phase::Aggregating {
            return Err(Error::Internal(format!(
                "cannot report from phase {}",
                self.phase
            )));
        }
        self.enter(Phase::Reported);
        Ok(())
    }

    /// Enabled families with files whose mode has a command.
    fn families_needing_tools(&self, scan: &ScanResult) -> Vec<FamilyId> {
        scan.buckets
            .iter()
            .filter(|(id, files)| {
                !files.is_empty()
                    && self.options.enabled.contains(*id)
                    && id.family().template(self.options.mode).is_some()
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
