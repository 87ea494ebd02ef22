// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run aggregation.
//!
//! Folds scan, bootstrap, and dispatch results into one [`RunReport`]
//! with a status for every registered family, and derives the exit code.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::bootstrap::{BootstrapAction, BootstrapReport};
use crate::dispatch::{DispatchResult, Outcome};
use crate::error::ExitCode;
use crate::family::{FamilyId, Mode};
use crate::scan::ScanResult;

/// Final status of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStatus {
    Passed,
    Findings,
    FailedToRun,
    /// No files routed to this family.
    SkippedNoFiles,
    /// Files present but the tooling is unavailable.
    SkippedUnsatisfied,
    /// Fix mode and the family has no fix command.
    SkippedNoFixMode,
    /// Turned off by config or `--only`/`--skip`.
    Disabled,
}

impl FamilyStatus {
    /// Short label for console output.
    pub fn label(self) -> &'static str {
        match self {
            FamilyStatus::Passed => "PASS",
            FamilyStatus::Findings => "FAIL",
            FamilyStatus::FailedToRun => "ERROR",
            FamilyStatus::SkippedUnsatisfied => "SKIP",
            FamilyStatus::SkippedNoFiles
            | FamilyStatus::SkippedNoFixMode
            | FamilyStatus::Disabled => "skip",
        }
    }

    /// Whether this status makes the run fail.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            FamilyStatus::Findings | FamilyStatus::FailedToRun | FamilyStatus::SkippedUnsatisfied
        )
    }

    /// Whether the run could not do its job for this family.
    pub fn is_fault(self) -> bool {
        matches!(self, FamilyStatus::FailedToRun | FamilyStatus::SkippedUnsatisfied)
    }
}

/// Per-family line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct FamilySummary {
    pub family: FamilyId,
    pub status: FamilyStatus,
    pub files: usize,
    pub invocations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Why the family was skipped or failed to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Raw tool output (only kept for failing families).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output: String,
    pub duration_ms: u64,
}

impl FamilySummary {
    fn skipped(family: FamilyId, status: FamilyStatus, files: usize, reason: Option<String>) -> Self {
        Self {
            family,
            status,
            files,
            invocations: 0,
            exit_code: None,
            reason,
            output: String::new(),
            duration_ms: 0,
        }
    }

    fn from_result(result: DispatchResult) -> Self {
        let output = result.output();
        let (status, reason) = match result.outcome {
            Outcome::Passed => (FamilyStatus::Passed, None),
            Outcome::Findings => (FamilyStatus::Findings, None),
            Outcome::FailedToRun { reason } => (FamilyStatus::FailedToRun, Some(reason)),
        };
        Self {
            family: result.family,
            status,
            files: result.files,
            invocations: result.invocations,
            exit_code: result.exit_code,
            reason,
            output: if status.is_failure() { output } else { String::new() },
            duration_ms: millis(result.duration),
        }
    }
}

/// Discovery counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_claimed: usize,
    pub files_unclaimed: usize,
    pub dirs_pruned: usize,
    /// Unreadable entries and symlink loops.
    pub warnings: usize,
}

impl From<&ScanResult> for ScanSummary {
    fn from(scan: &ScanResult) -> Self {
        Self {
            files_scanned: scan.stats.files_found,
            files_claimed: scan.claimed_count(),
            files_unclaimed: scan.unclaimed.len(),
            dirs_pruned: scan.stats.dirs_pruned,
            warnings: scan.stats.errors + scan.stats.symlink_loops,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub mode: Mode,
    pub root: PathBuf,
    pub passed: bool,
    pub scan: ScanSummary,
    pub families: Vec<FamilySummary>,
    pub bootstrap: Vec<BootstrapAction>,
    pub duration_ms: u64,
}

/// Inputs to [`RunReport::build`].
pub struct ReportInputs<'a> {
    pub mode: Mode,
    pub root: PathBuf,
    pub scan: &'a ScanResult,
    pub bootstrap: &'a BootstrapReport,
    pub results: Vec<DispatchResult>,
    pub disabled: &'a BTreeSet<FamilyId>,
    pub duration: Duration,
}

impl RunReport {
    /// Assign a status to every registered family.
    pub fn build(inputs: ReportInputs<'_>) -> Self {
        let ReportInputs {
            mode,
            root,
            scan,
            bootstrap,
            mut results,
            disabled,
            duration,
        } = inputs;

        let families: Vec<FamilySummary> = FamilyId::ALL
            .iter()
            .map(|&id| {
                let files = scan.files_for(id).len();
                if disabled.contains(&id) {
                    return FamilySummary::skipped(id, FamilyStatus::Disabled, files, None);
                }
                if files == 0 {
                    return FamilySummary::skipped(id, FamilyStatus::SkippedNoFiles, 0, None);
                }
                if id.family().template(mode).is_none() {
                    return FamilySummary::skipped(
                        id,
                        FamilyStatus::SkippedNoFixMode,
                        files,
                        Some(format!("{} has no fix mode", id)),
                    );
                }
                if let Some(pos) = results.iter().position(|r| r.family == id) {
                    return FamilySummary::from_result(results.swap_remove(pos));
                }
                let reason = bootstrap
                    .satisfaction
                    .reason(id)
                    .unwrap_or("dependency not available")
                    .to_string();
                FamilySummary::skipped(id, FamilyStatus::SkippedUnsatisfied, files, Some(reason))
            })
            .collect();

        let passed = !families.iter().any(|f| f.status.is_failure());

        Self {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            mode,
            root,
            passed,
            scan: ScanSummary::from(scan),
            families,
            bootstrap: bootstrap.actions.clone(),
            duration_ms: millis(duration),
        }
    }

    /// Families that ran or should have run.
    pub fn active(&self) -> impl Iterator<Item = &FamilySummary> {
        self.families.iter().filter(|f| {
            !matches!(
                f.status,
                FamilyStatus::SkippedNoFiles | FamilyStatus::Disabled
            )
        })
    }

    /// No family had files to lint.
    pub fn no_applicable_files(&self) -> bool {
        self.scan.files_claimed == 0
    }

    /// Process exit code: tool faults outrank findings.
    pub fn exit_code(&self) -> ExitCode {
        if self.families.iter().any(|f| f.status.is_fault()) {
            ExitCode::ToolFailure
        } else if self.families.iter().any(|f| f.status == FamilyStatus::Findings) {
            ExitCode::FindingsFound
        } else {
            ExitCode::Success
        }
    }

    /// Count of families with the given status.
    pub fn count(&self, status: FamilyStatus) -> usize {
        self.families.iter().filter(|f| f.status == status).count()
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
