// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency bootstrap: probe each family, install what is missing.
//!
//! Unsatisfied families are grouped by ecosystem. Each ecosystem's install
//! command runs at most once per run, then every family in the group is
//! re-probed. The outcome is an explicit [`Satisfaction`] map consumed by
//! the dispatcher.

pub mod install;
pub mod manifest;
pub mod probe;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::exec::CommandRunner;
use crate::family::{Ecosystem, FamilyId};
use crate::verbose::VerboseLogger;

pub use install::InstallOutcome;
pub use probe::Availability;

/// Paths and settings shared by probes and installers.
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    /// Project root (cwd for Python commands).
    pub root: PathBuf,
    /// Tool directory (holds linter configs, package.json, node_modules).
    pub tool_dir: PathBuf,
    /// Resolved Python interpreter, if any.
    pub python: Option<String>,
    /// Whether missing tooling may be installed.
    pub install_enabled: bool,
}

/// Interpreters tried in order when no override is given.
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Resolve the Python interpreter: explicit override, then `python3`, then `python`.
pub fn resolve_python(override_program: Option<&str>, runner: &dyn CommandRunner) -> Option<String> {
    if let Some(program) = override_program.filter(|p| !p.trim().is_empty()) {
        return Some(program.to_string());
    }
    PYTHON_CANDIDATES
        .iter()
        .find(|candidate| runner.resolve(candidate).is_some())
        .map(|candidate| candidate.to_string())
}

/// Per-family availability after bootstrap.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Satisfaction(BTreeMap<FamilyId, Availability>);

impl Satisfaction {
    pub fn insert(&mut self, family: FamilyId, availability: Availability) {
        self.0.insert(family, availability);
    }

    pub fn get(&self, family: FamilyId) -> Option<&Availability> {
        self.0.get(&family)
    }

    /// Whether the family may be dispatched. Unprobed families are not.
    pub fn is_satisfied(&self, family: FamilyId) -> bool {
        self.get(family).is_some_and(Availability::is_satisfied)
    }

    /// Reason a family is unavailable.
    pub fn reason(&self, family: FamilyId) -> Option<&str> {
        self.get(family).and_then(Availability::reason)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FamilyId, &Availability)> {
        self.0.iter().map(|(id, a)| (*id, a))
    }
}

/// Something bootstrap did (or could not do) this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BootstrapAction {
    /// An install command ran and the listed families now probe as satisfied.
    Installed {
        ecosystem: Ecosystem,
        families: Vec<FamilyId>,
        command: String,
    },
    /// An install ran but the family still probes as missing.
    InstallFailed {
        ecosystem: Ecosystem,
        family: FamilyId,
        reason: String,
    },
    /// The installer program is unavailable; the ecosystem cannot be set up.
    ConfigError {
        ecosystem: Ecosystem,
        families: Vec<FamilyId>,
        message: String,
    },
}

/// Outcome of the bootstrap phase.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    pub satisfaction: Satisfaction,
    pub actions: Vec<BootstrapAction>,
}

impl BootstrapReport {
    /// Number of install commands that produced a usable family.
    pub fn installs(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, BootstrapAction::Installed { .. }))
            .count()
    }
}

/// Probes families and installs missing tooling.
pub struct Bootstrapper<'a> {
    ctx: &'a BootstrapContext,
    runner: &'a dyn CommandRunner,
    verbose: VerboseLogger,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(ctx: &'a BootstrapContext, runner: &'a dyn CommandRunner, verbose: VerboseLogger) -> Self {
        Self {
            ctx,
            runner,
            verbose,
        }
    }

    /// Probe only, never install.
    pub fn probe_all(&self, families: &[FamilyId]) -> Result<Satisfaction> {
        let mut satisfaction = Satisfaction::default();
        for &id in families {
            satisfaction.insert(id, probe::probe(id.family(), self.ctx, self.runner)?);
        }
        Ok(satisfaction)
    }

    /// Probe `families`, install missing ecosystems once each, and re-probe.
    ///
    /// Returns `Err` only when the run is cancelled. Installer problems
    /// degrade their own ecosystem and are recorded as actions.
    pub fn run(&self, families: &[FamilyId]) -> Result<BootstrapReport> {
        let mut report = BootstrapReport {
            satisfaction: self.probe_all(families)?,
            actions: Vec::new(),
        };

        let mut missing: BTreeMap<Ecosystem, Vec<FamilyId>> = BTreeMap::new();
        for (id, availability) in report.satisfaction.iter() {
            if !availability.is_satisfied() {
                missing.entry(id.family().ecosystem).or_default().push(id);
            }
        }

        if missing.is_empty() {
            tracing::debug!("bootstrap: all {} families satisfied", families.len());
            return Ok(report);
        }

        for (ecosystem, ids) in missing {
            if !self.ctx.install_enabled {
                for id in &ids {
                    let reason = report.satisfaction.reason(*id).unwrap_or_default().to_string();
                    report.satisfaction.insert(
                        *id,
                        Availability::missing(format!("{reason} (installation disabled)")),
                    );
                }
                continue;
            }
            self.install_ecosystem(ecosystem, &ids, &mut report)?;
        }

        Ok(report)
    }

    fn install_ecosystem(
        &self,
        ecosystem: Ecosystem,
        ids: &[FamilyId],
        report: &mut BootstrapReport,
    ) -> Result<()> {
        self.verbose.log(&format!(
            "installing {} tooling for {}",
            ecosystem,
            ids.iter().map(|id| id.name()).collect::<Vec<_>>().join(", ")
        ));

        match install::install(ecosystem, ids, self.ctx, self.runner, &self.verbose)? {
            InstallOutcome::InstallerMissing { message } => {
                tracing::warn!("{}", message);
                for id in ids {
                    report
                        .satisfaction
                        .insert(*id, Availability::missing(message.clone()));
                }
                report.actions.push(BootstrapAction::ConfigError {
                    ecosystem,
                    families: ids.to_vec(),
                    message,
                });
            }
            InstallOutcome::Ran {
                command,
                success,
                detail,
            } => {
                let mut installed = Vec::new();
                for &id in ids {
                    let availability = probe::probe(id.family(), self.ctx, self.runner)?;
                    if availability.is_satisfied() {
                        installed.push(id);
                    } else {
                        let reason = if success {
                            availability.reason().unwrap_or_default().to_string()
                        } else {
                            detail.clone()
                        };
                        report.actions.push(BootstrapAction::InstallFailed {
                            ecosystem,
                            family: id,
                            reason: reason.clone(),
                        });
                        report
                            .satisfaction
                            .insert(id, Availability::missing(format!("install failed: {reason}")));
                        continue;
                    }
                    report.satisfaction.insert(id, availability);
                }
                if !installed.is_empty() {
                    report.actions.push(BootstrapAction::Installed {
                        ecosystem,
                        families: installed,
                        command,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
