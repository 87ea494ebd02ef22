// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-ecosystem install commands.

use super::BootstrapContext;
use super::manifest;
use crate::error::{Error, Result};
use crate::exec::{CommandRunner, CommandSpec, ExecError};
use crate::family::{Ecosystem, FamilyId};
use crate::verbose::VerboseLogger;

/// Result of attempting one ecosystem install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The install command ran (successfully or not). Re-probe to decide.
    Ran {
        command: String,
        success: bool,
        detail: String,
    },
    /// The installer cannot run: its program is missing or the tool
    /// directory cannot hold its manifest.
    InstallerMissing { message: String },
}

/// Build the install command for an ecosystem.
///
/// Returns `Err(message)` when the installer program is unavailable.
pub fn install_command(
    ecosystem: Ecosystem,
    families: &[FamilyId],
    ctx: &BootstrapContext,
    runner: &dyn CommandRunner,
) -> std::result::Result<CommandSpec, String> {
    match ecosystem {
        Ecosystem::Python => {
            let python = ctx
                .python
                .as_deref()
                .ok_or("no Python interpreter found; cannot install Python linters")?;
            let packages = families.iter().map(|id| id.family().package);
            Ok(CommandSpec::new(python, &ctx.root)
                .args(["-m", "pip", "install"])
                .args(packages))
        }
        Ecosystem::Node => {
            if runner.resolve("npm").is_none() {
                return Err("npm not found on PATH; install Node.js to lint JS/CSS/HTML".into());
            }
            Ok(CommandSpec::new("npm", &ctx.tool_dir).arg("install"))
        }
    }
}

/// Run the install command for an ecosystem once.
///
/// Only cancellation is an error. A tool directory that cannot hold the
/// Node manifest leaves the ecosystem unavailable.
pub fn install(
    ecosystem: Ecosystem,
    families: &[FamilyId],
    ctx: &BootstrapContext,
    runner: &dyn CommandRunner,
    verbose: &VerboseLogger,
) -> Result<InstallOutcome> {
    let spec = match install_command(ecosystem, families, ctx, runner) {
        Ok(spec) => spec,
        Err(message) => return Ok(InstallOutcome::InstallerMissing { message }),
    };

    if ecosystem == Ecosystem::Node {
        match manifest::ensure_package_json(&ctx.tool_dir) {
            Ok(Some(path)) => verbose.log(&format!("wrote minimal {}", path.display())),
            Ok(None) => {}
            Err(e) => {
                return Ok(InstallOutcome::InstallerMissing {
                    message: format!("cannot prepare {ecosystem} tooling: {e}"),
                });
            }
        }
    }

    verbose.command(&spec);
    tracing::debug!("installing {} tooling: {}", ecosystem, spec.display());

    let command = spec.display();
    match runner.run(&spec) {
        Ok(output) => {
            let success = output.success();
            let detail = if success {
                String::new()
            } else {
                let text = if output.stderr.trim().is_empty() {
                    output.stdout
                } else {
                    output.stderr
                };
                format!(
                    "`{command}` exited with {}: {}",
                    output.code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    text.trim()
                )
            };
            Ok(InstallOutcome::Ran {
                command,
                success,
                detail,
            })
        }
        Err(ExecError::Cancelled { .. }) => Err(Error::Cancelled),
        Err(ExecError::NotFound { program }) => Ok(InstallOutcome::InstallerMissing {
            message: format!("{program} not found; cannot install {ecosystem} linters"),
        }),
        Err(e) => Ok(InstallOutcome::Ran {
            command,
            success: false,
            detail: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
