// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tool availability probes.
//!
//! A probe never fails the run: a missing interpreter, a failed import, or
//! an absent package all come back as [`Availability::Missing`] with a
//! reason. The only error is cancellation.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use super::BootstrapContext;
use crate::error::{Error, Result};
use crate::exec::{CommandRunner, CommandSpec, ExecError};
use crate::family::{LinterFamily, Probe};

/// Upper bound for a single import probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Whether a family's tooling can be invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Satisfied,
    Missing { reason: String },
}

impl Availability {
    pub fn missing(reason: impl Into<String>) -> Self {
        Availability::Missing {
            reason: reason.into(),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, Availability::Satisfied)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Availability::Satisfied => None,
            Availability::Missing { reason } => Some(reason),
        }
    }
}

/// Check whether a family's dependency is present.
pub fn probe(
    family: &LinterFamily,
    ctx: &BootstrapContext,
    runner: &dyn CommandRunner,
) -> Result<Availability> {
    match family.probe {
        Probe::PythonModule(module) => probe_python_module(module, ctx, runner),
        Probe::NodePackage(package) => Ok(probe_node_package(package, &ctx.tool_dir)),
    }
}

fn probe_python_module(
    module: &str,
    ctx: &BootstrapContext,
    runner: &dyn CommandRunner,
) -> Result<Availability> {
    let Some(python) = ctx.python.as_deref() else {
        return Ok(Availability::missing(
            "no Python interpreter found (tried python3, python)",
        ));
    };

    let spec = CommandSpec::new(python, &ctx.root)
        .arg("-c")
        .arg(format!("import {module}"))
        .timeout(Some(PROBE_TIMEOUT));

    match runner.run(&spec) {
        Ok(output) if output.success() => Ok(Availability::Satisfied),
        Ok(_) => Ok(Availability::missing(format!(
            "python module `{module}` is not installed for {python}"
        ))),
        Err(ExecError::Cancelled { .. }) => Err(Error::Cancelled),
        Err(e) => Ok(Availability::missing(e.to_string())),
    }
}

fn probe_node_package(package: &str, tool_dir: &Path) -> Availability {
    if node_package_installed(tool_dir, package) {
        Availability::Satisfied
    } else {
        Availability::missing(format!(
            "npm package `{package}` is not installed in {}",
            tool_dir.join("node_modules").display()
        ))
    }
}

/// Whether `tool_dir/node_modules/<package>` holds an installed package.
pub fn node_package_installed(tool_dir: &Path, package: &str) -> bool {
    let mut dir = tool_dir.join("node_modules");
    // Scoped packages (`@scope/name`) nest one level deeper.
    for part in package.split('/') {
        dir.push(part);
    }
    dir.join("package.json").is_file()
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
