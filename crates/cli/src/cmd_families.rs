// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `families` command: list the registry and current tool availability.

use std::io::Write;

use serde::Serialize;
use termcolor::{StandardStream, WriteColor};

use crate::bootstrap::{Availability, BootstrapContext, Bootstrapper, resolve_python};
use crate::cli::{Cli, FamiliesArgs, OutputFormat};
use crate::cmd_check::{PYTHON_ENV, resolve_tool_dir};
use crate::color::{resolve_color, scheme};
use crate::discovery;
use crate::error::{ExitCode, Result};
use crate::exec::{CancelToken, CommandRunner, SystemRunner};
use crate::family::{Ecosystem, FamilyId};
use crate::verbose::VerboseLogger;

/// One row of the listing.
#[derive(Debug, Serialize)]
pub struct FamilyListing {
    pub family: FamilyId,
    pub description: &'static str,
    pub extensions: &'static [&'static str],
    pub ecosystem: Ecosystem,
    pub package: &'static str,
    pub fix: bool,
    pub availability: Availability,
}

/// Probe every registered family.
pub fn listing(ctx: &BootstrapContext, runner: &dyn CommandRunner) -> Result<Vec<FamilyListing>> {
    let satisfaction =
        Bootstrapper::new(ctx, runner, VerboseLogger::default()).probe_all(&FamilyId::ALL)?;
    Ok(FamilyId::ALL
        .into_iter()
        .map(|id| {
            let family = id.family();
            FamilyListing {
                family: id,
                description: family.description,
                extensions: family.extensions,
                ecosystem: family.ecosystem,
                package: family.package,
                fix: family.fix.is_some(),
                availability: satisfaction
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Availability::missing("not probed")),
            }
        })
        .collect())
}

/// Write the listing as aligned text.
pub fn write_text<W: WriteColor>(out: &mut W, rows: &[FamilyListing]) -> std::io::Result<()> {
    for row in rows {
        out.set_color(&scheme::family_name())?;
        write!(out, "{:<10}", row.family.name())?;
        out.reset()?;

        let extensions: Vec<_> = row.extensions.iter().map(|e| format!(".{e}")).collect();
        write!(out, " {:<28} {:<7}", extensions.join(" "), row.ecosystem)?;

        match &row.availability {
            Availability::Satisfied => {
                out.set_color(&scheme::pass())?;
                write!(out, "installed")?;
            }
            Availability::Missing { reason } => {
                out.set_color(&scheme::skip())?;
                write!(out, "missing: {reason}")?;
            }
        }
        out.reset()?;
        writeln!(out)?;
    }
    Ok(())
}

/// Run the families command.
pub fn run(_cli: &Cli, args: &FamiliesArgs, cancel: CancelToken) -> anyhow::Result<ExitCode> {
    let tool_dir = resolve_tool_dir(args.tool_dir.as_deref())?;
    let runner = SystemRunner::new(cancel);
    let override_python = std::env::var(PYTHON_ENV).ok();
    let ctx = BootstrapContext {
        root: discovery::default_root(&tool_dir),
        python: resolve_python(override_python.as_deref(), &runner),
        tool_dir,
        install_enabled: false,
    };

    let rows = listing(&ctx, &runner)?;
    match args.output {
        OutputFormat::Text => {
            let mut out = StandardStream::stdout(resolve_color(None));
            write_text(&mut out, &rows)?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)?;
            println!("{json}");
        }
    }
    Ok(ExitCode::Success)
}

#[cfg(test)]
#[path = "cmd_families_tests.rs"]
mod tests;
