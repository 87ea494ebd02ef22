// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! ```text
//! pyflakes: FAIL (2 files, 1 run, 120ms)
//! eslint: PASS (4 files, 1 run, 1.3s)
//! htmlhint: SKIP npm not found on PATH
//!
//! --- pyflakes ---
//! b.py:2:5: local variable 'x' is assigned to but never used
//!
//! 1 family passed, 1 failed, 1 skipped (1.5s)
//! ```

use std::io::Write;
use std::path::Path;

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{format_duration_ms, plural};
use crate::bootstrap::BootstrapAction;
use crate::color::scheme;
use crate::report::{FamilyStatus, FamilySummary, RunReport};

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
}

impl TextFormatter<StandardStream> {
    /// Formatter writing to stdout.
    pub fn stdout(color_choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(color_choice))
    }
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the formatter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Startup banner: scan root and ignored names.
    pub fn write_banner(&mut self, root: &Path, ignored: &[String]) -> std::io::Result<()> {
        write!(self.out, "Checking ")?;
        self.colored(&scheme::path(), &root.display().to_string())?;
        writeln!(self.out)?;
        if !ignored.is_empty() {
            self.colored(&scheme::dim(), &format!("Ignoring: {}", ignored.join(", ")))?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Write the full report: family lines, failing output, summary.
    pub fn write_report(&mut self, report: &RunReport) -> std::io::Result<()> {
        self.write_bootstrap(&report.bootstrap)?;

        if report.no_applicable_files() {
            writeln!(self.out, "no applicable files")?;
            return Ok(());
        }

        for family in report.active() {
            self.write_family(family)?;
        }

        for family in report.active().filter(|f| f.status.is_failure()) {
            self.write_failure_output(family)?;
        }

        writeln!(self.out)?;
        self.write_summary(report)
    }

    fn write_bootstrap(&mut self, actions: &[BootstrapAction]) -> std::io::Result<()> {
        for action in actions {
            match action {
                BootstrapAction::Installed {
                    ecosystem,
                    families,
                    command,
                } => {
                    let names: Vec<_> = families.iter().map(|f| f.name()).collect();
                    writeln!(
                        self.out,
                        "Installed {} tooling for {} ({})",
                        ecosystem,
                        names.join(", "),
                        command
                    )?;
                }
                BootstrapAction::InstallFailed {
                    family, reason, ..
                } => {
                    self.colored(&scheme::warn(), "WARN")?;
                    writeln!(self.out, " {}: install failed: {}", family, reason)?;
                }
                BootstrapAction::ConfigError {
                    ecosystem, message, ..
                } => {
                    self.colored(&scheme::warn(), "WARN")?;
                    writeln!(self.out, " {}: {}", ecosystem, message)?;
                }
            }
        }
        Ok(())
    }

    fn write_family(&mut self, family: &FamilySummary) -> std::io::Result<()> {
        self.colored(&scheme::family_name(), family.family.name())?;
        write!(self.out, ": ")?;

        let spec = match family.status {
            FamilyStatus::Passed => scheme::pass(),
            FamilyStatus::Findings => scheme::fail(),
            FamilyStatus::FailedToRun => scheme::error(),
            _ => scheme::skip(),
        };
        self.colored(&spec, family.status.label())?;

        match family.status {
            FamilyStatus::Passed | FamilyStatus::Findings | FamilyStatus::FailedToRun
                if family.invocations > 0 =>
            {
                write!(self.out, " ")?;
                self.colored(
                    &scheme::dim(),
                    &format!(
                        "({}, {}, {})",
                        plural(family.files, "file"),
                        plural(family.invocations, "run"),
                        format_duration_ms(family.duration_ms)
                    ),
                )?;
            }
            _ => {}
        }

        if let Some(reason) = &family.reason {
            write!(self.out, " {}", reason)?;
        }
        writeln!(self.out)
    }

    fn write_failure_output(&mut self, family: &FamilySummary) -> std::io::Result<()> {
        if family.output.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        self.colored(&scheme::family_name(), &format!("--- {} ---", family.family))?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", family.output.trim_end())
    }

    fn write_summary(&mut self, report: &RunReport) -> std::io::Result<()> {
        let passed = report.count(FamilyStatus::Passed);
        let failed = report.count(FamilyStatus::Findings) + report.count(FamilyStatus::FailedToRun);
        let skipped =
            report.count(FamilyStatus::SkippedUnsatisfied) + report.count(FamilyStatus::SkippedNoFixMode);

        let mut parts = vec![format!("{} passed", plural(passed, "family"))];
        if failed > 0 {
            parts.push(format!("{} failed", failed));
        }
        if skipped > 0 {
            parts.push(format!("{} skipped", skipped));
        }
        write!(self.out, "{} ", parts.join(", "))?;
        self.colored(
            &scheme::dim(),
            &format!("({})", format_duration_ms(report.duration_ms)),
        )?;
        writeln!(self.out)
    }

    fn colored(&mut self, spec: &ColorSpec, text: &str) -> std::io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
