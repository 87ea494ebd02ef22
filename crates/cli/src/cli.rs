// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::duration::parse_duration;
use crate::family::{FamilyId, Mode};
pub use crate::output::OutputFormat;

/// Drop-in lint orchestrator: finds source files, installs linters, runs them
#[derive(Parser)]
#[command(name = "stylecheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "STYLECHECK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every applicable linter in check mode (default)
    Check(RunArgs),
    /// Run linters that support it in auto-fix mode
    Fix(RunArgs),
    /// List linter families and whether their tooling is installed
    Families(FamiliesArgs),
}

impl Command {
    /// Run mode for `check`/`fix`.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Command::Check(_) => Some(Mode::Check),
            Command::Fix(_) => Some(Mode::Fix),
            Command::Families(_) => None,
        }
    }
}

#[derive(clap::Args, Default)]
pub struct RunArgs {
    /// Project root to scan (default: parent of the tool directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory holding linter configs and node_modules
    #[arg(long, value_name = "DIR", env = "STYLECHECK_HOME")]
    pub tool_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Also write the JSON report to a file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Families dispatched concurrently
    #[arg(short, long, value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Per-invocation timeout (e.g. 30s, 10m)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Never run installers; report missing tooling instead
    #[arg(long)]
    pub no_install: bool,

    /// Run only these families (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_family, value_name = "FAMILY")]
    pub only: Vec<FamilyId>,

    /// Skip these families (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_family, value_name = "FAMILY")]
    pub skip: Vec<FamilyId>,

    /// Additional directory or file name to exclude (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Force color output
    #[arg(long)]
    pub color: bool,

    /// Disable color output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// List scanned files and exit (for debugging)
    #[arg(long, hide = true)]
    pub list_files: bool,
}

impl RunArgs {
    /// Color flag: `Some(true)` forced, `Some(false)` disabled, `None` auto.
    pub fn color_flag(&self) -> Option<bool> {
        if self.no_color {
            Some(false)
        } else if self.color {
            Some(true)
        } else {
            None
        }
    }

    /// Whether `--only`/`--skip` allow a family to run.
    pub fn allows(&self, id: FamilyId) -> bool {
        if !self.only.is_empty() {
            self.only.contains(&id)
        } else {
            !self.skip.contains(&id)
        }
    }
}

#[derive(clap::Args, Default)]
pub struct FamiliesArgs {
    /// Directory holding linter configs and node_modules
    #[arg(long, value_name = "DIR", env = "STYLECHECK_HOME")]
    pub tool_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

fn parse_family(s: &str) -> Result<FamilyId, String> {
    FamilyId::from_name(s).ok_or_else(|| {
        let names: Vec<_> = FamilyId::ALL.iter().map(|id| id.name()).collect();
        format!("unknown family `{}` (expected one of: {})", s, names.join(", "))
    })
}

fn parse_jobs(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
