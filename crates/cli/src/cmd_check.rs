// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check and fix command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat, RunArgs};
use crate::color::resolve_color;
use crate::config::{self, Config};
use crate::discovery;
use crate::dispatch::default_jobs;
use crate::error::{Error, ExitCode, Result};
use crate::exclude::{DEFAULT_EXCLUDED_NAMES, ExclusionMatcher};
use crate::exec::{CancelToken, SystemRunner};
use crate::family::{FamilyId, Mode};
use crate::orchestrator::{Orchestrator, RunOptions};
use crate::output::json::{JsonFormatter, write_report_file};
use crate::output::text::TextFormatter;
use crate::verbose::VerboseLogger;
use crate::walker::WalkerConfig;

/// Environment variable naming the Python interpreter to use.
pub const PYTHON_ENV: &str = "STYLECHECK_PYTHON";

/// Resolve the tool directory: flag/env, else the executable's directory.
pub fn resolve_tool_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_exe()
            .ok()
            .and_then(|exe| discovery::default_tool_dir(&exe))
            .ok_or_else(|| {
                Error::Argument("cannot locate the tool directory; pass --tool-dir".into())
            })?,
    };
    discovery::absolute(&dir)
}

/// Scan root: `--root`, else the parent of the tool directory.
pub fn resolve_root(explicit: Option<&Path>, tool_dir: &Path) -> Result<PathBuf> {
    match explicit {
        Some(root) => discovery::absolute(root),
        None => Ok(discovery::default_root(tool_dir)),
    }
}

/// Combine CLI flags and config file into run options.
///
/// CLI flags win over config values.
pub fn build_options(
    args: &RunArgs,
    config: &Config,
    mode: Mode,
    root: PathBuf,
    tool_dir: PathBuf,
    python: Option<String>,
) -> Result<RunOptions> {
    let tool_name = tool_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    let names = DEFAULT_EXCLUDED_NAMES
        .iter()
        .map(|s| s.to_string())
        .chain(tool_name)
        .chain(config.exclude.names.iter().cloned())
        .chain(args.exclude.iter().cloned());
    let matcher = ExclusionMatcher::new(
        names,
        config.exclude.globs.iter().cloned(),
        config.exclude.hidden,
    )?;

    let walker = WalkerConfig {
        git_ignore: config.exclude.gitignore,
        ..WalkerConfig::default()
    };

    let enabled = FamilyId::ALL
        .into_iter()
        .filter(|id| config.family_enabled(*id) && args.allows(*id))
        .collect();

    let mut options = RunOptions::new(mode, root, tool_dir);
    options.python = python;
    options.jobs = args.jobs.or(config.dispatch.jobs).unwrap_or_else(default_jobs);
    options.timeout = args.timeout.or(config.dispatch.timeout);
    options.install = config.install.enabled && !args.no_install;
    options.matcher = matcher;
    options.walker = walker;
    options.enabled = enabled;
    Ok(options)
}

/// Run the check or fix command.
pub fn run(cli: &Cli, args: &RunArgs, mode: Mode, cancel: CancelToken) -> anyhow::Result<ExitCode> {
    let tool_dir = resolve_tool_dir(args.tool_dir.as_deref())?;
    let root = resolve_root(args.root.as_deref(), &tool_dir)?;

    let config = match discovery::resolve_config(cli.config.as_deref(), &tool_dir, &root)? {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            config::load_with_warnings(&path)?
        }
        None => {
            tracing::debug!("no config found, using defaults");
            Config::default()
        }
    };

    let python = std::env::var(PYTHON_ENV).ok().filter(|p| !p.trim().is_empty());
    let options = build_options(args, &config, mode, root, tool_dir, python)?;
    let verbose = VerboseLogger::from_env(args.verbose);
    let runner = SystemRunner::new(cancel.clone());
    let color = resolve_color(args.color_flag());

    let root = options.root.clone();
    let ignored = options.matcher.names().to_vec();
    let mut orchestrator = Orchestrator::new(options, &runner, verbose);

    if args.list_files {
        let scan = orchestrator.scan()?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for (family, files) in &scan.buckets {
            for file in files {
                writeln!(out, "{}\t{}", file.rel_path.display(), family)?;
            }
        }
        return Ok(ExitCode::Success);
    }

    if args.output == OutputFormat::Text {
        TextFormatter::stdout(color).write_banner(&root, &ignored)?;
    }

    let report = orchestrator.run()?;
    if cancel.is_cancelled() {
        return Err(Error::Cancelled.into());
    }

    match args.output {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::stdout(color);
            formatter.write_report(&report)?;
        }
        OutputFormat::Json => {
            let stdout = std::io::stdout();
            JsonFormatter::new(stdout.lock()).write(&report)?;
        }
    }
    if let Some(path) = &args.json {
        write_report_file(path, &report)?;
    }
    orchestrator.finish()?;

    Ok(report.exit_code())
}

#[cfg(test)]
#[path = "cmd_check_tests.rs"]
mod tests;
