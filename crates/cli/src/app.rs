// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level entry shared by the `stylecheck` and `cargo-stylecheck` binaries.

use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Command, RunArgs};
use crate::cmd_check;
use crate::cmd_families;
use crate::error::ExitCode;
use crate::exec::CancelToken;
use crate::family::Mode;

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "STYLECHECK_LOG";

pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Install a Ctrl-C handler that trips the returned token.
fn install_interrupt_handler() -> CancelToken {
    let token = CancelToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::debug!("interrupt received");
        handler_token.cancel();
    }) {
        tracing::warn!("cannot install interrupt handler: {}", e);
    }
    token
}

/// Run a parsed command line and map failures to an exit code.
pub fn run(cli: Cli) -> ExitCode {
    let cancel = install_interrupt_handler();
    match execute(&cli, cancel) {
        Ok(code) => code,
        Err(e) => {
            let code = match e.downcast_ref::<crate::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            };
            if code == ExitCode::Interrupted {
                eprintln!("stylecheck: interrupted");
            } else {
                eprintln!("stylecheck: {}", e);
            }
            code
        }
    }
}

fn execute(cli: &Cli, cancel: CancelToken) -> anyhow::Result<ExitCode> {
    match &cli.command {
        // Bare invocation runs a check with defaults
        None => cmd_check::run(cli, &RunArgs::default(), Mode::Check, cancel),
        Some(Command::Check(args)) => cmd_check::run(cli, args, Mode::Check, cancel),
        Some(Command::Fix(args)) => cmd_check::run(cli, args, Mode::Fix, cancel),
        Some(Command::Families(args)) => cmd_families::run(cli, args, cancel),
    }
}
