// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `cargo stylecheck` entry point.
//!
//! Cargo invokes external subcommands as `cargo-stylecheck stylecheck [args]`.

use clap::Parser;

use stylecheck::app;
use stylecheck::cli::Cli;

fn main() {
    app::init_logging();
    let args = std::env::args_os()
        .enumerate()
        .filter(|(i, arg)| !(*i == 1 && arg == "stylecheck"))
        .map(|(_, arg)| arg);
    let exit_code = app::run(Cli::parse_from(args));
    std::process::exit(exit_code as i32);
}
