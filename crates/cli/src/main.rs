// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! stylecheck CLI entry point.

use clap::Parser;

use stylecheck::app;
use stylecheck::cli::Cli;

fn main() {
    app::init_logging();
    let exit_code = app::run(Cli::parse());
    std::process::exit(exit_code as i32);
}
