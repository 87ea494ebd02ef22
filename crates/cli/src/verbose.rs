// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verbose output logger for diagnostic information.
//!
//! Writes `[verbose]` prefixed lines to stderr. Enabled with `--verbose`
//! or `STYLECHECK_DEBUG=1`.

use crate::exec::CommandSpec;

/// Verbose output logger. Writes to stderr with a `[verbose]` prefix.
/// All output is conditional on verbose mode being enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerboseLogger {
    enabled: bool,
}

impl VerboseLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled by the flag or by `STYLECHECK_DEBUG=1`.
    pub fn from_env(flag: bool) -> Self {
        let debug = std::env::var("STYLECHECK_DEBUG").is_ok_and(|v| v == "1");
        Self::new(flag || debug)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Print a verbose line to stderr.
    pub fn log(&self, msg: &str) {
        if self.enabled {
            eprintln!("{}", Self::format(msg));
        }
    }

    /// Print a verbose section header.
    pub fn section(&self, title: &str) {
        if self.enabled {
            eprintln!("[verbose] === {} ===", title);
        }
    }

    /// Print the command line about to run and where.
    pub fn command(&self, spec: &CommandSpec) {
        if self.enabled {
            self.log(&format!("$ {} (in {})", spec.display(), spec.cwd.display()));
        }
    }

    fn format(msg: &str) -> String {
        format!("[verbose] {}", msg)
    }
}

#[cfg(test)]
#[path = "verbose_tests.rs"]
mod tests;
