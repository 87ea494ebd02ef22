// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Stylecheck error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid command-line arguments
    #[error("argument error: {0}")]
    Argument(String),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walker error.
    #[error("walk error: {message}")]
    Walk { message: String },

    /// The run was interrupted before the report was produced.
    #[error("interrupted")]
    Cancelled,

    /// Internal error (bug)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type using stylecheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every dispatched linter passed
    Success = 0,
    /// At least one linter reported findings
    FindingsFound = 1,
    /// Configuration or argument error
    ConfigError = 2,
    /// A linter could not be run or its dependency could not be satisfied
    ToolFailure = 3,
    /// Internal error
    InternalError = 4,
    /// Interrupted by the user (128 + SIGINT)
    Interrupted = 130,
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config { .. } | Error::Argument(_) => ExitCode::ConfigError,
            Error::Io { .. } | Error::Walk { .. } => ExitCode::InternalError,
            Error::Cancelled => ExitCode::Interrupted,
            Error::Internal(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
