// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output formatter.
//!
//! JSON is buffered and written at the end (not streamed).

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::report::RunReport;

/// JSON output formatter.
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the complete report.
    pub fn write(&mut self, report: &RunReport) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }
}

/// Write the report to a file (`--json FILE`), creating parent directories.
pub fn write_report_file(path: &Path, report: &RunReport) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut writer = std::io::BufWriter::new(file);
    JsonFormatter::new(&mut writer)
        .write(report)
        .map_err(io_err)?;
    writer.flush().map_err(io_err)
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
