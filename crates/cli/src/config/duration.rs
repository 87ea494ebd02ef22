// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Duration string parsing for linter timeouts.
//!
//! Supports formats:
//! - `"30s"` → 30 seconds
//! - `"500ms"` → 500 milliseconds
//! - `"1m"` → 1 minute
//! - `"1.5s"` → 1.5 seconds

use std::time::Duration;

/// Parse a duration string into a Duration.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Check for milliseconds first (longer suffix)
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        return Ok(Duration::from_millis(n));
    }

    // Seconds may be fractional
    if let Some(secs) = s.strip_suffix('s') {
        let n: f64 = secs
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        if !n.is_finite() || n < 0.0 {
            return Err(format!("invalid duration: {s}"));
        }
        return Ok(Duration::from_secs_f64(n));
    }

    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        return Ok(Duration::from_secs(n * 60));
    }

    Err(format!(
        "invalid duration format: {s} (use 30s, 500ms, or 1m)"
    ))
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
