// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Extended-length path addressing.
//!
//! Windows limits ordinary paths to 260 characters unless they carry the
//! `\\?\` prefix. The walker roots itself at the extended form so deep
//! project trees stay reachable. Other platforms have no such limit and the
//! conversion is the identity.

use std::path::{Path, PathBuf};

/// Convert a path to the platform's extended-length form.
#[cfg(windows)]
pub fn to_long_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match absolute.to_str() {
        Some(s) => PathBuf::from(extend_windows_path(s)),
        None => absolute,
    }
}

/// Convert a path to the platform's extended-length form.
#[cfg(not(windows))]
pub fn to_long_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}

/// Prefix an absolute Windows path string with `\\?\` (or `\\?\UNC\` for shares).
pub fn extend_windows_path(path: &str) -> String {
    if path.is_empty() || path.starts_with(r"\\?\") {
        return path.to_string();
    }
    if let Some(share) = path.strip_prefix(r"\\") {
        return format!(r"\\?\UNC\{share}");
    }
    format!(r"\\?\{path}")
}

#[cfg(test)]
#[path = "longpath_tests.rs"]
mod tests;
