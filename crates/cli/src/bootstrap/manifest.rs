// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal `package.json` for the tool directory.
//!
//! `npm install` needs a manifest listing the linters. When the tool
//! directory ships without one, a minimal manifest is written first.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// Node packages installed into the tool directory, with version ranges.
pub const DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@eslint/js", "^9.33.0"),
    ("eslint", "^9.33.0"),
    ("htmlhint", "^1.2.3"),
    ("stylelint", "^16.23.1"),
    ("stylelint-config-standard", "^39.0.0"),
];

/// Manifest file name.
pub const MANIFEST_NAME: &str = "package.json";

/// Minimal manifest declaring the linters as dev dependencies.
pub fn minimal_manifest() -> Value {
    let dev_dependencies: Map<String, Value> = DEV_DEPENDENCIES
        .iter()
        .map(|(name, version)| (name.to_string(), Value::from(*version)))
        .collect();

    json!({
        "name": "stylecheck-tools",
        "version": "1.0.0",
        "private": true,
        "type": "commonjs",
        "devDependencies": dev_dependencies,
    })
}

/// Write the minimal manifest if `tool_dir` has none.
///
/// Returns the path written, or `None` if a manifest already existed.
pub fn ensure_package_json(tool_dir: &Path) -> Result<Option<PathBuf>> {
    let path = tool_dir.join(MANIFEST_NAME);
    if path.exists() {
        return Ok(None);
    }

    let mut content = serde_json::to_string_pretty(&minimal_manifest())
        .map_err(|e| Error::Internal(format!("failed to serialize {MANIFEST_NAME}: {e}")))?;
    content.push('\n');

    std::fs::write(&path, content).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("wrote {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
