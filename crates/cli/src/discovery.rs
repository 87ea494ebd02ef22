// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tool directory, project root, and config file discovery.
//!
//! The tool lives in a subfolder of the project it checks. By default the
//! tool directory is the directory holding the executable and the project
//! root is its parent.

use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;
use crate::error::{Error, Result};

/// Find stylecheck.toml starting from `start_dir` and walking up to git root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        // Stop at git root
        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Resolve config path from CLI arg, env var, tool directory, or discovery.
///
/// Priority:
/// 1. CLI flag `-C`/`--config` (handled by clap with env = "STYLECHECK_CONFIG")
/// 2. `<tool_dir>/stylecheck.toml`
/// 3. Discovery from the project root up to git root
/// 4. None (use defaults)
pub fn resolve_config(
    explicit: Option<&Path>,
    tool_dir: &Path,
    root: &Path,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(Some(path.to_path_buf()))
        } else {
            Err(Error::Config {
                message: format!("config file not found: {}", path.display()),
                path: Some(path.to_path_buf()),
            })
        };
    }

    let beside_tool = tool_dir.join(CONFIG_FILE_NAME);
    if beside_tool.is_file() {
        return Ok(Some(beside_tool));
    }

    Ok(find_config(root))
}

/// Default tool directory for an executable path.
///
/// Normally the executable's own directory. When the executable was built
/// into a cargo `target/` directory, the directory containing `target` is
/// used so the linter configs next to `Cargo.toml` are found.
pub fn default_tool_dir(exe: &Path) -> Option<PathBuf> {
    let exe_dir = exe.parent()?;
    let target = exe_dir
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == "target"));
    match target.and_then(Path::parent) {
        Some(crate_dir) => Some(crate_dir.to_path_buf()),
        None => Some(exe_dir.to_path_buf()),
    }
}

/// Default project root: the parent of the tool directory.
pub fn default_root(tool_dir: &Path) -> PathBuf {
    tool_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| tool_dir.to_path_buf())
}

/// Resolve a path against the current directory without touching the filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
