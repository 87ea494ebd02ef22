// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusion rules for the project scan.
//!
//! A relative path is excluded when any of its components equals an excluded
//! name, when any component is hidden (leading `.`, if enabled), or when the
//! whole path matches an excluded glob. Names are compared literally.

use std::path::{Component, Path};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};

/// Directory names skipped by default.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[
    ".venv",
    "venv",
    "__pycache__",
    ".git",
    ".idea",
    ".vscode",
    "node_modules",
    "dist",
    "build",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".tox",
    ".cache",
];

/// Decides whether a path relative to the scan root is skipped.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    names: Vec<String>,
    globs: GlobSet,
    glob_patterns: Vec<String>,
    hidden: bool,
}

impl ExclusionMatcher {
    /// Build a matcher from plain names and glob patterns.
    pub fn new<N, G>(names: N, globs: G, hidden: bool) -> Result<Self>
    where
        N: IntoIterator,
        N::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();

        let mut builder = GlobSetBuilder::new();
        let mut glob_patterns = Vec::new();
        for pattern in globs {
            let pattern: String = pattern.into();
            builder.add(compile_glob(&pattern)?);
            glob_patterns.push(pattern);
        }
        let globs = builder.build().map_err(|e| Error::Config {
            message: format!("invalid exclude globs: {e}"),
            path: None,
        })?;

        Ok(Self {
            names,
            globs,
            glob_patterns,
            hidden,
        })
    }

    /// Matcher with the default names, the tool's own directory, and no globs.
    pub fn with_defaults(tool_dir_name: Option<&str>) -> Self {
        let names = DEFAULT_EXCLUDED_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(tool_dir_name.map(str::to_string));
        let mut names: Vec<String> = names.collect();
        names.sort();
        names.dedup();
        Self {
            names,
            globs: GlobSet::empty(),
            glob_patterns: Vec::new(),
            hidden: true,
        }
    }

    /// Excluded names, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Excluded glob patterns, in configuration order.
    pub fn glob_patterns(&self) -> &[String] {
        &self.glob_patterns
    }

    /// Whether a single path component is excluded by name.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        (self.hidden && name.starts_with('.') && name != "." && name != "..")
            || self.names.iter().any(|n| n == name)
    }

    /// Whether a path relative to the scan root is excluded.
    ///
    /// The empty path (the root itself) is never excluded.
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        let mut any = false;
        for component in rel_path.components() {
            if let Component::Normal(part) = component {
                any = true;
                if part.to_str().is_some_and(|s| self.is_excluded_name(s)) {
                    return true;
                }
            }
        }
        any && !self.globs.is_empty() && self.globs.is_match(rel_path)
    }
}

fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::Config {
            message: format!("invalid exclude glob `{pattern}`: {e}"),
            path: None,
        })
}

#[cfg(test)]
#[path = "exclude_tests.rs"]
mod tests;
