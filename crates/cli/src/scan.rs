// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! File discovery and bucketing.
//!
//! Walks the project root and routes every surviving regular file to the
//! family that claims its extension. Files no family claims are recorded but
//! never dispatched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::family::{FamilyId, family_for_path};
use crate::walker::{FileWalker, WalkStats};

/// A file found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path joined to the scan root.
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub rel_path: PathBuf,
    /// Family claiming the file's extension.
    pub family: Option<FamilyId>,
}

/// Files grouped by family.
pub type Buckets = BTreeMap<FamilyId, Vec<DiscoveredFile>>;

/// Result of scanning a root.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Claimed files per family, each sorted by relative path. Families
    /// with no files have no entry.
    pub buckets: Buckets,
    /// Relative paths of files no family claims, sorted.
    pub unclaimed: Vec<PathBuf>,
    pub stats: WalkStats,
}

impl ScanResult {
    /// Number of files routed to a family.
    pub fn claimed_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Files claimed by one family (empty if none).
    pub fn files_for(&self, family: FamilyId) -> &[DiscoveredFile] {
        self.buckets.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any family has files to lint.
    pub fn has_applicable_files(&self) -> bool {
        self.buckets.values().any(|files| !files.is_empty())
    }
}

/// Walk `root` and bucket its files by family.
///
/// Fails only if the root itself is not a readable directory; problems
/// below the root are counted in the walk stats.
pub fn scan(root: &Path, walker: &FileWalker) -> Result<ScanResult> {
    let meta = std::fs::metadata(root).map_err(|source| Error::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(Error::Io {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let (rx, handle) = walker.walk(root);
    let mut result = ScanResult::default();

    for walked in rx {
        let family = family_for_path(&walked.rel_path);
        match family {
            Some(id) => {
                tracing::trace!("{} -> {}", walked.rel_path.display(), id);
                result.buckets.entry(id).or_default().push(DiscoveredFile {
                    path: walked.path,
                    rel_path: walked.rel_path,
                    family,
                });
            }
            None => result.unclaimed.push(walked.rel_path),
        }
    }

    result.stats = handle.join();

    // Parallel walks deliver files in arbitrary order.
    for files in result.buckets.values_mut() {
        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    }
    result.unclaimed.sort();

    tracing::debug!(
        "scan: {} files, {} claimed, {} unclaimed, {} dirs pruned",
        result.stats.files_found,
        result.claimed_count(),
        result.unclaimed.len(),
        result.stats.dirs_pruned,
    );

    Ok(result)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
