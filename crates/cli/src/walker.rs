// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel file walking with subtree pruning.
//!
//! Uses the `ignore` crate for efficient file discovery. Excluded
//! directories are rejected in `filter_entry`, so the walker never descends
//! into them: no I/O happens below an excluded directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use ignore::{DirEntry, WalkBuilder, WalkState};

use crate::exclude::ExclusionMatcher;
use crate::longpath;

/// Helper to check if an ignore::Error is a symlink loop error.
fn is_loop_error(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. } => is_loop_error(err),
        ignore::Error::WithDepth { err, .. } => is_loop_error(err),
        ignore::Error::WithLineNumber { err, .. } => is_loop_error(err),
        _ => false,
    }
}

/// Default maximum directory depth.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default threshold for switching from sequential to parallel walking.
/// Parallel overhead exceeds its benefit for small trees.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Maximum directory depth (default: 100).
    pub max_depth: Option<usize>,

    /// Whether to also respect .gitignore files.
    pub git_ignore: bool,

    /// Number of threads (0 = auto).
    pub threads: usize,

    /// Minimum file count estimate for parallel walking (default: 1000).
    pub parallel_threshold: usize,

    /// Force parallel mode regardless of heuristic.
    pub force_parallel: bool,

    /// Force sequential mode regardless of heuristic.
    pub force_sequential: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            git_ignore: false,
            threads: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            force_parallel: false,
            force_sequential: false,
        }
    }
}

/// File discovered by the walker.
#[derive(Debug)]
pub struct WalkedFile {
    /// Path to the file, in the caller's (non-extended) form.
    pub path: PathBuf,

    /// Path relative to the walk root.
    pub rel_path: PathBuf,

    /// Directory depth from root.
    pub depth: usize,
}

/// Statistics from a walk operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    /// Total files discovered.
    pub files_found: usize,

    /// Files skipped by exclusion rules.
    pub files_excluded: usize,

    /// Directories pruned by exclusion rules (contents never visited).
    pub dirs_pruned: usize,

    /// Symlink loops detected.
    pub symlink_loops: usize,

    /// Unreadable or vanished entries.
    pub errors: usize,
}

#[derive(Default)]
struct Counters {
    files_found: AtomicUsize,
    files_excluded: AtomicUsize,
    dirs_pruned: AtomicUsize,
    symlink_loops: AtomicUsize,
    errors: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> WalkStats {
        WalkStats {
            files_found: self.files_found.load(Ordering::Relaxed),
            files_excluded: self.files_excluded.load(Ordering::Relaxed),
            dirs_pruned: self.dirs_pruned.load(Ordering::Relaxed),
            symlink_loops: self.symlink_loops.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    fn record_error(&self, err: &ignore::Error) {
        if is_loop_error(err) {
            tracing::warn!("symlink loop detected: {}", err);
            self.symlink_loops.fetch_add(1, Ordering::Relaxed);
        } else {
            tracing::warn!("skipping unreadable entry: {}", err);
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Where walked entries are mapped back to the caller's paths.
#[derive(Clone)]
struct Roots {
    /// Root the walker actually traverses (extended form on Windows).
    walk: PathBuf,
    /// Root as given by the caller.
    display: PathBuf,
}

impl Roots {
    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.walk).unwrap_or(path)
    }
}

/// Parallel file walker with exclusion pruning.
pub struct FileWalker {
    config: WalkerConfig,
    matcher: Arc<ExclusionMatcher>,
}

impl FileWalker {
    /// Create a new walker with the given configuration and exclusion rules.
    pub fn new(config: WalkerConfig, matcher: ExclusionMatcher) -> Self {
        Self {
            config,
            matcher: Arc::new(matcher),
        }
    }

    /// Exclusion rules applied by this walker.
    pub fn matcher(&self) -> &ExclusionMatcher {
        &self.matcher
    }

    /// Determine whether to use parallel walking based on heuristics.
    ///
    /// Uses a quick count of top-level directory entries as a proxy for total file count.
    fn should_use_parallel(&self, root: &Path) -> bool {
        if self.config.force_parallel {
            return true;
        }
        if self.config.force_sequential {
            return false;
        }

        let entry_count = std::fs::read_dir(root)
            .map(|entries| entries.count())
            .unwrap_or(0);

        entry_count >= self.config.parallel_threshold / 10
    }

    /// Walk the given root directory, returning a receiver of discovered files.
    ///
    /// Files are streamed through the channel as they're discovered.
    /// Returns (receiver, handle) where the handle can be joined to get stats.
    pub fn walk(&self, root: &Path) -> (Receiver<WalkedFile>, WalkHandle) {
        let (tx, rx) = bounded(1000);
        let roots = Roots {
            walk: longpath::to_long_path(root),
            display: root.to_path_buf(),
        };
        let counters = Arc::new(Counters::default());

        let mut builder = WalkBuilder::new(&roots.walk);
        builder
            // Hidden entries are handled by the matcher so the rule is configurable.
            .hidden(false)
            .ignore(false)
            .parents(self.config.git_ignore)
            .git_ignore(self.config.git_ignore)
            .git_exclude(self.config.git_ignore)
            .git_global(self.config.git_ignore)
            .follow_links(true); // ignore crate detects loops

        if let Some(depth) = self.config.max_depth {
            builder.max_depth(Some(depth));
        }

        if self.config.threads > 0 {
            builder.threads(self.config.threads);
        }

        // Prune excluded entries during traversal. Returning false for a
        // directory stops the walker from descending into it.
        let matcher = Arc::clone(&self.matcher);
        let filter_roots = roots.clone();
        let filter_counters = Arc::clone(&counters);
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let rel = filter_roots.relative(entry.path());
            if !matcher.is_excluded(rel) {
                return true;
            }
            if is_dir(entry) {
                tracing::trace!("pruned {}", rel.display());
                filter_counters.dirs_pruned.fetch_add(1, Ordering::Relaxed);
            } else {
                filter_counters
                    .files_excluded
                    .fetch_add(1, Ordering::Relaxed);
            }
            false
        });

        let handle = if self.should_use_parallel(root) {
            Self::walk_parallel(builder, tx, roots, counters)
        } else {
            Self::walk_sequential(builder, tx, roots, counters)
        };

        (rx, handle)
    }

    /// Run parallel walker in a background thread.
    fn walk_parallel(
        builder: WalkBuilder,
        tx: Sender<WalkedFile>,
        roots: Roots,
        counters: Arc<Counters>,
    ) -> WalkHandle {
        let walker = builder.build_parallel();

        let handle = std::thread::spawn(move || {
            walker.run(|| {
                let tx = tx.clone();
                let roots = roots.clone();
                let counters = Arc::clone(&counters);

                Box::new(move |entry| match entry {
                    Ok(entry) => {
                        if !is_file(&entry) {
                            return WalkState::Continue;
                        }
                        counters.files_found.fetch_add(1, Ordering::Relaxed);
                        if tx.send(build_walked_file(&entry, &roots)).is_err() {
                            return WalkState::Quit;
                        }
                        WalkState::Continue
                    }
                    Err(err) => {
                        counters.record_error(&err);
                        WalkState::Continue
                    }
                })
            });

            counters.snapshot()
        });

        WalkHandle { handle }
    }

    /// Run sequential walker in a background thread.
    /// Avoids thread pool overhead for small directories.
    fn walk_sequential(
        builder: WalkBuilder,
        tx: Sender<WalkedFile>,
        roots: Roots,
        counters: Arc<Counters>,
    ) -> WalkHandle {
        let walker = builder.build();

        let handle = std::thread::spawn(move || {
            for entry in walker {
                match entry {
                    Ok(entry) => {
                        if !is_file(&entry) {
                            continue;
                        }
                        counters.files_found.fetch_add(1, Ordering::Relaxed);
                        if tx.send(build_walked_file(&entry, &roots)).is_err() {
                            break;
                        }
                    }
                    Err(err) => counters.record_error(&err),
                }
            }

            counters.snapshot()
        });

        WalkHandle { handle }
    }

    /// Walk and collect all files.
    pub fn walk_collect(&self, root: &Path) -> (Vec<WalkedFile>, WalkStats) {
        let (rx, handle) = self.walk(root);
        let files: Vec<_> = rx.iter().collect();
        let stats = handle.join();
        (files, stats)
    }
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
}

fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_file())
}

fn build_walked_file(entry: &DirEntry, roots: &Roots) -> WalkedFile {
    let rel_path = roots.relative(entry.path()).to_path_buf();
    WalkedFile {
        path: roots.display.join(&rel_path),
        rel_path,
        depth: entry.depth(),
    }
}

/// Handle to a running walk operation.
pub struct WalkHandle {
    handle: std::thread::JoinHandle<WalkStats>,
}

impl WalkHandle {
    /// Wait for the walk to complete and return stats.
    pub fn join(self) -> WalkStats {
        self.handle.join().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
