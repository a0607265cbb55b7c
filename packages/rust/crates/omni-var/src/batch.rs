//! Batch Refactoring Engine - Heavy-Duty Parallel Processing
//!
//! Walks a source tree with `ignore`, filters by glob, and refactors every
//! matching file in parallel with rayon. Files are independent: each one
//! goes through the same gate and pipeline as [`crate::refactor_source`].

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use globset::{Glob, GlobMatcher};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::io::{DEFAULT_MAX_FILE_SIZE, read_source_file};
use crate::policy::RefactorPolicy;
use crate::processor::{refactor_source, supports_inferred_types};

/// Statistics for batch refactoring operations.
#[derive(Debug, Default, Serialize)]
pub struct BatchRefactorStats {
    /// Number of files processed
    pub files_scanned: usize,
    /// Number of files with at least one replacement
    pub files_changed: usize,
    /// Total number of replacements made
    pub replacements: usize,
    /// Files left untouched because the run was cancelled
    pub files_skipped: usize,
    /// Errors encountered (path -> error message)
    pub errors: HashMap<String, String>,
    /// Modified files, sorted
    pub modified_files: Vec<String>,
}

impl BatchRefactorStats {
    /// Create a new empty stats instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Configuration for batch refactoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// File glob pattern, matched against the path relative to the root
    pub file_pattern: String,
    /// Preview only (true) or write changes back (false)
    pub dry_run: bool,
    /// Maximum file size in bytes (default 1MB)
    pub max_file_size: u64,
    /// Number of parallel workers (0 = auto-detect)
    pub workers: usize,
    /// Skip directories with these names
    pub skip_dirs: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            file_pattern: "**/*.java".to_string(),
            dry_run: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            workers: 0,
            skip_dirs: vec![
                ".git".to_string(),
                "build".to_string(),
                "target".to_string(),
                "node_modules".to_string(),
            ],
        }
    }
}

/// Entry point for tree-wide refactoring.
pub struct VarRefactorer;

impl VarRefactorer {
    /// Refactor every matching file under `root`.
    ///
    /// When `cancel` is set to `true` mid-run, files not yet started are
    /// counted in `files_skipped` and left alone. A closed version gate
    /// still scans the tree but changes nothing.
    #[must_use]
    pub fn refactor_tree(
        root: &Path,
        version: &str,
        policy: &RefactorPolicy,
        config: &BatchConfig,
        cancel: Option<&AtomicBool>,
    ) -> BatchRefactorStats {
        let mut stats = BatchRefactorStats::new();

        let matcher = match Glob::new(&config.file_pattern) {
            Ok(glob) => glob.compile_matcher(),
            Err(e) => {
                stats
                    .errors
                    .insert(config.file_pattern.clone(), format!("Invalid pattern: {e}"));
                return stats;
            }
        };

        if !supports_inferred_types(version) {
            tracing::info!(version, "language version does not support var; nothing to do");
        }

        let files = collect_files(root, &matcher, config);
        tracing::debug!(root = %root.display(), files = files.len(), "collected source files");

        let files_scanned = AtomicUsize::new(0);
        let files_changed = AtomicUsize::new(0);
        let files_skipped = AtomicUsize::new(0);
        let total_replacements = AtomicUsize::new(0);
        let modified_files = DashMap::new();
        let errors: DashMap<String, String> = DashMap::new();

        let process = |path: &PathBuf| {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                files_skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
            files_scanned.fetch_add(1, Ordering::Relaxed);

            let content = match read_source_file(path, config.max_file_size) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    errors.insert(path.display().to_string(), format!("Read error: {e}"));
                    return;
                }
            };

            let result = refactor_source(&content, version, policy);
            if !result.is_modified() {
                return;
            }

            files_changed.fetch_add(1, Ordering::Relaxed);
            total_replacements.fetch_add(result.count, Ordering::Relaxed);
            modified_files.insert(path.display().to_string(), result.count);

            if !config.dry_run
                && let Err(e) = std::fs::write(path, &result.modified)
            {
                tracing::warn!(path = %path.display(), error = %e, "failed to write file");
                errors.insert(path.display().to_string(), format!("Write error: {e}"));
            }
        };

        match worker_pool(config.workers) {
            Some(pool) => pool.install(|| files.par_iter().for_each(process)),
            None => files.par_iter().for_each(process),
        }

        stats.files_scanned = files_scanned.load(Ordering::Relaxed);
        stats.files_changed = files_changed.load(Ordering::Relaxed);
        stats.files_skipped = files_skipped.load(Ordering::Relaxed);
        stats.replacements = total_replacements.load(Ordering::Relaxed);
        stats.modified_files = modified_files.into_iter().map(|(k, _)| k).collect();
        stats.modified_files.sort();
        stats.errors = errors.into_iter().collect();

        tracing::info!(
            scanned = stats.files_scanned,
            changed = stats.files_changed,
            replacements = stats.replacements,
            dry_run = config.dry_run,
            "batch refactor finished"
        );

        stats
    }
}

/// Dedicated pool when a worker count is configured.
fn worker_pool(workers: usize) -> Option<rayon::ThreadPool> {
    if workers == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!(workers, error = %e, "failed to build worker pool; using global pool");
            None
        }
    }
}

/// Files under `root` that match the pattern and sit outside skipped
/// directories, sorted for stable output.
fn collect_files(root: &Path, matcher: &GlobMatcher, config: &BatchConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(root)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            !in_skipped_dir(relative, &config.skip_dirs) && matcher.is_match(relative)
        })
        .collect();
    files.sort();
    files
}

fn in_skipped_dir(relative: &Path, skip_dirs: &[String]) -> bool {
    let Some(parent) = relative.parent() else {
        return false;
    };
    parent.components().any(|component| match component {
        Component::Normal(name) => skip_dirs.iter().any(|skip| name == skip.as_str()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LOCAL: &str = "class A { void m() { String s = \"a\"; int n = 1; } }\n";

    #[test]
    fn test_preview_does_not_write() {
        let dir = TempDir::new().expect("Create temp dir");
        let file = dir.path().join("A.java");
        fs::write(&file, LOCAL).expect("Write file");

        let stats = VarRefactorer::refactor_tree(
            dir.path(),
            "17",
            &RefactorPolicy::default(),
            &BatchConfig::default(),
            None,
        );

        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.replacements, 2);
        assert_eq!(fs::read_to_string(&file).expect("Read file"), LOCAL);
    }

    #[test]
    fn test_in_skipped_dir() {
        let skip = vec!["build".to_string()];
        assert!(in_skipped_dir(Path::new("build/gen/A.java"), &skip));
        assert!(in_skipped_dir(Path::new("src/build/A.java"), &skip));
        assert!(!in_skipped_dir(Path::new("src/A.java"), &skip));
        assert!(!in_skipped_dir(Path::new("build.java"), &skip));
    }

    #[test]
    fn test_invalid_pattern_reported() {
        let dir = TempDir::new().expect("Create temp dir");
        let config = BatchConfig {
            file_pattern: "[".to_string(),
            ..Default::default()
        };
        let stats = VarRefactorer::refactor_tree(
            dir.path(),
            "17",
            &RefactorPolicy::default(),
            &config,
            None,
        );
        assert_eq!(stats.files_scanned, 0);
        assert!(stats.errors.contains_key("["));
    }
}
