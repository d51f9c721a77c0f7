//! Cleanup executor: best-effort batch deletion and empty directory pruning.
//!
//! Never panics and never aborts a batch. Each file is attempted once; a
//! failure is recorded and the next file is tried.
//!
//! Safety rules:
//! - Symlinks are refused (the link target is never touched)
//! - Only regular files are deleted
//! - Files with the read-only attribute are refused on every platform
//! - The scan root itself is never pruned

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{SweepError, SweepResult};

/// Maximum recursion depth to prevent stack overflow on deeply nested directories.
const MAX_RECURSION_DEPTH: usize = 128;

/// One file that could not be deleted.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a delete run. Counters only; the analysis is never touched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupSummary {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<CleanupFailure>,
    /// Sum of the sizes of successfully deleted files
    pub freed_bytes: u64,
    pub dirs_pruned: Vec<PathBuf>,
}

impl CleanupSummary {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// A delete run succeeds iff no file failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes one regular file, returning its size.
///
/// Security: refuses symlinks so a crafted link cannot redirect deletion.
pub fn remove_file(path: &Path) -> SweepResult<u64> {
    let metadata = match path.symlink_metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SweepError::cleanup(path, "file no longer exists"));
        }
        Err(e) => return Err(SweepError::io(path, e)),
    };

    if metadata.file_type().is_symlink() {
        return Err(SweepError::cleanup(path, "refusing to delete symlink"));
    }

    if !metadata.is_file() {
        return Err(SweepError::cleanup(path, "not a regular file"));
    }

    if metadata.permissions().readonly() {
        return Err(SweepError::cleanup(path, "file is read-only"));
    }

    let size = metadata.len();
    fs::remove_file(path).map_err(|e| SweepError::cleanup(path, e.to_string()))?;
    debug!(path = %path.display(), size, "removed file");
    Ok(size)
}

/// Attempts every file in order; failures are counted, never fatal.
pub fn execute(files: &[PathBuf]) -> CleanupSummary {
    let mut summary = CleanupSummary::default();

    for path in files {
        match remove_file(path) {
            Ok(size) => {
                summary.freed_bytes += size;
                summary.deleted.push(path.clone());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to delete");
                summary.failed.push(CleanupFailure {
                    path: path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        deleted = summary.deleted_count(),
        failed = summary.failed_count(),
        freed_bytes = summary.freed_bytes,
        "cleanup batch complete"
    );
    summary
}

/// Deletes `files`, then prunes empty directories under `root` when
/// `recursive` is set.
pub fn execute_cleanup(files: &[PathBuf], root: &Path, recursive: bool) -> CleanupSummary {
    let mut summary = execute(files);
    if recursive {
        summary.dirs_pruned = prune_empty_dirs(root);
    }
    summary
}

/// Removes empty directories below `root`, bottom-up.
///
/// `root` itself is never removed. Directory removal failures are logged
/// and ignored.
pub fn prune_empty_dirs(root: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    prune_recursive(root, &mut removed, 0);
    removed
}

fn prune_recursive(dir: &Path, removed: &mut Vec<PathBuf>, depth: usize) {
    if depth >= MAX_RECURSION_DEPTH {
        warn!(
            max_depth = MAX_RECURSION_DEPTH,
            path = %dir.display(),
            "max recursion depth reached"
        );
        return;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut subdirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.path())
        .collect();
    subdirs.sort();

    for sub in subdirs {
        prune_recursive(&sub, removed, depth + 1);
    }

    if depth == 0 {
        return;
    }

    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);

    if is_empty && remove_dir_quietly(dir) {
        removed.push(dir.to_path_buf());
    }
}

/// Removes one directory; a failure (e.g. a writer refilled it) is logged
/// and reported as `false`, never propagated.
fn remove_dir_quietly(dir: &Path) -> bool {
    match fs::remove_dir(dir) {
        Ok(()) => {
            debug!(path = %dir.display(), "removed empty dir");
            true
        }
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "failed to remove dir");
            false
        }
    }
}
