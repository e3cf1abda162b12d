//! Output synchronizer
//!
//! Reconciliation with purge: after a pass, the target directory holds
//! exactly the source tree's content, except for paths matching the
//! exclusion list (version-control metadata a user may keep in the output
//! directory). Individual copy/delete failures are recorded and skipped
//! rather than aborting the pass; there is no directory-level atomic swap,
//! so a crash mid-sync can leave a mixed old/new tree until the next cycle.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ServerResult;
use crate::fsops;

/// Result of one sync pass
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Files created or overwritten
    pub written: Vec<String>,
    /// Files left alone (content unchanged)
    pub skipped: Vec<String>,
    /// Files and emptied directories purged from the target
    pub deleted: Vec<String>,
    /// Per-path failures, sync continued past each
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a target-relative path against the exclusion list
///
/// A path is excluded when any of its components matches a pattern, so
/// `.git` protects the directory and everything below it.
pub fn is_excluded(rel: &Path, exclude: &[String]) -> bool {
    rel.components().any(|component| match component {
        Component::Normal(name) => exclude.iter().any(|pattern| name.to_string_lossy() == *pattern),
        _ => false,
    })
}

/// Make `target` mirror `source`, modulo the exclusion list
pub fn sync_tree(source: &Path, target: &Path, exclude: &[String]) -> ServerResult<SyncReport> {
    let mut report = SyncReport::new();
    std::fs::create_dir_all(target)?;

    let mut source_files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut source_dirs: BTreeSet<PathBuf> = BTreeSet::new();

    // copy/update pass
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };
        let rel = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path())
            .to_path_buf();
        if is_excluded(&rel, exclude) {
            continue;
        }

        let dest = target.join(&rel);
        if entry.file_type().is_dir() {
            if let Err(e) = std::fs::create_dir_all(&dest) {
                report.errors.push(format!("{}: {}", rel.display(), e));
            } else {
                source_dirs.insert(rel);
            }
            continue;
        }

        match copy_if_changed(entry.path(), &dest) {
            Ok(true) => report.written.push(rel.display().to_string()),
            Ok(false) => report.skipped.push(rel.display().to_string()),
            Err(e) => {
                warn!(path = %rel.display(), error = %e, "file copy failed");
                report.errors.push(format!("{}: {}", rel.display(), e));
            }
        }
        source_files.insert(rel);
    }

    // purge pass: contents first so directories are already emptied when
    // their own turn comes
    for entry in WalkDir::new(target).min_depth(1).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };
        let rel = entry
            .path()
            .strip_prefix(target)
            .unwrap_or(entry.path())
            .to_path_buf();
        if is_excluded(&rel, exclude) {
            continue;
        }

        if entry.file_type().is_dir() {
            if !source_dirs.contains(&rel) && std::fs::remove_dir(entry.path()).is_ok() {
                report.deleted.push(rel.display().to_string());
            }
        } else if !source_files.contains(&rel) {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => report.deleted.push(rel.display().to_string()),
                Err(e) => {
                    warn!(path = %rel.display(), error = %e, "file delete failed");
                    report.errors.push(format!("{}: {}", rel.display(), e));
                }
            }
        }
    }

    debug!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        deleted = report.deleted.len(),
        errors = report.errors.len(),
        "output synchronized"
    );
    Ok(report)
}

/// Copy `src` over `dest` unless the content already matches
fn copy_if_changed(src: &Path, dest: &Path) -> ServerResult<bool> {
    let bytes = std::fs::read(src)?;
    if dest.is_file() {
        if let Ok(existing) = fsops::hash_file(dest) {
            if existing == fsops::hash_content(&bytes) {
                return Ok(false);
            }
        }
    }
    fsops::atomic_write(dest, &bytes)?;
    Ok(true)
}
