//! Atomic file operations and content hashing
//!
//! Output files are written via tempfile + rename so a crash mid-write never
//! leaves a half-written file behind. Hashes are used to skip unchanged files
//! during a sync pass.

use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::ServerResult;

/// Write content to a file atomically (tempfile + rename in the same directory)
pub fn atomic_write(path: &Path, content: &[u8]) -> ServerResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.persist(path)
        .map_err(|e| crate::error::ServerError::Io(e.error))?;
    Ok(())
}

/// Compute SHA-256 hash of raw content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// Compute SHA-256 hash of a file
pub fn hash_file(path: &Path) -> ServerResult<String> {
    let content = std::fs::read(path)?;
    Ok(hash_content(&content))
}
