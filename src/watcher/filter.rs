//! Relevance filter for raw filesystem events
//!
//! Applied before debouncing. Three rejection rules:
//! 1. editor backup files (name ending in `~`)
//! 2. anything under the output directory (the sync pass writes there, and
//!    reacting to our own writes would loop forever)
//! 3. dot-entries at the template root (`.git`, editor state, caches)

use std::path::{Component, Path};

/// Decide whether a changed path should be considered at all
pub fn is_relevant(path: &Path, template_dir: &Path, output_dir: &Path) -> bool {
    if path
        .file_name()
        .map(|name| name.to_string_lossy().ends_with('~'))
        .unwrap_or(false)
    {
        return false;
    }

    if path.starts_with(output_dir) {
        return false;
    }

    if let Ok(rel) = path.strip_prefix(template_dir) {
        if let Some(Component::Normal(first)) = rel.components().next() {
            if first.to_string_lossy().starts_with('.') {
                return false;
            }
        }
    }

    true
}
