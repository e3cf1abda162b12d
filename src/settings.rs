//! Settings store
//!
//! The server keeps one sidecar settings file next to the template
//! (`cookiecutter-server.yml` by default). On first run it is derived from
//! the template manifest; afterwards it is the user's knob for live preview
//! values, and editing it is itself a relevant change.

use std::path::{Path, PathBuf};

use serde_yaml_ng::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::{ServerError, ServerResult};
use crate::{fsops, manifest};

/// Default settings file name, resolved relative to the template directory
pub const DEFAULT_CONFIG_NAME: &str = "cookiecutter-server.yml";

/// Resolved scalar values for one render pass, in declaration order
pub type Settings = Mapping;

/// Resolve the settings file path, creating the file on first run
///
/// An existing file is validated (malformed content is fatal at startup).
/// An absent file is synthesized from the template manifest, with choice
/// variables collapsed to their first element and key order preserved.
pub fn init_config(template_dir: &Path, config_file: Option<PathBuf>) -> ServerResult<PathBuf> {
    let config_file = config_file.unwrap_or_else(|| template_dir.join(DEFAULT_CONFIG_NAME));

    if config_file.is_file() {
        let content = std::fs::read_to_string(&config_file)?;
        serde_yaml_ng::from_str::<Value>(&content).map_err(|e| ServerError::InvalidConfig {
            file: config_file.clone(),
            message: e.to_string(),
        })?;
        debug!(config = %config_file.display(), "using existing settings file");
    } else {
        let defaults = manifest::load_defaults(template_dir)?;
        let yaml = serde_yaml_ng::to_string(&defaults)?;
        fsops::atomic_write(&config_file, yaml.as_bytes())?;
        debug!(config = %config_file.display(), "settings file derived from manifest");
    }

    Ok(config_file)
}

/// Reload settings from disk
///
/// Best-effort: the file may have vanished or been half-edited between
/// events. Both cases return `None` with a warning so the caller keeps its
/// previous mapping; neither is ever fatal to the watch loop.
pub fn load_settings(config_file: &Path) -> Option<Settings> {
    let content = match std::fs::read_to_string(config_file) {
        Ok(content) => content,
        Err(e) => {
            warn!(config = %config_file.display(), error = %e, "settings file not readable");
            return None;
        }
    };

    match serde_yaml_ng::from_str::<Settings>(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!(config = %config_file.display(), error = %e, "settings file not parseable");
            None
        }
    }
}
