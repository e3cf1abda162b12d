//! Template manifest discovery and parsing
//!
//! A cookiecutter template declares its variables in a manifest at the
//! template root. Both JSON and YAML manifests are recognized, in a fixed
//! priority order. List-valued entries are choice variables; their first
//! element is the default.

use std::path::{Path, PathBuf};

use serde_yaml_ng::{Mapping, Value};

use crate::error::{ServerError, ServerResult};

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

/// Recognized manifest file names, in priority order
pub const MANIFEST_FILES: &[(&str, ManifestFormat)] = &[
    ("cookiecutter.json", ManifestFormat::Json),
    ("cookiecutter.yml", ManifestFormat::Yaml),
    ("cookiecutter.yaml", ManifestFormat::Yaml),
];

/// Locate the template's manifest file, if any
pub fn find_manifest(template_dir: &Path) -> Option<(PathBuf, ManifestFormat)> {
    MANIFEST_FILES.iter().find_map(|(name, format)| {
        let path = template_dir.join(name);
        path.is_file().then_some((path, *format))
    })
}

/// Parse a manifest file into an ordered mapping
///
/// JSON object key order is preserved, so the derived settings file keeps
/// the order the template author wrote.
pub fn parse_manifest(path: &Path, format: ManifestFormat) -> ServerResult<Mapping> {
    let content = std::fs::read_to_string(path)?;

    let value: Value = match format {
        ManifestFormat::Json => {
            let json: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| ServerError::InvalidManifest {
                    file: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            serde_yaml_ng::to_value(&json)?
        }
        ManifestFormat::Yaml => {
            serde_yaml_ng::from_str(&content).map_err(|e| ServerError::InvalidManifest {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?
        }
    };

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(ServerError::InvalidManifest {
            file: path.to_path_buf(),
            message: format!("expected a mapping at top level, got {}", type_name(&other)),
        }),
    }
}

/// Collapse declared variables into their default scalar values
///
/// Choice variables (list-valued entries) collapse to their first element.
pub fn collapse_defaults(manifest: Mapping) -> Mapping {
    manifest
        .into_iter()
        .map(|(key, value)| {
            let default = match value {
                Value::Sequence(seq) => seq.into_iter().next().unwrap_or(Value::Null),
                other => other,
            };
            (key, default)
        })
        .collect()
}

/// Find, parse, and collapse the template's manifest in one step
pub fn load_defaults(template_dir: &Path) -> ServerResult<Mapping> {
    let (path, format) =
        find_manifest(template_dir).ok_or_else(|| ServerError::ManifestNotFound {
            dir: template_dir.to_path_buf(),
        })?;
    Ok(collapse_defaults(parse_manifest(&path, format)?))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
