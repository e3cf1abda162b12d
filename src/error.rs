//! Error types for cc-server
//!
//! Uses `thiserror` for library errors. Startup errors (missing template,
//! missing manifest, malformed config) abort before serving; everything that
//! can happen during a watch cycle is reported through events and never
//! tears the server down.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cc-server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Main error type for cc-server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Template directory missing or not a directory
    #[error("template directory not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// No manifest file in any recognized format
    #[error("no cookiecutter.json (or .yml/.yaml) found in {dir}")]
    ManifestNotFound { dir: PathBuf },

    /// Manifest exists but does not parse as a mapping
    #[error("invalid manifest in {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Existing server config file is malformed
    #[error("invalid server config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Template root directory (the `{{cookiecutter.*}}` dir) is missing
    #[error("no templated project directory in {dir} - expected one named with {{{{cookiecutter.*}}}}")]
    TemplateRootNotFound { dir: PathBuf },

    /// Templating engine failure (syntax error, missing variable)
    #[error("render failed for {path}: {message}")]
    Render { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
