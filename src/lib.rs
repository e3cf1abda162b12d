//! cc-server - local development server for cookiecutter templates
//!
//! cc-server watches a template directory, re-renders the template on every
//! change, and reconciles the result into an output directory, giving
//! template authors a live preview of what their template generates.

pub mod error;
pub mod fsops;
pub mod manifest;
pub mod render;
pub mod server;
pub mod settings;
pub mod sync;
pub mod watcher;

// Re-exports for convenience
pub use error::{ServerError, ServerResult};
pub use manifest::{collapse_defaults, find_manifest, parse_manifest, ManifestFormat};
pub use render::{TemplateRenderer, TeraRenderer};
pub use server::{serve, ServeOptions, DEFAULT_MIN_DELAY};
pub use settings::{init_config, load_settings, Settings, DEFAULT_CONFIG_NAME};
pub use sync::{sync_tree, SyncReport};
pub use watcher::{ChangeEvent, Debounce, ServeEvent};
