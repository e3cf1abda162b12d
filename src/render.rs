//! Template renderer adapter
//!
//! Rendering is delegated to Tera behind the [`TemplateRenderer`] trait so
//! the server core never talks to the engine directly. The adapter renders
//! the templated project directory (the child of the template root whose
//! name contains `{{cookiecutter.*}}`) into a target directory: path
//! segments and UTF-8 file contents go through the engine, anything else is
//! copied verbatim.
//!
//! Rendering is pure with respect to its arguments: it only reads the
//! template tree and only writes below `target_dir`.

use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ServerError, ServerResult};
use crate::manifest;
use crate::settings::Settings;

/// Narrow seam to the templating engine
pub trait TemplateRenderer {
    /// Render `template_dir` into `target_dir` with the given settings
    ///
    /// `None` settings fall back to the manifest's collapsed defaults.
    fn render(
        &self,
        template_dir: &Path,
        settings: Option<&Settings>,
        target_dir: &Path,
    ) -> ServerResult<()>;
}

/// Tera-backed renderer with cookiecutter directory semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        template_dir: &Path,
        settings: Option<&Settings>,
        target_dir: &Path,
    ) -> ServerResult<()> {
        let context = build_context(template_dir, settings)?;
        let root = find_template_root(template_dir)?;

        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| ServerError::Io(e.into()))?;
            let rel = entry
                .path()
                .strip_prefix(template_dir)
                .unwrap_or(entry.path());
            let rendered_rel = render_fragment(&rel.to_string_lossy(), &context, rel)?;
            let dest = target_dir.join(&rendered_rel);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest)?;
                continue;
            }

            let bytes = std::fs::read(entry.path())?;
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            match std::str::from_utf8(&bytes) {
                Ok(text) => {
                    let rendered = render_fragment(text, &context, rel)?;
                    std::fs::write(&dest, rendered)?;
                }
                // binary files are copied through untouched
                Err(_) => std::fs::write(&dest, &bytes)?,
            }
        }

        debug!(template = %template_dir.display(), target = %target_dir.display(), "template rendered");
        Ok(())
    }
}

/// Locate the templated project directory under the template root
fn find_template_root(template_dir: &Path) -> ServerResult<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(template_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            name.contains("cookiecutter") && name.contains("{{") && name.contains("}}")
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ServerError::TemplateRootNotFound {
            dir: template_dir.to_path_buf(),
        })
}

fn build_context(template_dir: &Path, settings: Option<&Settings>) -> ServerResult<Context> {
    let vars: Settings = match settings {
        Some(settings) => settings.clone(),
        None => manifest::load_defaults(template_dir)?,
    };
    let mut context = Context::new();
    context.insert("cookiecutter", &vars);
    Ok(context)
}

fn render_fragment(input: &str, context: &Context, rel: &Path) -> ServerResult<String> {
    Tera::one_off(input, context, false).map_err(|e| ServerError::Render {
        path: rel.to_path_buf(),
        message: tera_message(&e),
    })
}

/// Flatten a Tera error chain into one line
fn tera_message(err: &tera::Error) -> String {
    use std::error::Error;

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
