use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::registry::TemplateSpec;
use crate::config::ProjectConfig;
use crate::directive::Rewriter;
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::ioutils::{set_executable, write_file};
use crate::renderer::TemplateRenderer;

/// Rendered files waiting to be synced into the target repository. The
/// directory is removed when the area is dropped.
pub struct StagingArea {
    dir: TempDir,
    files: IndexMap<String, &'static TemplateSpec>,
}

impl StagingArea {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Staged manifest keys, in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn spec_for(&self, key: &str) -> Option<&'static TemplateSpec> {
        self.files.get(key).copied()
    }

    pub fn staged_path(&self, key: &str) -> PathBuf {
        self.root().join(key)
    }
}

/// Renders every applicable template of `registry` into a fresh staging
/// directory.
///
/// Each rendered file goes through the conditional line rewrite for the
/// project's tags, and executable templates get their executable bit.
///
/// # Errors
/// * rendering errors, unbalanced directives and I/O errors are fatal
pub fn stage(
    project: &ProjectConfig,
    registry: &'static [TemplateSpec],
    renderer: &dyn TemplateRenderer,
) -> Result<StagingArea> {
    let context = project.render_context()?;
    let rewriter = Rewriter::new(project.tags.iter().cloned())?;
    let dir = tempfile::Builder::new().prefix("xcookie-stage-").tempdir()?;
    let mut files = IndexMap::new();

    for spec in registry.iter().filter(|spec| spec.is_applicable(&project.tags)) {
        let rendered_path = renderer.render_path(spec.path, &context)?;
        let key = Path::new(&rendered_path).to_manifest_key()?;
        if key.is_empty() || files.contains_key(&key) {
            return Err(Error::ProcessError {
                path: rendered_path,
                e: "The rendered path is empty or staged twice".to_string(),
            });
        }

        let content = renderer.render(spec.source, &context, Some(spec.path))?;
        let staged_path = dir.path().join(&key);
        write_file(&content, &staged_path)?;
        if rewriter.rewrite_file(&staged_path)? {
            debug!("Applied conditional lines to '{key}'.");
        }
        if spec.executable {
            set_executable(&staged_path)?;
        }

        debug!("Staged '{key}'.");
        files.insert(key, spec);
    }

    Ok(StagingArea { dir, files })
}
