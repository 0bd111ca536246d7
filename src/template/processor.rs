use globset::GlobSet;
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};

use super::operation::{SkipReason, SyncOperation};
use super::stage::StagingArea;
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::ioutils::read_if_exists;
use crate::metadata::Manifest;

/// Decides what happens to each staged file.
pub struct SyncProcessor<'a> {
    staging: &'a StagingArea,
    repo_root: PathBuf,
    manifest: Option<&'a Manifest>,
    /// Files selected by `--regen`; `None` selects everything.
    regen: Option<&'a GlobSet>,
}

impl<'a> SyncProcessor<'a> {
    pub fn new(
        staging: &'a StagingArea,
        repo_root: impl Into<PathBuf>,
        manifest: Option<&'a Manifest>,
        regen: Option<&'a GlobSet>,
    ) -> Self {
        Self { staging, repo_root: repo_root.into(), manifest, regen }
    }

    pub fn staging_root(&self) -> &Path {
        self.staging.root()
    }

    /// Manifest key of a file below the staging root.
    fn get_key(&self, staged_entry: &Path) -> Result<String> {
        let relative = staged_entry.strip_prefix(self.staging.root()).map_err(|e| {
            Error::ProcessError { path: staged_entry.display().to_string(), e: e.to_string() }
        })?;
        relative.to_manifest_key()
    }

    /// Unified diff between the current and the staged content of `key`.
    fn get_diff(key: &str, current: &str, staged: &str) -> String {
        TextDiff::from_lines(current, staged)
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{key}"), &format!("b/{key}"))
            .to_string()
    }

    /// Processes a staged file and determines the appropriate operation.
    ///
    /// # Arguments
    /// * `staged_entry` - A file below the staging root
    ///
    /// # Returns
    /// * `Result<SyncOperation>` - The operation to perform
    pub fn process(&self, staged_entry: &Path) -> Result<SyncOperation> {
        let key = self.get_key(staged_entry)?;
        let spec = self.staging.spec_for(&key).ok_or_else(|| Error::ProcessError {
            path: key.clone(),
            e: "The file was not staged from a template".to_string(),
        })?;
        let target = self.repo_root.join(&key);
        let selected = self.regen.map(|globs| globs.is_match(&key));

        if selected == Some(false) {
            return Ok(SyncOperation::Skip { target, key, reason: SkipReason::NotSelected });
        }

        let staged = fs::read_to_string(staged_entry)?;
        let Some(current) = read_if_exists(&target)? else {
            return Ok(SyncOperation::Create { source: staged_entry.to_path_buf(), target, key });
        };

        if current == staged {
            return Ok(SyncOperation::Unchanged { target, key });
        }

        if !spec.overwrite && selected.is_none() {
            return Ok(SyncOperation::Skip { target, key, reason: SkipReason::NoOverwrite });
        }

        let pristine = self.manifest.is_some_and(|manifest| manifest.is_pristine(&key, &current));
        Ok(SyncOperation::Update {
            source: staged_entry.to_path_buf(),
            target,
            diff: Self::get_diff(&key, &current, &staged),
            key,
            pristine,
        })
    }
}
