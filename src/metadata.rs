use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::constants::META_FILENAME;
use crate::error::{Error, Result};

/// Hex encoded sha256 of `content`.
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// What xcookie last wrote into a repository, stored as
/// `.xcookie-meta.yaml` next to the generated files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub xcookie_version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Manifest key of every generated file to the hash of its content.
    #[serde(default)]
    pub files: IndexMap<String, String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            xcookie_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            tags: Vec::new(),
            remote: None,
            files: IndexMap::new(),
        }
    }
}

impl Manifest {
    pub fn path<P: AsRef<Path>>(repo_root: P) -> PathBuf {
        repo_root.as_ref().join(META_FILENAME)
    }

    pub fn load<P: AsRef<Path>>(repo_root: P) -> Result<Option<Self>> {
        let path = Self::path(&repo_root);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let manifest: Manifest = serde_yaml::from_str(&content)?;
        Ok(Some(manifest))
    }

    pub fn save<P: AsRef<Path>>(&self, repo_root: P) -> Result<()> {
        let path = Self::path(&repo_root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_yaml::to_string(self)?;
        std::fs::write(path, serialized).map_err(Error::from)
    }

    /// Whether `content` is exactly what xcookie last wrote to `key`.
    pub fn is_pristine(&self, key: &str, content: &str) -> bool {
        self.files.get(key).is_some_and(|hash| *hash == content_hash(content.as_bytes()))
    }

    pub fn record(&mut self, key: impl Into<String>, content: &str) {
        self.files.insert(key.into(), content_hash(content.as_bytes()));
    }
}
