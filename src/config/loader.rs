//! Configuration loading

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::{PythonVersion, RemoteProtocol};
use crate::constants::{defaults, CONFIG_FILENAMES};
use crate::error::{Error, Result};
use crate::ext::PathExt;

/// The generator configuration as written by the user. Unset optional
/// fields are derived later by [`super::ProjectConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XCookieConfig {
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub mod_name: Option<String>,
    #[serde(default)]
    pub pkg_name: Option<String>,
    #[serde(default = "get_default_rel_mod_parent_dpath")]
    pub rel_mod_parent_dpath: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "get_default_min_python")]
    pub min_python: PythonVersion,
    #[serde(default = "get_default_max_python")]
    pub max_python: PythonVersion,
    #[serde(default = "get_default_os")]
    pub os: Vec<String>,
    #[serde(default = "get_default_version")]
    pub version: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "get_default_license")]
    pub license: String,
    #[serde(default)]
    pub remote_host: Option<String>,
    #[serde(default)]
    pub remote_group: Option<String>,
    #[serde(default)]
    pub remote_protocol: RemoteProtocol,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub enable_gpg: bool,
    #[serde(default)]
    pub ci_cpython_only: bool,
}

impl Default for XCookieConfig {
    fn default() -> Self {
        Self {
            repo_name: None,
            mod_name: None,
            pkg_name: None,
            rel_mod_parent_dpath: get_default_rel_mod_parent_dpath(),
            tags: Vec::new(),
            min_python: get_default_min_python(),
            max_python: get_default_max_python(),
            os: get_default_os(),
            version: get_default_version(),
            author: None,
            author_email: None,
            description: None,
            license: get_default_license(),
            remote_host: None,
            remote_group: None,
            remote_protocol: RemoteProtocol::default(),
            url: None,
            enable_gpg: false,
            ci_cpython_only: false,
        }
    }
}

#[derive(Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: PyProjectTool,
}

#[derive(Default, Deserialize)]
struct PyProjectTool {
    xcookie: Option<XCookieConfig>,
}

impl XCookieConfig {
    /// Loads the first configuration file found in `repo_dpath`.
    ///
    /// A `pyproject.toml` only counts when it has a `[tool.xcookie]` table.
    ///
    /// # Errors
    /// * `Error::ConfigNotFound` if none of the candidate files exist
    pub fn load_config<P: AsRef<Path>>(repo_dpath: P) -> Result<Self> {
        let repo_dpath = repo_dpath.as_ref();
        let repo_dir = repo_dpath.to_str_checked()?.to_string();

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = repo_dpath.join(config_file_name);
            if !config_file_path.exists() {
                continue;
            }

            log::debug!("Reading configuration from '{}'.", config_file_path.display());
            let content = std::fs::read_to_string(&config_file_path)?;
            let config = match *config_file_name {
                ".xcookie.json" => Some(serde_json::from_str(&content)?),
                ".xcookie.yaml" | ".xcookie.yml" => Some(serde_yaml::from_str(&content)?),
                _ => toml::from_str::<PyProject>(&content)?.tool.xcookie,
            };
            if let Some(config) = config {
                return Ok(config);
            }
        }

        Err(Error::ConfigNotFound { repo_dir, config_files: CONFIG_FILENAMES.join(", ") })
    }

    /// Like [`Self::load_config`], falling back to the defaults when no
    /// configuration file exists.
    pub fn load_or_default<P: AsRef<Path>>(repo_dpath: P) -> Result<Self> {
        match Self::load_config(repo_dpath) {
            Err(Error::ConfigNotFound { repo_dir, .. }) => {
                log::info!("No configuration found in '{repo_dir}', using defaults.");
                Ok(Self::default())
            }
            other => other,
        }
    }
}

fn get_default_rel_mod_parent_dpath() -> String {
    defaults::REL_MOD_PARENT_DPATH.to_string()
}

fn get_default_min_python() -> PythonVersion {
    defaults::MIN_PYTHON.parse().unwrap_or(PythonVersion::new(3, 8))
}

fn get_default_max_python() -> PythonVersion {
    defaults::MAX_PYTHON.parse().unwrap_or(PythonVersion::new(3, 12))
}

fn get_default_os() -> Vec<String> {
    defaults::OS.iter().map(|os| os.to_string()).collect()
}

fn get_default_version() -> String {
    defaults::VERSION.to_string()
}

fn get_default_license() -> String {
    defaults::LICENSE.to_string()
}
