//! The fully resolved configuration the templates are rendered with

use chrono::Datelike;
use cruet::case::snake::to_snake_case;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use super::loader::XCookieConfig;
use super::types::{PythonVersion, RemoteProtocol};
use crate::constants::{defaults, tags};
use crate::error::{Error, Result};
use crate::remote::GitUrl;

/// Values given on the command line. Every set field replaces the
/// configuration file's value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub tags: Option<Vec<String>>,
    pub repo_name: Option<String>,
    pub mod_name: Option<String>,
    pub min_python: Option<PythonVersion>,
    pub max_python: Option<PythonVersion>,
    pub remote_host: Option<String>,
    pub remote_group: Option<String>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut XCookieConfig) {
        if let Some(tags) = self.tags {
            config.tags = tags;
        }
        if self.repo_name.is_some() {
            config.repo_name = self.repo_name;
        }
        if self.mod_name.is_some() {
            config.mod_name = self.mod_name;
        }
        if let Some(min_python) = self.min_python {
            config.min_python = min_python;
        }
        if let Some(max_python) = self.max_python {
            config.max_python = max_python;
        }
        if self.remote_host.is_some() {
            config.remote_host = self.remote_host;
        }
        if self.remote_group.is_some() {
            config.remote_group = self.remote_group;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectConfig {
    pub repo_name: String,
    pub mod_name: String,
    pub pkg_name: String,
    pub rel_mod_parent_dpath: String,
    pub tags: IndexSet<String>,
    pub min_python: PythonVersion,
    pub max_python: PythonVersion,
    pub os: Vec<String>,
    pub version: String,
    pub author: String,
    pub author_email: String,
    pub description: String,
    pub license: String,
    pub remote_host: String,
    pub remote_group: String,
    pub remote_protocol: RemoteProtocol,
    pub url: String,
    pub enable_gpg: bool,
    pub ci_cpython_only: bool,
}

/// A repository name without the `.git` decorations a remote url carries.
fn strip_git_suffix(repo_name: &str) -> &str {
    repo_name.trim_end_matches("/.git").trim_end_matches(".git")
}

fn directory_name(repo_dpath: &Path) -> Option<String> {
    let path = std::fs::canonicalize(repo_dpath).unwrap_or_else(|_| PathBuf::from(repo_dpath));
    path.file_name().map(|name| name.to_string_lossy().to_string())
}

fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The forge tag a remote host name implies.
fn forge_of(host: &str) -> Option<&'static str> {
    let host = host.to_lowercase();
    [tags::GITHUB, tags::GITLAB].into_iter().find(|forge| host.contains(forge))
}

impl ProjectConfig {
    /// Merges the configuration file, the detected remote and the command
    /// line, derives the unset values and validates the result.
    ///
    /// # Arguments
    /// * `config` - The loaded configuration file
    /// * `overrides` - Values from the command line
    /// * `repo_dpath` - The target repository, its name is the fallback
    ///   `repo_name`
    /// * `remote` - The detected `origin` remote, fills unset remote fields
    ///
    /// # Errors
    /// * `Error::ConfigValidation` for contradictory tags, an empty python
    ///   range or a module name that is not a python identifier
    pub fn resolve(
        mut config: XCookieConfig,
        overrides: ConfigOverrides,
        repo_dpath: &Path,
        remote: Option<&GitUrl>,
    ) -> Result<Self> {
        overrides.apply(&mut config);

        if let Some(info) = remote.and_then(|remote| remote.info().ok()) {
            config.remote_host.get_or_insert_with(|| format!("https://{}", info.host));
            config.remote_group.get_or_insert_with(|| info.group.clone());
            config
                .repo_name
                .get_or_insert_with(|| strip_git_suffix(&info.repo_name).to_string());
        }

        let repo_name = config
            .repo_name
            .or_else(|| directory_name(repo_dpath))
            .ok_or_else(|| Error::ConfigValidation("cannot infer repo_name".into()))?;
        let mod_name = config.mod_name.unwrap_or_else(|| to_snake_case(&repo_name));
        let pkg_name = config.pkg_name.unwrap_or_else(|| repo_name.clone());
        let remote_host = config
            .remote_host
            .unwrap_or_else(|| defaults::REMOTE_HOST.to_string())
            .trim_end_matches('/')
            .to_string();
        let remote_group = config.remote_group.unwrap_or_else(|| repo_name.clone());
        let url = config
            .url
            .unwrap_or_else(|| format!("{remote_host}/{remote_group}/{repo_name}"));

        let mut active: IndexSet<String> = config.tags.into_iter().collect();
        if !active.contains(tags::GITHUB) && !active.contains(tags::GITLAB) {
            if let Some(forge) = forge_of(&remote_host) {
                active.insert(forge.to_string());
            }
        }
        if !active.contains(tags::PUREPY) && !active.contains(tags::BINPY) {
            active.insert(tags::PUREPY.to_string());
        }

        let (author, author_email) = match (config.author, config.author_email) {
            (Some(author), Some(email)) => (author, email),
            (author, email) => {
                let (git_name, git_email) = crate::remote::git_identity();
                (
                    author.or(git_name).unwrap_or_default(),
                    email.or(git_email).unwrap_or_default(),
                )
            }
        };

        let project = Self {
            description: config
                .description
                .unwrap_or_else(|| format!("The {repo_name} module")),
            repo_name,
            mod_name,
            pkg_name,
            rel_mod_parent_dpath: config.rel_mod_parent_dpath,
            tags: active,
            min_python: config.min_python,
            max_python: config.max_python,
            os: config.os,
            version: config.version,
            author,
            author_email,
            license: config.license,
            remote_host,
            remote_group,
            remote_protocol: config.remote_protocol,
            url,
            enable_gpg: config.enable_gpg,
            ci_cpython_only: config.ci_cpython_only,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> Result<()> {
        let exclusive = [(tags::PUREPY, tags::BINPY), (tags::GITHUB, tags::GITLAB)];
        for (a, b) in exclusive {
            if self.has_tag(a) && self.has_tag(b) {
                return Err(Error::ConfigValidation(format!(
                    "tags '{a}' and '{b}' cannot be used together"
                )));
            }
        }
        if self.min_python > self.max_python {
            return Err(Error::ConfigValidation(format!(
                "min_python {} is newer than max_python {}",
                self.min_python, self.max_python
            )));
        }
        if !is_python_identifier(&self.mod_name) {
            return Err(Error::ConfigValidation(format!(
                "mod_name '{}' is not a valid python identifier",
                self.mod_name
            )));
        }
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn python_versions(&self) -> Vec<PythonVersion> {
        self.min_python.range_to(self.max_python)
    }

    /// The remote the generated files point at, in the configured protocol.
    pub fn remote_url(&self) -> Result<GitUrl> {
        let host = self.remote_host.split_once("://").map_or(self.remote_host.as_str(), |(_, h)| h);
        let https = GitUrl::new(format!("https://{host}/{}/{}", self.remote_group, self.repo_name));
        match self.remote_protocol {
            RemoteProtocol::Https => Ok(https),
            RemoteProtocol::Git => https.to_git(),
        }
    }

    /// Relative path of the python module inside the repository.
    pub fn mod_dpath(&self) -> String {
        match self.rel_mod_parent_dpath.trim_matches('/') {
            "" | "." => self.mod_name.clone(),
            parent => format!("{parent}/{}", self.mod_name),
        }
    }

    /// The context every template is rendered with.
    pub fn render_context(&self) -> Result<Value> {
        let mut context = serde_json::to_value(self)?;
        let versions: Vec<String> = self.python_versions().iter().map(ToString::to_string).collect();
        let extras = json!({
            "python_versions": versions,
            "is_github": self.has_tag(tags::GITHUB),
            "is_gitlab": self.has_tag(tags::GITLAB),
            "is_purepy": self.has_tag(tags::PUREPY),
            "is_binpy": self.has_tag(tags::BINPY),
            "repo_url": self.remote_url()?.as_str(),
            "mod_dpath": self.mod_dpath(),
            "year": chrono::Local::now().year(),
        });
        if let (Value::Object(context), Value::Object(extras)) = (&mut context, extras) {
            context.extend(extras);
        }
        Ok(context)
    }
}
