use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The textual shape a remote url was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Https,
    Ssh,
    Git,
    Scp,
}

/// The normalized parts of a git remote url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitUrlInfo {
    pub host: String,
    pub group: String,
    pub repo_name: String,
    pub user: Option<String>,
    pub protocol: Protocol,
}

/// A git remote url whose parts are parsed on first access.
#[derive(Debug, Clone)]
pub struct GitUrl {
    url: String,
    info: OnceCell<GitUrlInfo>,
}

impl GitUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), info: OnceCell::new() }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The parsed parts, computed once and cached.
    ///
    /// # Errors
    /// * `Error::InvalidGitUrl` if the url matches none of the known shapes
    pub fn info(&self) -> Result<&GitUrlInfo> {
        if let Some(info) = self.info.get() {
            return Ok(info);
        }
        let info = parse(&self.url)?;
        Ok(self.info.get_or_init(|| info))
    }

    /// `git@{host}:{group}/{repo_name}`
    pub fn to_git(&self) -> Result<GitUrl> {
        let info = self.info()?;
        Ok(GitUrl::new(format!("git@{}:{}/{}", info.host, info.group, info.repo_name)))
    }

    /// `ssh://{user@}{host}/{group}/{repo_name}`
    pub fn to_ssh(&self) -> Result<GitUrl> {
        let info = self.info()?;
        let user = info.user.as_deref().map(|user| format!("{user}@")).unwrap_or_default();
        Ok(GitUrl::new(format!(
            "ssh://{user}{}/{}/{}",
            info.host, info.group, info.repo_name
        )))
    }

    /// `https://{host}/{group}/{repo_name}`
    pub fn to_https(&self) -> Result<GitUrl> {
        let info = self.info()?;
        Ok(GitUrl::new(format!("https://{}/{}/{}", info.host, info.group, info.repo_name)))
    }
}

impl PartialEq for GitUrl {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for GitUrl {}

impl Display for GitUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl AsRef<str> for GitUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl FromStr for GitUrl {
    type Err = Error;

    /// Parses eagerly, so invalid urls are rejected up front.
    fn from_str(s: &str) -> Result<Self> {
        let url = GitUrl::new(s);
        url.info()?;
        Ok(url)
    }
}

const GIT_SUFFIX: &str = "/.git";

/// Splits `group/repo` on the last slash. A trailing `/.git` segment stays
/// part of the repository name.
fn split_group_repo(path: &str) -> Option<(String, String)> {
    let path = path.trim_matches('/');
    let (stem, suffix) = match path.strip_suffix(GIT_SUFFIX) {
        Some(stem) => (stem, GIT_SUFFIX),
        None => (path, ""),
    };
    let (group, repo) = stem.rsplit_once('/')?;
    if group.is_empty() || repo.is_empty() {
        return None;
    }
    Some((group.to_string(), format!("{repo}{suffix}")))
}

/// Group and repository from the first two segments of a url path; any
/// further segments are ignored. A `.git` segment right after the repository
/// stays attached to it.
fn leading_group_repo(path: &str) -> Option<(String, String)> {
    let mut segments = path.splitn(3, '/');
    let group = segments.next().filter(|group| !group.is_empty())?;
    let repo = segments.next().filter(|repo| !repo.is_empty())?;
    let repo_name = match segments.next() {
        Some(".git") => format!("{repo}{GIT_SUFFIX}"),
        _ => repo.to_string(),
    };
    Some((group.to_string(), repo_name))
}

/// `[user@]host` and the path after it, split on the first slash.
fn split_authority(rest: &str) -> Option<(Option<String>, String, &str)> {
    let (authority, path) = rest.split_once('/')?;
    let (user, host) = match authority.split_once('@') {
        Some((user, host)) => (Some(user.to_string()).filter(|user| !user.is_empty()), host),
        None => (None, authority),
    };
    if host.is_empty() {
        return None;
    }
    Some((user, host.to_string(), path))
}

fn parse_https(raw: &str) -> Option<GitUrlInfo> {
    let (_, host, path) = split_authority(raw.strip_prefix("https://")?)?;
    let (group, repo_name) = leading_group_repo(path)?;
    Some(GitUrlInfo { host, group, repo_name, user: None, protocol: Protocol::Https })
}

fn parse_git(raw: &str) -> Option<GitUrlInfo> {
    let (host, path) = raw.strip_prefix("git@")?.split_once(':')?;
    if host.is_empty() || path.starts_with("//") {
        return None;
    }
    let (group, repo_name) = split_group_repo(path)?;
    Some(GitUrlInfo {
        host: host.to_string(),
        group,
        repo_name,
        user: Some("git".to_string()),
        protocol: Protocol::Git,
    })
}

fn parse_ssh(raw: &str) -> Option<GitUrlInfo> {
    let (user, host, path) = split_authority(raw.strip_prefix("ssh://")?)?;
    let (group, repo_name) = leading_group_repo(path)?;
    Some(GitUrlInfo { host, group, repo_name, user, protocol: Protocol::Ssh })
}

fn parse_scp(raw: &str) -> Option<GitUrlInfo> {
    let (netloc, path) = raw.split_once(':')?;
    let (user, host) = match netloc.split_once('@') {
        Some((user, host)) => (Some(user.to_string()), host),
        None => (None, netloc),
    };
    if host.is_empty() {
        return None;
    }
    let (group, repo_name) = split_group_repo(path)?;
    Some(GitUrlInfo { host: host.to_string(), group, repo_name, user, protocol: Protocol::Scp })
}

fn parse_bare(raw: &str) -> Option<GitUrlInfo> {
    if raw.contains("//") || raw.contains('@') {
        return None;
    }
    let (host, path) = raw.split_once(':')?;
    if host.is_empty() {
        return None;
    }
    let (group, repo_name) = split_group_repo(path)?;
    Some(GitUrlInfo { host: host.to_string(), group, repo_name, user: None, protocol: Protocol::Ssh })
}

/// Tries every known shape in order.
fn parse(raw: &str) -> Result<GitUrlInfo> {
    let raw = raw.trim();
    let info = if raw.starts_with("https://") {
        parse_https(raw)
    } else if raw.starts_with("git@") {
        parse_git(raw)
    } else if raw.starts_with("ssh://") {
        parse_ssh(raw)
    } else if raw.ends_with(GIT_SUFFIX) {
        parse_scp(raw)
    } else {
        parse_bare(raw)
    };
    info.ok_or_else(|| Error::InvalidGitUrl { url: raw.to_string() })
}
