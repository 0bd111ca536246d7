//! Git remotes: url normalization and the `origin` of a target repository.

use git2::{ErrorCode, Repository};
use log::{debug, info, warn};
use std::path::Path;

pub mod url;

pub use url::{GitUrl, GitUrlInfo, Protocol};

use crate::constants::ORIGIN_REMOTE;
use crate::error::Result;

/// Reads and parses the `origin` remote of the repository at `repo_dpath`.
///
/// # Returns
/// * `Ok(None)` - when there is no repository, no `origin`, or the url has
///   an unknown shape
pub fn detect_remote(repo_dpath: &Path) -> Result<Option<GitUrl>> {
    let repo = match Repository::open(repo_dpath) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => {
            debug!("No git repository at '{}'.", repo_dpath.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let remote = match repo.find_remote(ORIGIN_REMOTE) {
        Ok(remote) => remote,
        Err(e) if e.code() == ErrorCode::NotFound => {
            debug!("Repository '{}' has no '{ORIGIN_REMOTE}' remote.", repo_dpath.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let Some(raw) = remote.url() else {
        warn!("The '{ORIGIN_REMOTE}' remote url is not valid UTF-8, ignoring it.");
        return Ok(None);
    };

    let url = GitUrl::new(raw);
    match url.info() {
        Ok(parts) => {
            debug!("Detected remote {parts:?}");
            Ok(Some(url))
        }
        Err(e) => {
            warn!("{e} Treating the remote as unknown.");
            Ok(None)
        }
    }
}

/// Initializes a git repository at `repo_dpath` unless one exists, and
/// registers `remote` as `origin` when it has none.
///
/// # Returns
/// * `Result<bool>` - Whether a new repository was created
pub fn init_repo(repo_dpath: &Path, remote: Option<&GitUrl>) -> Result<bool> {
    let (repo, created) = match Repository::open(repo_dpath) {
        Ok(repo) => (repo, false),
        Err(e) if e.code() == ErrorCode::NotFound => {
            info!("Initializing git repository in '{}'.", repo_dpath.display());
            (Repository::init(repo_dpath)?, true)
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(remote) = remote {
        match repo.find_remote(ORIGIN_REMOTE) {
            Ok(_) => debug!("Keeping the existing '{ORIGIN_REMOTE}' remote."),
            Err(e) if e.code() == ErrorCode::NotFound => {
                info!("Adding remote '{ORIGIN_REMOTE}' -> '{remote}'.");
                repo.remote(ORIGIN_REMOTE, remote.as_str())?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(created)
}

/// `user.name` and `user.email` from the default git configuration.
pub fn git_identity() -> (Option<String>, Option<String>) {
    let Ok(config) = git2::Config::open_default() else {
        return (None, None);
    };
    (config.get_string("user.name").ok(), config.get_string("user.email").ok())
}
