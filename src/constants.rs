//! Constants used throughout the xcookie application

/// Configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] =
    &[".xcookie.yaml", ".xcookie.yml", ".xcookie.json", "pyproject.toml"];

/// Namespace of the comment directives understood by the rewriter
pub const DIRECTIVE_NAMESPACE: &str = "xcookie";

/// Marker that starts a comment in every templated language we render
pub const COMMENT_MARKER: char = '#';

/// Record of the files xcookie last wrote into a repository
pub const META_FILENAME: &str = ".xcookie-meta.yaml";

/// Name of the git remote inspected and created by xcookie
pub const ORIGIN_REMOTE: &str = "origin";

/// Configuration defaults
pub mod defaults {
    pub const MIN_PYTHON: &str = "3.8";
    pub const MAX_PYTHON: &str = "3.12";
    pub const VERSION: &str = "0.0.1";
    pub const LICENSE: &str = "Apache 2";
    pub const REL_MOD_PARENT_DPATH: &str = ".";
    pub const REMOTE_HOST: &str = "https://github.com";
    pub const OS: &[&str] = &["linux", "osx", "win"];
}

/// Tags with a meaning of their own to the generator
pub mod tags {
    pub const PUREPY: &str = "purepy";
    pub const BINPY: &str = "binpy";
    pub const GITHUB: &str = "github";
    pub const GITLAB: &str = "gitlab";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
