use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML. Original error: {0}")]
    TOMLParseError(#[from] toml::de::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Git operation failed. Original error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("Failed to parse glob pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Invalid regular expression. Original error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Failed to walk the staging directory. Original error: {0}")]
    WalkDirError(#[from] walkdir::Error),

    #[error("Prompt failed. Original error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    /// A directive body has a `(` without its `)` or the other way round.
    /// Shipped templates never contain these, so this is fatal.
    #[error("Unbalanced parentheses in directive '{opstr}'.")]
    UnbalancedParentheses { opstr: String },

    #[error("Invalid REQUIRES argument '{0}'. Expected '--flag' or 'env:VAR[=value]'.")]
    InvalidRequirement(String),

    #[error("Unrecognized git remote url: '{url}'.")]
    InvalidGitUrl { url: String },

    #[error("Invalid python version '{0}'. Expected '<major>.<minor>'.")]
    InvalidPythonVersion(String),

    #[error("No configuration file found in '{repo_dir}'. Tried: {config_files}.")]
    ConfigNotFound { repo_dir: String, config_files: String },

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    #[error("Cannot process the path: '{path}'. Original error: {e}")]
    ProcessError { path: String, e: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with xcookie's Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
