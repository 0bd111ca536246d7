use crate::config::{ConfigOverrides, PythonVersion};
use crate::constants::{exit_codes, verbosity, DIRECTIVE_NAMESPACE};
use crate::error::Result;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::fmt::Display;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Skip confirmation prompts for specific stages.
#[derive(Debug, Clone, ValueEnum, Copy, PartialEq)]
#[value(rename_all = "lowercase")]
pub enum SkipConfirm {
    /// Skip every confirmation prompt.
    All,
    /// Skip file overwrite confirmations.
    Overwrite,
}

impl Display for SkipConfirm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipConfirm::All => "all",
            SkipConfirm::Overwrite => "overwrite",
        };
        write!(f, "{s}")
    }
}

/// Target shape of `xcookie remote --to`.
#[derive(Debug, Clone, ValueEnum, Copy, PartialEq)]
#[value(rename_all = "lowercase")]
pub enum UrlShape {
    Https,
    Ssh,
    Git,
}

/// xcookie - python project scaffolding and CI configuration generator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate or update the boilerplate of a python repository.
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),

    /// Print the directives found in a file, one JSON object per line.
    Directives(DirectivesArgs),

    /// Apply the conditional comment directives of a file.
    Rewrite(RewriteArgs),

    /// Parse a git remote url, or convert it to another shape.
    Remote(RemoteArgs),
}

/// Arguments for the generate command.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Repository to generate into.
    #[arg(value_name = "REPO_DPATH", default_value = ".")]
    pub repo_dpath: PathBuf,

    /// Tags selecting templates and conditional lines (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Name of the python module.
    #[arg(long = "mod-name")]
    pub mod_name: Option<String>,

    /// Name of the repository, defaults to the directory name.
    #[arg(long = "repo-name")]
    pub repo_name: Option<String>,

    /// Oldest supported python, e.g. `3.8`.
    #[arg(long = "min-python", value_name = "VERSION")]
    pub min_python: Option<String>,

    /// Newest supported python, e.g. `3.12`.
    #[arg(long = "max-python", value_name = "VERSION")]
    pub max_python: Option<String>,

    /// Forge host, e.g. `https://gitlab.kitware.com`.
    #[arg(long = "remote-host")]
    pub remote_host: Option<String>,

    /// User or group owning the repository on the forge.
    #[arg(long = "remote-group")]
    pub remote_group: Option<String>,

    /// Only consider files matching one of these globs, and overwrite them
    /// even when their template keeps existing files.
    #[arg(long, value_name = "GLOB", num_args = 1..)]
    pub regen: Vec<String>,

    /// Confirmation prompts to skip (comma-separated).
    #[arg(long = "skip-confirms", value_delimiter = ',')]
    #[arg(value_enum)]
    pub skip_confirms: Vec<SkipConfirm>,

    /// Decline every overwrite that would need a confirmation.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,

    /// Preview actions without touching the filesystem.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the diff of every update.
    #[arg(long)]
    pub diff: bool,

    /// Initialize a git repository and its `origin` remote if missing.
    #[arg(long = "init-git")]
    pub init_git: bool,
}

impl GenerateArgs {
    /// The command line values that replace configuration file values.
    pub fn overrides(&self) -> Result<ConfigOverrides> {
        let parse = |version: &Option<String>| {
            version.as_deref().map(str::parse::<PythonVersion>).transpose()
        };
        Ok(ConfigOverrides {
            tags: self.tags.clone(),
            repo_name: self.repo_name.clone(),
            mod_name: self.mod_name.clone(),
            min_python: parse(&self.min_python)?,
            max_python: parse(&self.max_python)?,
            remote_host: self.remote_host.clone(),
            remote_group: self.remote_group.clone(),
        })
    }
}

/// Arguments for the directives command.
#[derive(Args, Debug, Clone)]
pub struct DirectivesArgs {
    /// File to scan.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directive namespace, matched case-insensitively.
    #[arg(long, default_value = DIRECTIVE_NAMESPACE)]
    pub namespace: String,
}

/// Arguments for the rewrite command.
#[derive(Args, Debug, Clone)]
pub struct RewriteArgs {
    /// File to rewrite in place.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Active tags (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Print the rewritten text instead of writing it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Arguments for the remote command.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Remote url in any of the https, ssh, git@ or scp-like shapes.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Print the url converted to this shape instead of its parts.
    #[arg(long, value_enum)]
    pub to: Option<UrlShape>,
}

fn exit_with_help() -> ! {
    let mut command = Cli::command().help_template(HELP_TEMPLATE);
    if let Err(print_err) = command.print_help() {
        eprintln!("Failed to display help information: {print_err}");
    } else {
        println!();
    }
    std::process::exit(exit_codes::FAILURE);
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| match e.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => exit_with_help(),
        _ => e.exit(),
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
