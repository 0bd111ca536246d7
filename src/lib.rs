/// Handles argument parsing and the subcommands.
pub mod cli;

/// Configuration files and the resolved project configuration.
pub mod config;

pub mod constants;

/// Inline `# xcookie:` comment directives.
pub mod directive;

/// Defines custom error types.
pub mod error;

pub mod ext;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// The manifest of generated files.
pub mod metadata;

/// User input and interaction handling.
pub mod prompt;

/// Git remote urls and repositories.
pub mod remote;

/// Template rendering functionality.
pub mod renderer;

/// The template registry, staging and sync planning.
pub mod template;
