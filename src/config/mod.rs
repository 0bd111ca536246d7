//! Configuration management for xcookie
//!
//! This module contains the configuration system components:
//! - `types`: Value types used by the configuration file
//! - `loader`: Configuration file discovery and parsing
//! - `project`: Merging with the command line and the git remote

pub mod loader;
pub mod project;
pub mod types;

pub use loader::XCookieConfig;
pub use project::{ConfigOverrides, ProjectConfig};
pub use types::{PythonVersion, RemoteProtocol};
