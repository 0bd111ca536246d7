//! Inline comment directives.
//!
//! A directive is a trailing comment of the form
//! `<code> # xcookie: +UNCOMMENT_IF(cv2), -COMMENT_IF(gdal)`. This module
//! extracts them (`extract`), interprets them against the runtime state
//! (`effect`) and applies the comment toggling ones to whole files
//! (`rewrite`).

use serde::Serialize;
use std::fmt::Display;

pub mod command;
pub mod effect;
pub mod extract;
pub mod rewrite;

pub use command::Command;
pub use effect::{Action, Effect};
pub use extract::{extract_comments, parse_opstr, split_opstr, DirectiveExtractor};
pub use rewrite::{comment_line, uncomment_line, Rewriter};

/// A single parsed directive, e.g. `+UNCOMMENT_IF(cv2)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    #[serde(rename = "name")]
    command: Command,
    positive: bool,
    args: Vec<String>,
    /// `Some(true)` when the directive shares its line with code,
    /// `Some(false)` on a pure comment line, `None` when parsed standalone.
    inline: Option<bool>,
}

impl Directive {
    pub fn new(command: Command, positive: bool, args: Vec<String>) -> Self {
        Self { command, positive, args, inline: None }
    }

    pub(crate) fn with_inline(mut self, inline: bool) -> Self {
        self.inline = Some(inline);
        self
    }

    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn positive(&self) -> bool {
        self.positive
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn inline(&self) -> Option<bool> {
        self.inline
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.positive { '+' } else { '-' };
        if self.args.is_empty() {
            write!(f, "{sign}{}", self.command)
        } else {
            write!(f, "{sign}{}({})", self.command, self.args.join(","))
        }
    }
}
