use serde::Serialize;
use std::fmt::Display;

/// Commands that may appear inside an `xcookie:` comment directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Comment the line out when every argument tag is active.
    CommentIf,
    /// Uncomment the line when every argument tag is active.
    UncommentIf,
    /// Gate on command line flags or environment variables.
    Requires,
    Skip,
    Ellipsis,
    IgnoreWhitespace,
    ReportUdiff,
    ReportCdiff,
    ReportNdiff,
}

impl Command {
    /// Every command, in lookup priority order.
    pub const ALL: &'static [Command] = &[
        Command::UncommentIf,
        Command::CommentIf,
        Command::Requires,
        Command::Skip,
        Command::Ellipsis,
        Command::IgnoreWhitespace,
        Command::ReportUdiff,
        Command::ReportCdiff,
        Command::ReportNdiff,
    ];

    /// The commands the line rewriter acts on.
    pub const REWRITE: &'static [Command] = &[Command::UncommentIf, Command::CommentIf];

    pub fn name(self) -> &'static str {
        match self {
            Command::CommentIf => "COMMENT_IF",
            Command::UncommentIf => "UNCOMMENT_IF",
            Command::Requires => "REQUIRES",
            Command::Skip => "SKIP",
            Command::Ellipsis => "ELLIPSIS",
            Command::IgnoreWhitespace => "IGNORE_WHITESPACE",
            Command::ReportUdiff => "REPORT_UDIFF",
            Command::ReportCdiff => "REPORT_CDIFF",
            Command::ReportNdiff => "REPORT_NDIFF",
        }
    }

    /// Alternative spellings accepted for this command.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Command::IgnoreWhitespace => &["NORMALIZE_WHITESPACE"],
            _ => &[],
        }
    }

    /// The report style selected by a `REPORT_*` command, e.g. `udiff`.
    pub fn report_style(self) -> Option<&'static str> {
        match self {
            Command::ReportUdiff => Some("udiff"),
            Command::ReportCdiff => Some("cdiff"),
            Command::ReportNdiff => Some("ndiff"),
            _ => None,
        }
    }

    /// Resolves an uppercase name against `known`, walking it in order and
    /// accepting either the canonical name or a declared alias.
    pub fn lookup(name: &str, known: &[Command]) -> Option<Command> {
        known
            .iter()
            .copied()
            .find(|command| command.name() == name || command.aliases().contains(&name))
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_respects_the_known_set() {
        assert_eq!(Command::lookup("COMMENT_IF", Command::ALL), Some(Command::CommentIf));
        assert_eq!(Command::lookup("ELLIPSIS", Command::REWRITE), None);
        assert_eq!(Command::lookup("comment_if", Command::ALL), None);
    }

    #[test]
    fn lookup_accepts_aliases() {
        assert_eq!(
            Command::lookup("NORMALIZE_WHITESPACE", Command::ALL),
            Some(Command::IgnoreWhitespace)
        );
    }

    #[test]
    fn serializes_as_the_canonical_name() {
        for command in Command::ALL {
            let json = serde_json::to_value(command).unwrap();
            assert_eq!(json, serde_json::Value::String(command.name().to_string()));
        }
    }
}
