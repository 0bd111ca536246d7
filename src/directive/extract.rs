use log::{debug, warn};
use regex::Regex;

use super::{Command, Directive};
use crate::constants::COMMENT_MARKER;
use crate::error::{Error, Result};

/// Byte offset of the first comment marker of `line` that is not inside a
/// single or double quoted string.
///
/// Outside python an apostrophe is ordinary text, so when the scan ends
/// inside an unterminated quote the first marker of the line is used.
fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(_) if ch == '\\' => escaped = true,
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == COMMENT_MARKER => return Some(idx),
            None => {}
        }
    }
    match quote {
        Some(_) => line.find(COMMENT_MARKER),
        None => None,
    }
}

/// The innermost comment of a line.
///
/// Starting from the first comment, the leading marker is stripped and the
/// remainder re-scanned until no further marker is found. For
/// `code  # a # b` this is `# b`.
fn innermost_comment(line: &str) -> Option<&str> {
    let mut comment = &line[comment_start(line)?..];
    let marker_len = COMMENT_MARKER.len_utf8();
    while let Some(next) = comment[marker_len..].find(COMMENT_MARKER) {
        comment = &comment[marker_len + next..];
    }
    Some(comment)
}

/// Yields the innermost comment of every line of `text` that has one.
pub fn extract_comments(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter_map(innermost_comment)
}

/// Whether every line of `text` is a comment once leading whitespace is
/// removed.
fn is_pure_comment(text: &str) -> bool {
    text.lines().all(|line| line.trim_start().starts_with(COMMENT_MARKER))
}

/// Splits a directive body on the commas that are not enclosed in
/// parentheses.
///
/// # Arguments
/// * `opstr` - The directive body, e.g. `+FOO, REQUIRES(foo,bar), +ELLIPSIS`
///
/// # Returns
/// * `Result<Vec<String>>` - The trimmed pieces, in order
///
/// # Errors
/// * `Error::UnbalancedParentheses` if a `)` has no matching `(` or a `(`
///   is never closed
pub fn split_opstr(opstr: &str) -> Result<Vec<String>> {
    let unbalanced = || Error::UnbalancedParentheses { opstr: opstr.to_string() };

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for ch in opstr.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or_else(unbalanced)?,
            ',' if depth == 0 => {
                pieces.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    if depth != 0 {
        return Err(unbalanced());
    }
    pieces.push(current.trim().to_string());
    Ok(pieces)
}

/// Parses one directive token such as `-REQUIRES(--flag)`.
///
/// Whitespace is ignored everywhere in the token and the command name is
/// case-insensitive. The argument list is split on every comma: nested
/// parentheses are not expected inside it.
///
/// # Returns
/// * `Some(Directive)` - when the command is one of `known`
/// * `None` - for empty tokens, malformed argument lists and unknown
///   commands; the last two are logged as warnings
pub fn parse_opstr(opstr: &str, known: &[Command]) -> Option<Directive> {
    let compact: String = opstr.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        debug!("Ignoring empty directive token");
        return None;
    }

    let (positive, body) = if let Some(rest) = compact.strip_prefix('+') {
        (true, rest)
    } else if let Some(rest) = compact.strip_prefix('-') {
        (false, rest)
    } else {
        (true, compact.as_str())
    };

    let (name, args) = match body.find('(') {
        Some(open) => {
            let Some(inner) = body[open + 1..].strip_suffix(')') else {
                warn!("Directive '{opstr}' has arguments that are not enclosed in parentheses, ignoring it");
                return None;
            };
            let args = inner.split(',').map(str::to_string).collect();
            (&body[..open], args)
        }
        None => (body, Vec::new()),
    };

    let name = name.to_uppercase();
    match Command::lookup(&name, known) {
        Some(command) => Some(Directive::new(command, positive, args)),
        None => {
            warn!("Unknown directive '{name}' in '{opstr}', ignoring it");
            None
        }
    }
}

/// Finds namespaced directives in the trailing comments of text.
pub struct DirectiveExtractor {
    pattern: Regex,
    known: Vec<Command>,
}

impl DirectiveExtractor {
    /// Creates an extractor for `# <namespace>: <opstr>, ...` comments.
    /// The namespace is matched case-insensitively.
    pub fn new(namespace: &str, known: &[Command]) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i)^{}\s*{}:\s*(?P<opstr>.*?)\s*$",
            regex::escape(&COMMENT_MARKER.to_string()),
            regex::escape(namespace)
        ))?;
        Ok(Self::with_pattern(pattern, known))
    }

    /// Creates an extractor from a custom pattern. The pattern must have a
    /// named group `opstr` capturing the directive body.
    pub fn with_pattern(pattern: Regex, known: &[Command]) -> Self {
        Self { pattern, known: known.to_vec() }
    }

    /// Lazily yields the directives found in `text`, left to right.
    ///
    /// Every directive is tagged `inline = false` when all lines of `text`
    /// are comments and `inline = true` otherwise. Unknown commands are
    /// skipped; unbalanced parentheses yield an error item.
    pub fn extract<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Result<Directive>> + 't {
        let inline = !is_pure_comment(text);

        extract_comments(text)
            .filter_map(move |comment| self.pattern.captures(comment))
            .flat_map(move |captures| {
                let opstr = captures.name("opstr").map_or("", |m| m.as_str());
                match split_opstr(opstr) {
                    Ok(pieces) => pieces
                        .iter()
                        .filter_map(|piece| parse_opstr(piece, &self.known))
                        .map(|directive| Ok(directive.with_inline(inline)))
                        .collect::<Vec<_>>(),
                    Err(e) => vec![Err(e)],
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DIRECTIVE_NAMESPACE;

    fn extractor(known: &[Command]) -> DirectiveExtractor {
        DirectiveExtractor::new(DIRECTIVE_NAMESPACE, known).unwrap()
    }

    #[test]
    fn innermost_comment_is_the_last_segment() {
        let comments: Vec<_> = extract_comments("x = 1  # a # b").collect();
        assert_eq!(comments, vec!["# b"]);

        let comments: Vec<_> = extract_comments("# a # b\nno comment\ny  # c").collect();
        assert_eq!(comments, vec!["# b", "# c"]);
    }

    #[test]
    fn markers_inside_strings_are_not_comments() {
        let comments: Vec<_> = extract_comments(r##"x = "# not a comment""##).collect();
        assert!(comments.is_empty());

        let comments: Vec<_> =
            extract_comments(r#"x = 'it\'s # here'  # real"#).collect();
        assert_eq!(comments, vec!["# real"]);
    }

    #[test]
    fn unterminated_quotes_fall_back_to_the_first_marker() {
        let comments: Vec<_> =
            extract_comments("    - echo it's fine  # xcookie: +COMMENT_IF(cv2)").collect();
        assert_eq!(comments, vec!["# xcookie: +COMMENT_IF(cv2)"]);

        let comments: Vec<_> = extract_comments("don't panic").collect();
        assert!(comments.is_empty());
    }

    #[test]
    fn split_respects_parentheses() {
        assert_eq!(
            split_opstr("+FOO, REQUIRES(foo,bar), +ELLIPSIS").unwrap(),
            vec!["+FOO", "REQUIRES(foo,bar)", "+ELLIPSIS"]
        );
        assert_eq!(split_opstr("+FOO").unwrap(), vec!["+FOO"]);
    }

    #[test]
    fn split_piece_count_follows_top_level_commas() {
        for (opstr, commas) in [
            ("", 0),
            ("A,B", 1),
            ("A(x,y,z)", 0),
            ("A(x,y),B(z),C", 2),
            ("A,,B,", 3),
            ("((a,b),c),d", 1),
        ] {
            let pieces = split_opstr(opstr).unwrap();
            assert_eq!(pieces.len(), commas + 1, "{opstr}");
            for piece in &pieces {
                assert!(split_opstr(piece).unwrap().len() == 1, "{piece}");
            }
        }
    }

    #[test]
    fn split_rejects_unbalanced_parentheses() {
        for opstr in ["REQUIRES(a", "REQUIRES(a))", ")(", "A(b,(c)"] {
            match split_opstr(opstr) {
                Err(Error::UnbalancedParentheses { opstr: reported }) => {
                    assert_eq!(reported, opstr)
                }
                other => panic!("Expected UnbalancedParentheses for {opstr}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_reads_sign_name_and_args() {
        let directive = parse_opstr(" - requires ( --flag , env:CI ) ", Command::ALL).unwrap();
        assert_eq!(directive.command(), Command::Requires);
        assert!(!directive.positive());
        assert_eq!(directive.args(), ["--flag", "env:CI"]);
        assert_eq!(directive.inline(), None);

        let directive = parse_opstr("ellipsis", Command::ALL).unwrap();
        assert!(directive.positive());
        assert!(directive.args().is_empty());
    }

    #[test]
    fn empty_argument_lists_keep_an_empty_tag() {
        let directive = parse_opstr("+COMMENT_IF()", Command::ALL).unwrap();
        assert_eq!(directive.args(), [""]);

        let directive = parse_opstr("UNCOMMENT_IF(cv2,)", Command::ALL).unwrap();
        assert_eq!(directive.args(), ["cv2", ""]);
    }

    #[test]
    fn parse_skips_unknown_and_malformed_tokens() {
        assert!(parse_opstr("+ELLIPSIS", Command::REWRITE).is_none());
        assert!(parse_opstr("+NOT_A_COMMAND(x)", Command::ALL).is_none());
        assert!(parse_opstr("COMMENT_IF(a)b", Command::ALL).is_none());
        assert!(parse_opstr("", Command::ALL).is_none());
    }

    #[test]
    fn extracts_a_pure_comment_directive() {
        let extractor = extractor(Command::REWRITE);
        let found: Vec<_> = extractor
            .extract("# xcookie: +UNCOMMENT_IF(cv2)")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            found,
            vec![Directive::new(Command::UncommentIf, true, vec!["cv2".into()])
                .with_inline(false)]
        );
    }

    #[test]
    fn extracts_inline_directives_in_order() {
        let extractor = extractor(Command::ALL);
        let found: Vec<_> = extractor
            .extract("import cv2  # XCookie: +COMMENT_IF(gdal), -ELLIPSIS, +BOGUS")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name(), "COMMENT_IF");
        assert_eq!(found[0].args(), ["gdal"]);
        assert_eq!(found[0].inline(), Some(true));
        assert_eq!(found[1].name(), "ELLIPSIS");
        assert!(!found[1].positive());
    }

    #[test]
    fn other_namespaces_are_ignored() {
        let extractor = extractor(Command::ALL);
        assert_eq!(extractor.extract("x = 1  # noqa: E501").count(), 0);
        assert_eq!(extractor.extract("x = 1  # xdoctest: +SKIP").count(), 0);
    }

    #[test]
    fn unbalanced_directive_is_an_error_item() {
        let extractor = extractor(Command::ALL);
        let found: Vec<_> = extractor.extract("x  # xcookie: +REQUIRES(--flag").collect();
        assert!(matches!(found.as_slice(), [Err(Error::UnbalancedParentheses { .. })]));
    }
}
