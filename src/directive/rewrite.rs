use log::debug;
use std::collections::BTreeSet;
use std::path::Path;

use super::{Command, Directive, DirectiveExtractor};
use crate::constants::{COMMENT_MARKER, DIRECTIVE_NAMESPACE};
use crate::error::Result;

fn split_indent(line: &str) -> (&str, &str) {
    let body = line.trim_start();
    line.split_at(line.len() - body.len())
}

/// Comments `line` out, keeping its indentation: `"   foo"` becomes
/// `"   # foo"`. Lines that are already comments are returned unchanged.
pub fn comment_line(line: &str) -> String {
    let (indent, body) = split_indent(line);
    if body.starts_with(COMMENT_MARKER) {
        return line.to_string();
    }
    format!("{indent}{COMMENT_MARKER} {body}")
}

/// Removes the run of comment markers found right after the indentation of
/// `line`, together with the whitespace that follows it.
pub fn uncomment_line(line: &str) -> String {
    let (indent, body) = split_indent(line);
    if !body.starts_with(COMMENT_MARKER) {
        return line.to_string();
    }
    let body = body.trim_start_matches(COMMENT_MARKER).trim_start();
    format!("{indent}{body}")
}

/// Applies `COMMENT_IF` / `UNCOMMENT_IF` directives for a fixed set of
/// active tags.
pub struct Rewriter {
    extractor: DirectiveExtractor,
    active_tags: BTreeSet<String>,
}

impl Rewriter {
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            extractor: DirectiveExtractor::new(DIRECTIVE_NAMESPACE, Command::REWRITE)?,
            active_tags: tags.into_iter().map(Into::into).collect(),
        })
    }

    pub fn active_tags(&self) -> &BTreeSet<String> {
        &self.active_tags
    }

    /// Every argument of the directive is an active tag. The sign of the
    /// directive is not part of the check.
    pub fn tags_satisfied(&self, directive: &Directive) -> bool {
        directive.args().iter().all(|tag| self.active_tags.contains(tag))
    }

    /// Rewrites one line (without its newline).
    pub fn rewrite_line(&self, line: &str) -> Result<String> {
        let mut rewritten = line.to_string();
        for directive in self.extractor.extract(line) {
            let directive = directive?;
            if !self.tags_satisfied(&directive) {
                continue;
            }
            rewritten = match directive.command() {
                Command::CommentIf => comment_line(&rewritten),
                Command::UncommentIf => uncomment_line(&rewritten),
                _ => rewritten,
            };
        }
        Ok(rewritten)
    }

    /// Rewrites every line of `text`.
    ///
    /// # Returns
    /// * `Ok(Some(text))` - the rewritten text when at least one line changed
    /// * `Ok(None)` - when nothing changed
    pub fn rewrite_text(&self, text: &str) -> Result<Option<String>> {
        let mut changed = false;
        let lines = text
            .split('\n')
            .map(|line| {
                let rewritten = self.rewrite_line(line)?;
                changed |= rewritten != line;
                Ok(rewritten)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(changed.then(|| lines.join("\n")))
    }

    /// Rewrites the file at `path` in place.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether the file was modified
    pub fn rewrite_file(&self, path: &Path) -> Result<bool> {
        let text = std::fs::read_to_string(path)?;
        match self.rewrite_text(&text)? {
            Some(rewritten) => {
                debug!("Rewriting conditional lines of '{}'", path.display());
                std::fs::write(path, rewritten)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn comment_and_uncomment_keep_indentation() {
        assert_eq!(comment_line("   foobar"), "   # foobar");
        assert_eq!(uncomment_line("   # foobar"), "   foobar");
        assert_eq!(uncomment_line("\t##  foobar"), "\tfoobar");
        assert_eq!(comment_line("   # foobar"), "   # foobar");
        assert_eq!(uncomment_line("   foobar"), "   foobar");
        assert_eq!(comment_line(""), "# ");
    }

    #[test]
    fn uncomments_when_all_tags_are_active() {
        let rewriter = Rewriter::new(["cv2", "purepy"]).unwrap();
        let text = "# opencv-python  # xcookie: +UNCOMMENT_IF(cv2)\n";
        assert_eq!(
            rewriter.rewrite_text(text).unwrap().as_deref(),
            Some("opencv-python  # xcookie: +UNCOMMENT_IF(cv2)\n")
        );

        let rewriter = Rewriter::new(["purepy"]).unwrap();
        assert_eq!(rewriter.rewrite_text(text).unwrap(), None);
    }

    #[test]
    fn every_argument_must_be_active() {
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        let line = "import osgeo  # xcookie: +COMMENT_IF(cv2,gdal)";
        assert_eq!(rewriter.rewrite_line(line).unwrap(), line);

        let rewriter = Rewriter::new(["cv2", "gdal"]).unwrap();
        assert_eq!(
            rewriter.rewrite_line(line).unwrap(),
            "# import osgeo  # xcookie: +COMMENT_IF(cv2,gdal)"
        );
    }

    #[test]
    fn sign_is_not_consulted() {
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        assert_eq!(
            rewriter.rewrite_line("    x = 1  # xcookie: -COMMENT_IF(cv2)").unwrap(),
            "    # x = 1  # xcookie: -COMMENT_IF(cv2)"
        );
    }

    #[test]
    fn apostrophes_outside_python_do_not_hide_directives() {
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        assert_eq!(
            rewriter.rewrite_line("    - echo it's fine  # xcookie: +COMMENT_IF(cv2)").unwrap(),
            "    # - echo it's fine  # xcookie: +COMMENT_IF(cv2)"
        );
    }

    #[test]
    fn empty_argument_lists_are_never_satisfied() {
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        for line in ["x = 1  # xcookie: +COMMENT_IF()", "# x = 1  # xcookie: +UNCOMMENT_IF()"] {
            assert_eq!(rewriter.rewrite_line(line).unwrap(), line);
        }
    }

    #[test]
    fn directives_apply_in_order() {
        let rewriter = Rewriter::new(["a", "b"]).unwrap();
        assert_eq!(
            rewriter
                .rewrite_line("x  # xcookie: +COMMENT_IF(a), +UNCOMMENT_IF(b)")
                .unwrap(),
            "x  # xcookie: +COMMENT_IF(a), +UNCOMMENT_IF(b)"
        );
    }

    #[test]
    fn rewriting_is_idempotent() {
        let rewriter = Rewriter::new(["cv2", "github"]).unwrap();
        let text = concat!(
            "deps = [\n",
            "    # 'opencv'  # xcookie: +UNCOMMENT_IF(cv2)\n",
            "    'gdal'  # xcookie: +COMMENT_IF(cv2)\n",
            "    'numpy'\n",
            "]\n",
        );
        let once = rewriter.rewrite_text(text).unwrap().unwrap();
        assert_eq!(
            once,
            concat!(
                "deps = [\n",
                "    'opencv'  # xcookie: +UNCOMMENT_IF(cv2)\n",
                "    # 'gdal'  # xcookie: +COMMENT_IF(cv2)\n",
                "    'numpy'\n",
                "]\n",
            )
        );
        assert_eq!(rewriter.rewrite_text(&once).unwrap(), None);
    }

    #[test]
    fn other_commands_do_not_rewrite() {
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        let line = "x  # xcookie: +SKIP, +REQUIRES(--cv2)";
        assert_eq!(rewriter.rewrite_line(line).unwrap(), line);
    }

    #[test]
    fn unbalanced_parentheses_propagate() {
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        let result = rewriter.rewrite_text("x  # xcookie: +COMMENT_IF(cv2");
        assert!(matches!(result, Err(Error::UnbalancedParentheses { .. })));
    }

    #[test]
    fn rewrite_file_only_touches_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.py");

        std::fs::write(&path, "import os\n").unwrap();
        let rewriter = Rewriter::new(["cv2"]).unwrap();
        assert!(!rewriter.rewrite_file(&path).unwrap());

        std::fs::write(&path, "import cv2  # xcookie: +COMMENT_IF(cv2)\n").unwrap();
        assert!(rewriter.rewrite_file(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# import cv2  # xcookie: +COMMENT_IF(cv2)\n"
        );
    }
}
