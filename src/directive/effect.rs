use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;

use super::{Command, Directive};
use crate::error::{Error, Result};

/// What the runtime state updater should do with an [`Effect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    #[serde(rename = "noop")]
    Noop,
    #[serde(rename = "set.add")]
    SetAdd,
    #[serde(rename = "set.remove")]
    SetRemove,
    #[serde(rename = "assign")]
    Assign,
    #[serde(rename = "set_report_style")]
    SetReportStyle,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            Action::Noop => "noop",
            Action::SetAdd => "set.add",
            Action::SetRemove => "set.remove",
            Action::Assign => "assign",
            Action::SetReportStyle => "set_report_style",
        };
        write!(f, "{action}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    pub action: Action,
    pub key: String,
    pub value: Value,
}

impl Effect {
    fn new(action: Action, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { action, key: key.into(), value: value.into() }
    }
}

/// Values of an environment variable that do not satisfy `env:VAR`.
const FALSY: &[&str] = &["", "0", "false", "no", "off"];

/// Whether a single `REQUIRES` argument holds.
///
/// `--flag` holds when it appears in `argv`. `env:VAR` holds when `VAR` is
/// set to a truthy value and `env:VAR=value` when it is set to exactly
/// `value`.
fn requirement_satisfied(
    arg: &str,
    argv: &[String],
    environ: &HashMap<String, String>,
) -> Result<bool> {
    if arg.starts_with("--") {
        return Ok(argv.iter().any(|a| a == arg));
    }

    let Some(spec) = arg.strip_prefix("env:") else {
        return Err(Error::InvalidRequirement(arg.to_string()));
    };
    let satisfied = match spec.split_once('=') {
        Some((var, expected)) if !var.is_empty() => {
            environ.get(var).is_some_and(|value| value == expected)
        }
        None if !spec.is_empty() => environ
            .get(spec)
            .is_some_and(|value| !FALSY.contains(&value.to_lowercase().as_str())),
        _ => return Err(Error::InvalidRequirement(arg.to_string())),
    };
    Ok(satisfied)
}

impl Directive {
    /// Interprets this directive against the command line and environment.
    ///
    /// # Arguments
    /// * `argv` - The command line arguments `--flag` requirements look in
    /// * `environ` - The environment `env:` requirements look in
    ///
    /// # Returns
    /// * `Result<Vec<Effect>>` - One effect, or one per argument for
    ///   `REQUIRES`
    ///
    /// # Errors
    /// * `Error::InvalidRequirement` for a `REQUIRES` argument that is
    ///   neither `--flag` nor `env:VAR[=value]`
    pub fn effects(
        &self,
        argv: &[String],
        environ: &HashMap<String, String>,
    ) -> Result<Vec<Effect>> {
        let command = self.command();
        let effects = match command {
            Command::CommentIf | Command::UncommentIf => {
                vec![Effect::new(Action::Noop, command.name(), self.args().to_vec())]
            }
            Command::Requires => self
                .args()
                .iter()
                .map(|arg| {
                    let action = if requirement_satisfied(arg, argv, environ)? {
                        Action::SetRemove
                    } else {
                        Action::SetAdd
                    };
                    Ok(Effect::new(action, command.name(), arg.as_str()))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => match command.report_style() {
                Some(style) => vec![Effect::new(Action::SetReportStyle, style, self.positive())],
                None => vec![Effect::new(Action::Assign, command.name(), self.positive())],
            },
        };
        Ok(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directive(command: Command, positive: bool, args: &[&str]) -> Directive {
        Directive::new(command, positive, args.iter().map(|a| a.to_string()).collect())
    }

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn rewrite_commands_are_noops() {
        let effects = directive(Command::UncommentIf, true, &["cv2", "gdal"])
            .effects(&[], &no_env())
            .unwrap();
        assert_eq!(
            effects,
            vec![Effect::new(Action::Noop, "UNCOMMENT_IF", json!(["cv2", "gdal"]))]
        );
    }

    #[test]
    fn requires_checks_each_argument() {
        let argv = vec!["--slow".to_string()];
        let environ = HashMap::from([
            ("CI".to_string(), "true".to_string()),
            ("DISPLAY".to_string(), "0".to_string()),
            ("MODE".to_string(), "full".to_string()),
        ]);

        let effects = directive(
            Command::Requires,
            true,
            &["--slow", "--fast", "env:CI", "env:DISPLAY", "env:MODE=full", "env:MODE=lite"],
        )
        .effects(&argv, &environ)
        .unwrap();

        let actions: Vec<_> = effects.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                Action::SetRemove,
                Action::SetAdd,
                Action::SetRemove,
                Action::SetAdd,
                Action::SetRemove,
                Action::SetAdd,
            ]
        );
        assert!(effects.iter().all(|e| e.key == "REQUIRES"));
        assert_eq!(effects[4].value, json!("env:MODE=full"));
    }

    #[test]
    fn requires_rejects_unknown_forms() {
        let result = directive(Command::Requires, true, &["cuda"]).effects(&[], &no_env());
        assert!(matches!(result, Err(Error::InvalidRequirement(arg)) if arg == "cuda"));

        let result = directive(Command::Requires, true, &["env:"]).effects(&[], &no_env());
        assert!(matches!(result, Err(Error::InvalidRequirement(_))));
    }

    #[test]
    fn report_styles_are_lowercased() {
        let effects =
            directive(Command::ReportNdiff, false, &[]).effects(&[], &no_env()).unwrap();
        assert_eq!(effects, vec![Effect::new(Action::SetReportStyle, "ndiff", false)]);
    }

    #[test]
    fn other_commands_assign_their_sign() {
        let effects = directive(Command::Ellipsis, false, &[]).effects(&[], &no_env()).unwrap();
        assert_eq!(effects, vec![Effect::new(Action::Assign, "ELLIPSIS", false)]);

        let json = serde_json::to_value(&effects[0]).unwrap();
        assert_eq!(json, json!({"action": "assign", "key": "ELLIPSIS", "value": false}));
    }
}
