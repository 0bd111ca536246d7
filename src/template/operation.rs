use std::fmt::Display;
use std::path::PathBuf;

/// Why a staged file is left out of the target repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file exists and its template does not overwrite by default.
    NoOverwrite,
    /// `--regen` globs were given and none matches the file.
    NotSelected,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SkipReason::NoOverwrite => "exists and is not regenerated by default",
            SkipReason::NotSelected => "not selected by --regen",
        };
        write!(f, "{reason}")
    }
}

/// What to do with one staged file.
#[derive(Debug)]
pub enum SyncOperation {
    Create { source: PathBuf, target: PathBuf, key: String },
    Update {
        source: PathBuf,
        target: PathBuf,
        key: String,
        /// Unified diff from the current content to the staged one.
        diff: String,
        /// The current content is what xcookie wrote last time.
        pristine: bool,
    },
    Unchanged { target: PathBuf, key: String },
    Skip { target: PathBuf, key: String, reason: SkipReason },
}

impl SyncOperation {
    /// Returns the target path for this operation, used for error context.
    pub fn target_path(&self) -> &PathBuf {
        match self {
            SyncOperation::Create { target, .. }
            | SyncOperation::Update { target, .. }
            | SyncOperation::Unchanged { target, .. }
            | SyncOperation::Skip { target, .. } => target,
        }
    }

    /// The repository relative, `/`-separated path of the file.
    pub fn key(&self) -> &str {
        match self {
            SyncOperation::Create { key, .. }
            | SyncOperation::Update { key, .. }
            | SyncOperation::Unchanged { key, .. }
            | SyncOperation::Skip { key, .. } => key,
        }
    }

    /// Returns a brief description of this operation for error messages.
    pub fn error_context(&self) -> String {
        match self {
            SyncOperation::Create { source, target, .. } => {
                format!("create '{}' from '{}'", target.display(), source.display())
            }
            SyncOperation::Update { source, target, .. } => {
                format!("update '{}' from '{}'", target.display(), source.display())
            }
            SyncOperation::Unchanged { target, .. } => {
                format!("keep '{}'", target.display())
            }
            SyncOperation::Skip { target, .. } => format!("skip '{}'", target.display()),
        }
    }

    /// Gets a message describing the operation and its status.
    ///
    /// # Arguments
    /// * `user_confirmed_overwrite` - Whether the update was accepted
    /// * `dry_run` - Whether this is a dry run (no actual file operations)
    ///
    /// # Returns
    /// * `String` - A descriptive message about the operation
    pub fn get_message(&self, user_confirmed_overwrite: bool, dry_run: bool) -> String {
        let prefix = if dry_run { "[DRY RUN] " } else { "" };

        match self {
            SyncOperation::Create { target, .. } => {
                format!("{prefix}Creating '{}'", target.display())
            }
            SyncOperation::Update { target, pristine, .. } => {
                if !user_confirmed_overwrite {
                    format!("{prefix}Skipping update of '{}' (not confirmed)", target.display())
                } else if *pristine {
                    format!("{prefix}Updating '{}'", target.display())
                } else {
                    format!(
                        "{prefix}Updating '{}' (overwriting local changes)",
                        target.display()
                    )
                }
            }
            SyncOperation::Unchanged { target, .. } => {
                format!("{prefix}Keeping '{}' (unchanged)", target.display())
            }
            SyncOperation::Skip { target, reason, .. } => {
                format!("{prefix}Skipping '{}' ({reason})", target.display())
            }
        }
    }
}
