use crate::{
    cli::SkipConfirm,
    error::Result,
    ioutils::copy_file,
    metadata::content_hash,
    prompt::confirm,
    template::{operation::SyncOperation, processor::SyncProcessor},
};
use indexmap::IndexMap;
use std::path::Path;
use walkdir::WalkDir;

/// Outcome of a sync, by manifest key.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<String>,
    pub declined: Vec<String>,
    /// Hash of every file that now holds its staged content.
    pub recorded: IndexMap<String, String>,
}

impl SyncReport {
    pub fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} unchanged, {} skipped, {} declined",
            self.created.len(),
            self.updated.len(),
            self.unchanged.len(),
            self.skipped.len(),
            self.declined.len()
        )
    }
}

/// Applies the sync operations of every staged file
pub struct FileProcessor<'a> {
    processor: SyncProcessor<'a>,
    skip_confirms: &'a [SkipConfirm],
    non_interactive: bool,
    dry_run: bool,
    show_diff: bool,
}

impl<'a> FileProcessor<'a> {
    pub fn new(
        processor: SyncProcessor<'a>,
        skip_confirms: &'a [SkipConfirm],
        non_interactive: bool,
        dry_run: bool,
        show_diff: bool,
    ) -> Self {
        Self { processor, skip_confirms, non_interactive, dry_run, show_diff }
    }

    /// Processes every file below the staging root, in file name order.
    ///
    /// # Errors
    /// Any failure to decide or apply an operation stops the sync; files
    /// handled before it keep their new content.
    pub fn process_all_files(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let walker = WalkDir::new(self.processor.staging_root()).sort_by_file_name();

        for dir_entry in walker {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type().is_file() {
                continue;
            }
            let staged_entry = dir_entry.path();
            let operation = self.processor.process(staged_entry)?;
            log::debug!("Handling sync operation: {operation:?}");

            let user_confirmed_overwrite =
                self.handle_sync_operation(&operation).map_err(|e| {
                    log::error!("Failed to {}", operation.error_context());
                    e
                })?;
            log::info!("{}", operation.get_message(user_confirmed_overwrite, self.dry_run));

            self.record(&mut report, &operation, staged_entry, user_confirmed_overwrite)?;
        }
        Ok(report)
    }

    /// Applies a single operation.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether an update was accepted; `true` for every
    ///   other operation
    fn handle_sync_operation(&self, operation: &SyncOperation) -> Result<bool> {
        match operation {
            SyncOperation::Create { source, target, .. } => {
                self.copy_file(source, target)?;
                Ok(true)
            }
            SyncOperation::Update { source, target, diff, pristine, .. } => {
                if self.show_diff {
                    println!("{diff}");
                }
                let user_confirmed = if *pristine || self.should_skip_overwrite_prompt() {
                    true
                } else if self.non_interactive {
                    false
                } else if self.dry_run {
                    log::debug!("Not asking about '{}' during a dry run", target.display());
                    true
                } else {
                    confirm(false, format!("Overwrite {}?", target.display()))?
                };

                if user_confirmed {
                    self.copy_file(source, target)?;
                }
                Ok(user_confirmed)
            }
            SyncOperation::Unchanged { .. } | SyncOperation::Skip { .. } => Ok(true),
        }
    }

    fn record(
        &self,
        report: &mut SyncReport,
        operation: &SyncOperation,
        staged_entry: &Path,
        user_confirmed_overwrite: bool,
    ) -> Result<()> {
        let key = operation.key().to_string();
        let holds_staged_content = match operation {
            SyncOperation::Create { .. } => {
                report.created.push(key.clone());
                true
            }
            SyncOperation::Update { .. } if user_confirmed_overwrite => {
                report.updated.push(key.clone());
                true
            }
            SyncOperation::Update { .. } => {
                report.declined.push(key.clone());
                false
            }
            SyncOperation::Unchanged { .. } => {
                report.unchanged.push(key.clone());
                true
            }
            SyncOperation::Skip { .. } => {
                report.skipped.push(key.clone());
                false
            }
        };

        if holds_staged_content {
            let staged = std::fs::read(staged_entry)?;
            report.recorded.insert(key, content_hash(&staged));
        }
        Ok(())
    }

    /// Copies a staged file into the repository, unless this is a dry run.
    fn copy_file(&self, source: &Path, target: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        copy_file(source, target)
    }

    fn should_skip_overwrite_prompt(&self) -> bool {
        self.skip_confirms.contains(&SkipConfirm::All)
            || self.skip_confirms.contains(&SkipConfirm::Overwrite)
    }
}
