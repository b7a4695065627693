//! Batch operations behind the jekyll-migrate command line.
//!
//! [`Operations::migrate`] discovers documents under a root, runs every one
//! through the converter, writes results according to the [`RunMode`], and
//! returns a [`RunReport`]. Failures on individual files are recorded in the
//! report and never abort the batch; only an unusable root or invalid options
//! surface as [`OperationError`].

mod diff;
mod migrate;
mod paths;
mod scan;

use std::io;
use std::path::PathBuf;

use jekyll_migrate_config::{validate_shadow_suffix, Config};
pub use jekyll_migrate_format::{FileReport, FileStatus, RunMode, RunReport};
use thiserror::Error;

pub use diff::build_unified_diff;
pub use paths::normalize_path;

/// Errors that stop a run before any document is processed.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("docs root {path} does not exist or is not a directory")]
    RootNotFound { path: PathBuf },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Parameters for a single migration run.
#[derive(Clone, Debug, Default)]
pub struct MigrateOptions {
    /// Override for the configured docs root (relative paths resolve against the working directory).
    pub root: Option<PathBuf>,
    /// Restrict the run to these documents instead of walking the root.
    pub files: Vec<PathBuf>,
    pub mode: RunMode,
    /// Override for the configured shadow suffix.
    pub shadow_suffix: Option<String>,
    /// Attach unified diffs for changed documents.
    pub diff: bool,
}

/// Completed run plus the exit code the CLI should report.
#[derive(Debug)]
pub struct MigrateOutcome {
    pub report: RunReport,
    pub exit_code: i32,
}

/// Operation bundle bound to a resolved configuration.
pub struct Operations {
    config: Config,
}

impl Operations {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Convert every selected document and collect a run report.
    pub fn migrate(&self, options: MigrateOptions) -> Result<MigrateOutcome, OperationError> {
        let working_dir = &self.config.sources.working_directory;
        let root = match &options.root {
            Some(root) => normalize_path(working_dir.join(root)),
            None => normalize_path(self.config.scan.root.clone()),
        };

        if !root.is_dir() {
            return Err(OperationError::RootNotFound { path: root });
        }

        let suffix = options
            .shadow_suffix
            .clone()
            .unwrap_or_else(|| self.config.output.shadow_suffix.clone());
        validate_shadow_suffix(&suffix).map_err(OperationError::InvalidInput)?;

        let targets = if options.files.is_empty() {
            scan::discover(&root, &self.config.scan, &suffix)?
        } else {
            scan::explicit(&root, working_dir, &options.files)
        };

        let report = migrate::run(migrate::MigrateInput {
            root: &root,
            targets: &targets,
            mode: options.mode,
            shadow_suffix: &suffix,
            diff: options.diff,
        });

        let exit_code = if report.is_clean() { 0 } else { 1 };
        Ok(MigrateOutcome { report, exit_code })
    }
}
