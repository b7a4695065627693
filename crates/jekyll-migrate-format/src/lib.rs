//! Run report model and console/JSON renderers for jekyll-migrate.

use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where converted documents are written.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Overwrite originals whose content changed.
    #[default]
    InPlace,
    /// Write `<original>.<suffix>` next to every processed document.
    Shadow,
    /// Convert in memory only.
    DryRun,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunMode::InPlace => "in-place",
            RunMode::Shadow => "shadow",
            RunMode::DryRun => "dry-run",
        };
        f.write_str(label)
    }
}

/// Result of processing one document.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Modified,
    Unchanged,
    Failed { message: String },
    Missing,
}

/// Per-file entry in the run report.
#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub status: FileStatus,
    pub needs_review: bool,
    pub rewrites: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileReport {
    pub fn failed(path: PathBuf, message: impl Into<String>) -> Self {
        FileReport {
            path,
            output: None,
            status: FileStatus::Failed {
                message: message.into(),
            },
            needs_review: false,
            rewrites: 0,
            diff: None,
        }
    }

    pub fn missing(path: PathBuf) -> Self {
        FileReport {
            path,
            output: None,
            status: FileStatus::Missing,
            needs_review: false,
            rewrites: 0,
            diff: None,
        }
    }
}

/// Aggregate counters for a batch run plus the per-file entries behind them.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub mode: RunMode,
    pub files_found: usize,
    pub files_scanned: usize,
    pub files_modified: usize,
    pub files_failed: usize,
    pub needs_review: usize,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn new(root: PathBuf, mode: RunMode, files_found: usize) -> Self {
        RunReport {
            root,
            mode,
            files_found,
            ..RunReport::default()
        }
    }

    /// Fold a file result into the counters.
    pub fn record(&mut self, file: FileReport) {
        match &file.status {
            FileStatus::Modified => {
                self.files_scanned += 1;
                self.files_modified += 1;
            }
            FileStatus::Unchanged => self.files_scanned += 1,
            FileStatus::Failed { .. } => {
                self.files_scanned += 1;
                self.files_failed += 1;
            }
            FileStatus::Missing => {}
        }
        if file.needs_review {
            self.needs_review += 1;
        }
        self.files.push(file);
    }

    pub fn missing_count(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.status == FileStatus::Missing)
            .count()
    }

    /// True when some discovered file was never processed.
    pub fn has_mismatch(&self) -> bool {
        self.files_scanned != self.files_found
    }

    pub fn is_clean(&self) -> bool {
        self.files_failed == 0 && !self.has_mismatch()
    }
}

/// Output formats for the run report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    #[default]
    Plain,
    Json,
}

/// Rendering switches supplied by the CLI.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub format: ReportFormat,
    pub quiet: bool,
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a RunReport,
}

/// Render the report in the requested format.
pub fn render(report: &RunReport, options: RenderOptions) -> Result<String, serde_json::Error> {
    match options.format {
        ReportFormat::Plain => Ok(render_plain(report, options.quiet)),
        ReportFormat::Json => render_json(report, Utc::now()),
    }
}

fn render_json(report: &RunReport, generated_at: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonEnvelope {
        generated_at,
        report,
    })
}

fn render_plain(report: &RunReport, quiet: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Starting content conversion in {} ({})...",
        report.root.display(),
        report.mode
    );
    let _ = writeln!(out, "Found {} Markdown files to process.", report.files_found);

    for file in &report.files {
        match &file.status {
            FileStatus::Failed { message } => {
                let _ = writeln!(
                    out,
                    "Error processing file {}: {}",
                    file.path.display(),
                    message
                );
            }
            FileStatus::Missing => {
                let _ = writeln!(
                    out,
                    "Target file for conversion not found: {}",
                    file.path.display()
                );
            }
            FileStatus::Modified if !quiet => {
                match &file.output {
                    Some(output) if output != &file.path => {
                        let _ = writeln!(
                            out,
                            "✏️  converted {} -> {}",
                            file.path.display(),
                            output.display()
                        );
                    }
                    _ => {
                        let _ = writeln!(out, "✏️  converted {}", file.path.display());
                    }
                }
                if let Some(diff) = &file.diff {
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
            FileStatus::Modified | FileStatus::Unchanged => {}
        }
    }

    let _ = writeln!(
        out,
        "Content conversion finished. Total files processed: {}. Total files modified: {}",
        report.files_scanned, report.files_modified
    );
    let _ = writeln!(
        out,
        "Verification: Found {} files with 'Jekyll include... needs review' comments.",
        report.needs_review
    );
    if report.has_mismatch() {
        let _ = writeln!(
            out,
            "Warning: Processed {} files, but initially found {}. Some files may have been missed.",
            report.files_scanned, report.files_found
        );
    }
    out
}
