use std::fs;
use std::path::{Path, PathBuf};

use jekyll_migrate_convert::convert;
use jekyll_migrate_format::{FileReport, FileStatus, RunMode, RunReport};
use jekyll_migrate_utils::{atomic_write, shadow_path};
use tracing::{debug, info, warn};

use crate::diff::build_unified_diff;
use crate::paths::display_path;
use crate::scan::Target;

/// Input bundle for a sequential migration pass.
pub(crate) struct MigrateInput<'a> {
    pub root: &'a Path,
    pub targets: &'a [Target],
    pub mode: RunMode,
    pub shadow_suffix: &'a str,
    pub diff: bool,
}

/// Process every target in order, recording one entry per document.
pub(crate) fn run(input: MigrateInput<'_>) -> RunReport {
    let mut report = RunReport::new(input.root.to_path_buf(), input.mode, input.targets.len());
    info!(
        root = %input.root.display(),
        mode = %input.mode,
        found = input.targets.len(),
        "starting content conversion"
    );

    for target in input.targets {
        let file = process_file(target, &input);
        if let FileStatus::Failed { message } = &file.status {
            warn!(path = %target.path.display(), error = %message, "error processing file");
        }
        report.record(file);
    }

    info!(
        scanned = report.files_scanned,
        modified = report.files_modified,
        failed = report.files_failed,
        needs_review = report.needs_review,
        "content conversion finished"
    );
    report
}

fn process_file(target: &Target, input: &MigrateInput<'_>) -> FileReport {
    if !target.exists {
        warn!(path = %target.path.display(), "target file for conversion not found");
        return FileReport::missing(target.display.clone());
    }

    let original = match fs::read_to_string(&target.path) {
        Ok(contents) => contents,
        Err(err) => return FileReport::failed(target.display.clone(), err.to_string()),
    };

    let conversion = convert(&original);
    debug!(
        path = %target.display.display(),
        changed = conversion.changed,
        rewrites = conversion.hits.total(),
        "converted document"
    );

    let destination = output_path(&target.path, conversion.changed, input);
    if let Some(destination) = &destination {
        if let Err(err) = atomic_write(destination, &conversion.content) {
            return FileReport::failed(
                target.display.clone(),
                format!("failed to write {}: {err}", destination.display()),
            );
        }
    }

    let diff = if input.diff {
        build_unified_diff(
            &original,
            &conversion.content,
            &target.display.to_string_lossy(),
        )
    } else {
        None
    };

    FileReport {
        path: target.display.clone(),
        output: destination.map(|path| display_path(&path, input.root)),
        status: if conversion.changed {
            FileStatus::Modified
        } else {
            FileStatus::Unchanged
        },
        needs_review: conversion.needs_review(),
        rewrites: conversion.hits.total(),
        diff,
    }
}

/// Where (if anywhere) the converted text is written for this mode.
fn output_path(path: &Path, changed: bool, input: &MigrateInput<'_>) -> Option<PathBuf> {
    match input.mode {
        RunMode::InPlace => changed.then(|| path.to_path_buf()),
        RunMode::Shadow => Some(shadow_path(path, input.shadow_suffix)),
        RunMode::DryRun => None,
    }
}
