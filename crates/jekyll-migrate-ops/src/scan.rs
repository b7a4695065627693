use std::path::{Path, PathBuf};

use jekyll_migrate_config::ScanSettings;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::paths::{display_path, normalize_path};
use crate::OperationError;

/// A document selected for conversion.
#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub path: PathBuf,
    pub display: PathBuf,
    pub exists: bool,
}

/// Walk `root` for documents with a configured extension, in file-name order.
pub(crate) fn discover(
    root: &Path,
    scan: &ScanSettings,
    shadow_suffix: &str,
) -> Result<Vec<Target>, OperationError> {
    let shadow_tail = format!(".{shadow_suffix}");
    let mut targets = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(OperationError::Io {
                    path: root.to_path_buf(),
                    source: err.into(),
                });
            }
            Err(err) => {
                warn!(
                    path = %err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    error = %err,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !scan.accepts_extension(path) {
            continue;
        }

        let relative = display_path(path, root);
        if scan.exclude.matches(&relative) {
            debug!(path = %relative.display(), "excluded by scan.exclude");
            continue;
        }

        if is_shadow_copy(path, &shadow_tail, scan) {
            debug!(path = %relative.display(), "skipping shadow copy");
            continue;
        }

        targets.push(Target {
            path: path.to_path_buf(),
            display: relative,
            exists: true,
        });
    }

    debug!(root = %root.display(), count = targets.len(), "discovered documents");
    Ok(targets)
}

/// A shadow copy is `<document>.<suffix>` where `<document>` itself passes the extension filter.
fn is_shadow_copy(path: &Path, shadow_tail: &str, scan: &ScanSettings) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(shadow_tail))
        .is_some_and(|original| scan.accepts_extension(Path::new(original)))
}

/// Use a caller-supplied list of documents; missing entries are kept so the report can flag them.
pub(crate) fn explicit(root: &Path, working_dir: &Path, files: &[PathBuf]) -> Vec<Target> {
    files
        .iter()
        .map(|file| {
            let path = normalize_path(working_dir.join(file));
            Target {
                exists: path.is_file(),
                display: display_path(&path, root),
                path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jekyll_migrate_config::PatternList;

    fn markdown_scan() -> ScanSettings {
        ScanSettings {
            root: PathBuf::from("."),
            extensions: vec!["md".into()],
            exclude: PatternList::default(),
        }
    }

    #[test]
    fn shadow_copy_requires_an_accepted_original() {
        let scan = markdown_scan();
        assert!(is_shadow_copy(Path::new("docs/a.md.converted"), ".converted", &scan));
        assert!(is_shadow_copy(Path::new("docs/a.md.md"), ".md", &scan));
        assert!(!is_shadow_copy(Path::new("docs/a.md"), ".md", &scan));
        assert!(!is_shadow_copy(Path::new("docs/notes.txt.converted"), ".converted", &scan));
    }
}
