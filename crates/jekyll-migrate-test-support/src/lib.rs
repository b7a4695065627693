//! Shared test harness utilities for jekyll-migrate crates.

use std::fs;
use std::io::Write;
use std::path::Path;

use jekyll_migrate_config::{Config, LoadOptions};

/// Jekyll document exercising every rewrite rule.
pub const JEKYLL_PAGE: &str = "\
# Deploy to AWS

{% include toc.html %}

Start with the [quickstart]({% link quickstart/index.md %}).

{: .warning }
Credentials are required.

{: .note title=\"Heads up\" }
Regions differ.
";

/// Expected conversion of [`JEKYLL_PAGE`].
pub const CONVERTED_PAGE: &str = "\
# Deploy to AWS



Start with the [quickstart](quickstart/index.md).

!!! warning \"⚠️ Warning ⚠️\"
Credentials are required.

!!! note \"Heads up\"
Regions differ.
";

/// Jekyll document whose only tag is an include that needs manual review.
pub const REVIEW_PAGE: &str = "# Widgets\n\n{% include custom_widget.html %}\n";

/// Already-migrated document with no Jekyll syntax.
pub const PLAIN_PAGE: &str = "# Plain\n\n!!! tip\n    Nothing to convert.\n";

/// Write `contents` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    let mut file = fs::File::create(&path).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
}

/// Seed a small docs tree: two convertible pages, one plain page, one non-Markdown asset.
pub fn seed_docs(dir: &Path) {
    write_file(dir, "index.md", JEKYLL_PAGE);
    write_file(dir, "howto/widgets.md", REVIEW_PAGE);
    write_file(dir, "howto/plain.md", PLAIN_PAGE);
    write_file(dir, "assets/logo.txt", "{% include toc.html %}\n");
}

/// Configuration rooted at `dir` with built-in defaults.
pub fn test_config(dir: &Path) -> Config {
    let working_dir = fs::canonicalize(dir).expect("canonicalize working dir");
    Config::load(LoadOptions::default().with_working_dir(working_dir)).expect("load config")
}
