use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use jekyll_migrate_config::{Config, ConfigError, ConfigSourceKind, LoadOptions, Pattern};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

fn pattern_strings<'a, I>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Pattern>,
{
    patterns
        .into_iter()
        .map(|p| p.original().to_string())
        .collect()
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.scan.root, working_dir.join("."));
    assert_eq!(config.scan.extensions, vec!["md".to_string()]);
    assert!(config.scan.exclude.is_empty());
    assert_eq!(config.output.shadow_suffix, "converted");
    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn local_file_overrides_defaults() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".jekyll-migrate.toml"),
        r#"
        [scan]
        root = "docs/docs_mkdocs"
        extensions = [".md", "markdown"]
        exclude = ["**/drafts/**"]

        [output]
        shadow_suffix = "v2.converted"
        "#,
    );

    let config = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect("load local config");

    assert_eq!(config.scan.root, working_dir.join("docs/docs_mkdocs"));
    assert_eq!(
        config.scan.extensions,
        vec!["md".to_string(), "markdown".to_string()]
    );
    assert_eq!(
        pattern_strings(config.scan.exclude.iter()),
        vec!["**/drafts/**".to_string()]
    );
    assert!(config.scan.exclude.matches(Path::new("guide/drafts/wip.md")));
    assert_eq!(config.output.shadow_suffix, "v2.converted");
    assert_eq!(
        config.sources.layers.last().map(|layer| layer.kind),
        Some(ConfigSourceKind::Local)
    );
}

#[test]
fn git_root_layer_applies_below_local() {
    let temp = TempDir::new().expect("tempdir");
    let repo = canonical(temp.path());
    fs::create_dir_all(repo.join(".git")).expect("fake git dir");
    let nested = repo.join("site");
    fs::create_dir_all(&nested).expect("nested dir");

    write_file(
        repo.join(".jekyll-migrate.toml"),
        r#"
        [scan]
        extensions = ["markdown"]
        [output]
        shadow_suffix = "from-git"
        "#,
    );
    write_file(
        nested.join(".jekyll-migrate.toml"),
        r#"
        [output]
        shadow_suffix = "from-local"
        "#,
    );

    let config =
        Config::load(LoadOptions::default().with_working_dir(&nested)).expect("load layers");

    assert_eq!(config.scan.extensions, vec!["markdown".to_string()]);
    assert_eq!(config.output.shadow_suffix, "from-local");
    let kinds: Vec<_> = config.sources.layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local
        ]
    );
}

#[test]
fn override_path_wins_and_must_exist() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join("custom.toml"),
        "[scan]\nroot = \"content\"\n",
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("custom.toml"),
    )
    .expect("load override");
    assert_eq!(config.scan.root, working_dir.join("content"));

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("missing.toml"),
    )
    .expect_err("missing override");
    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn invalid_values_are_collected_with_provenance() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".jekyll-migrate.toml"),
        r#"
        [scan]
        extensions = []
        exclude = ["[unclosed"]
        [output]
        shadow_suffix = "../escape"
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("validation failure");
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.iter().count(), 3);
            let rendered = errors.to_string();
            assert!(rendered.contains("scan.extensions"));
            assert!(rendered.contains("scan.exclude"));
            assert!(rendered.contains("output.shadow_suffix"));
            assert!(rendered.contains("local config"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_keys_are_parse_errors() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".jekyll-migrate.toml"),
        "[callouts]\nnote = \"!!! aside\"\n",
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }));
}
