//! Configuration primitives and loader for jekyll-migrate.
//!
//! Settings are resolved from a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Only the scan scope and output naming are configurable; the rewrite
//! tables themselves are fixed in the converter.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".jekyll-migrate.toml";

const DEFAULT_EXTENSIONS: &[&str] = &["md"];
const DEFAULT_SHADOW_SUFFIX: &str = "converted";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub scan: ScanSettings,
    pub output: OutputSettings,
    pub sources: ConfigSources,
}

/// Which documents a run picks up.
#[derive(Clone, Debug)]
pub struct ScanSettings {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub exclude: PatternList,
}

impl ScanSettings {
    /// Case-insensitive suffix check against the configured extensions.
    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Naming of files produced by shadow runs.
#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub shadow_suffix: String,
}

/// Pattern plus compiled matcher helper.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    matcher: GlobMatcher,
}

impl Pattern {
    fn new(source: ConfigSource, value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                matcher: glob.compile_matcher(),
                original: value,
            }),
            Err(err) => Err(ConfigValidationError::new(
                Some(source),
                format!("invalid glob pattern '{value}': {err}"),
            )),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.matcher.is_match(path)
    }
}

/// Ordered list of glob patterns.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    fn new(patterns: Vec<Pattern>) -> Self {
        PatternList { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// True when any pattern matches `path`.
    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let (scan, output) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            scan,
            output,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    PartialConfig {
        root: Some(Located::new(PathBuf::from("."), source.clone())),
        extensions: Some(Located::new(
            DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            source.clone(),
        )),
        exclude: Some(Located::new(Vec::new(), source.clone())),
        shadow_suffix: Some(Located::new(DEFAULT_SHADOW_SUFFIX.to_string(), source)),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    root: Option<Located<PathBuf>>,
    extensions: Option<Located<Vec<String>>>,
    exclude: Option<Located<Vec<String>>>,
    shadow_suffix: Option<Located<String>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.extensions.is_some() {
            self.extensions = other.extensions;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        if other.shadow_suffix.is_some() {
            self.shadow_suffix = other.shadow_suffix;
        }
    }

    fn finalize(self) -> Result<(ScanSettings, OutputSettings), ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = || ConfigSource::default(PathBuf::from("."));

        let root_loc = self
            .root
            .unwrap_or_else(|| Located::new(PathBuf::from("."), fallback()));
        let root = resolve_path(&root_loc);

        let extensions_loc = self.extensions.unwrap_or_else(|| {
            Located::new(
                DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
                fallback(),
            )
        });
        if extensions_loc.value.is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(extensions_loc.source.clone()),
                    "at least one extension is required".into(),
                )
                .with_context("scan.extensions"),
            );
        }
        let mut extensions = Vec::new();
        for ext in &extensions_loc.value {
            let trimmed = ext.trim().trim_start_matches('.');
            if trimmed.is_empty() {
                errors.push(
                    ConfigValidationError::new(
                        Some(extensions_loc.source.clone()),
                        format!("extension '{ext}' is empty"),
                    )
                    .with_context("scan.extensions"),
                );
            } else {
                extensions.push(trimmed.to_string());
            }
        }

        let exclude = compile_patterns(
            self.exclude.unwrap_or_default(),
            "scan.exclude",
            &mut errors,
        );

        let suffix_loc = self
            .shadow_suffix
            .unwrap_or_else(|| Located::new(DEFAULT_SHADOW_SUFFIX.to_string(), fallback()));
        if let Err(message) = validate_shadow_suffix(&suffix_loc.value) {
            errors.push(
                ConfigValidationError::new(Some(suffix_loc.source.clone()), message)
                    .with_context("output.shadow_suffix"),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok((
            ScanSettings {
                root,
                extensions,
                exclude: PatternList::new(exclude),
            },
            OutputSettings {
                shadow_suffix: suffix_loc.value,
            },
        ))
    }
}

/// Reject suffixes that would escape the source directory or collide with it.
pub fn validate_shadow_suffix(suffix: &str) -> Result<(), String> {
    if suffix.trim().is_empty() {
        return Err("shadow suffix cannot be empty".into());
    }
    if suffix.contains('/') || suffix.contains('\\') {
        return Err(format!(
            "shadow suffix '{suffix}' must not contain path separators"
        ));
    }
    Ok(())
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

impl Default for Located<Vec<String>> {
    fn default() -> Self {
        Located::new(Vec::new(), ConfigSource::default(PathBuf::from(".")))
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

fn compile_patterns(
    located: Located<Vec<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for pattern in located.value {
        match Pattern::new(located.source.clone(), pattern) {
            Ok(compiled) => patterns.push(compiled),
            Err(err) => errors.push(err.with_context(context)),
        }
    }
    patterns
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    scan: Option<RawScan>,
    #[serde(default)]
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScan {
    root: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    shadow_suffix: Option<String>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();
        if let Some(scan) = self.scan {
            partial.root = scan.root.map(|root| Located::new(root, source.clone()));
            partial.extensions = scan
                .extensions
                .map(|extensions| Located::new(extensions, source.clone()));
            partial.exclude = scan
                .exclude
                .map(|exclude| Located::new(exclude, source.clone()));
        }
        if let Some(output) = self.output {
            partial.shadow_suffix = output
                .shadow_suffix
                .map(|suffix| Located::new(suffix, source.clone()));
        }
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_extension_ignores_case() {
        let scan = ScanSettings {
            root: PathBuf::from("."),
            extensions: vec!["md".into(), "markdown".into()],
            exclude: PatternList::default(),
        };
        assert!(scan.accepts_extension(Path::new("docs/Guide.MD")));
        assert!(scan.accepts_extension(Path::new("notes.markdown")));
        assert!(!scan.accepts_extension(Path::new("docs/guide.md.converted")));
        assert!(!scan.accepts_extension(Path::new("README")));
    }

    #[test]
    fn shadow_suffix_validation() {
        assert!(validate_shadow_suffix("converted").is_ok());
        assert!(validate_shadow_suffix("v2.converted").is_ok());
        assert!(validate_shadow_suffix("").is_err());
        assert!(validate_shadow_suffix("out/x").is_err());
    }
}
