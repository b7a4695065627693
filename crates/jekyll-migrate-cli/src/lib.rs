use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use jekyll_migrate_config::{Config, LoadOptions};
use jekyll_migrate_format::{render, RenderOptions, ReportFormat};
use jekyll_migrate_ops::{MigrateOptions, OperationError, Operations, RunMode};

mod logging;

pub use logging::{init_logging, verbosity_to_directive, LOG_ENV_VAR};

const EXIT_ROOT_NOT_FOUND: i32 = 2;
const EXIT_INVALID_CONFIG: i32 = 3;
const EXIT_IO: i32 = 4;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut load = LoadOptions::default();
    if let Some(path) = &cli.config {
        load = load.with_override_path(path);
    }
    let config = match Config::load(load) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return Ok(EXIT_INVALID_CONFIG);
        }
    };
    tracing::debug!(layers = config.sources.layers.len(), "configuration loaded");

    let ops = Operations::new(config);
    handle_migrate(&ops, cli)
}

fn handle_migrate(ops: &Operations, cli: Cli) -> Result<i32> {
    let Cli {
        root,
        files,
        mode,
        suffix,
        diff,
        format,
        quiet,
        ..
    } = cli;

    let mode = match mode.unwrap_or(ModeValue::InPlace) {
        ModeValue::InPlace => RunMode::InPlace,
        ModeValue::Shadow => RunMode::Shadow,
        ModeValue::DryRun => RunMode::DryRun,
    };

    let format = match format.unwrap_or(FormatValue::Plain) {
        FormatValue::Plain => ReportFormat::Plain,
        FormatValue::Json => ReportFormat::Json,
    };

    let options = MigrateOptions {
        root,
        files,
        mode,
        shadow_suffix: suffix,
        diff,
    };

    match ops.migrate(options) {
        Ok(outcome) => {
            let rendered = render(&outcome.report, RenderOptions { format, quiet })?;
            emit(&rendered);
            Ok(outcome.exit_code)
        }
        Err(err @ OperationError::RootNotFound { .. }) => {
            eprintln!("{err}");
            Ok(EXIT_ROOT_NOT_FOUND)
        }
        Err(OperationError::InvalidInput(message)) => {
            eprintln!("{message}");
            Ok(EXIT_INVALID_CONFIG)
        }
        Err(OperationError::Io { path, source }) => {
            eprintln!("I/O error on {}: {}", path.display(), source);
            Ok(EXIT_IO)
        }
    }
}

fn emit(content: &str) {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Migrate Jekyll liquid markup to admonition-flavoured Markdown"
)]
struct Cli {
    /// Docs root to walk (defaults to `scan.root` from config)
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,
    /// Convert only the listed documents instead of walking the root
    #[arg(long = "file", value_name = "PATH", action = ArgAction::Append)]
    files: Vec<PathBuf>,
    /// Where converted output goes (in-place, shadow, or dry-run)
    #[arg(long, value_enum)]
    mode: Option<ModeValue>,
    /// Suffix for shadow copies (`guide.md` -> `guide.md.<SUFFIX>`)
    #[arg(long = "suffix", value_name = "SUFFIX")]
    suffix: Option<String>,
    /// Print unified diffs for changed documents
    #[arg(long)]
    diff: bool,
    /// Report format (plain or json)
    #[arg(long, value_enum)]
    format: Option<FormatValue>,
    /// Only print failures and the summary
    #[arg(short = 'q', long)]
    quiet: bool,
    /// Use this config file on top of discovered ones
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeValue {
    InPlace,
    Shadow,
    DryRun,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    Plain,
    Json,
}
