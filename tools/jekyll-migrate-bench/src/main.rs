use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use jekyll_migrate_config::{Config, LoadOptions};
use jekyll_migrate_convert::convert;
use jekyll_migrate_ops::{MigrateOptions, Operations, RunMode};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Benchmark harness for jekyll-migrate conversions"
)]
struct Args {
    /// Docs tree to convert (never modified; runs are dry-run only)
    #[arg(long, value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Number of warm-up iterations (not counted in results)
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Number of measured iterations
    #[arg(long, default_value_t = 3)]
    iterations: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.iterations > 0, "--iterations must be at least 1");

    let config = Config::load(LoadOptions::default())?;
    let ops = Operations::new(config);

    let discovery = ops
        .migrate(dry_run(&args.path))
        .with_context(|| format!("failed to scan '{}'", args.path.display()))?;
    let documents: Vec<String> = discovery
        .report
        .files
        .iter()
        .filter_map(|file| fs::read_to_string(discovery.report.root.join(&file.path)).ok())
        .collect();
    println!(
        "benchmarking {} documents under {}\n",
        documents.len(),
        discovery.report.root.display()
    );

    let convert_result = benchmark("convert-in-memory", args.warmup, args.iterations, || {
        for doc in &documents {
            let _ = convert(doc);
        }
        Ok(())
    })?;

    let migrate_result = benchmark("migrate-dry-run", args.warmup, args.iterations, || {
        ops.migrate(dry_run(&args.path))?;
        Ok(())
    })?;

    print_summary(&[convert_result, migrate_result]);
    Ok(())
}

fn dry_run(path: &Path) -> MigrateOptions {
    MigrateOptions {
        root: Some(path.to_path_buf()),
        mode: RunMode::DryRun,
        ..MigrateOptions::default()
    }
}

struct BenchResult {
    name: String,
    iterations: usize,
    average: Duration,
    median: Duration,
}

fn benchmark<F>(name: &str, warmup: usize, iterations: usize, mut f: F) -> Result<BenchResult>
where
    F: FnMut() -> Result<()>,
{
    for _ in 0..warmup {
        f()?;
    }

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        f()?;
        samples.push(start.elapsed());
    }

    samples.sort();
    let total = samples
        .iter()
        .copied()
        .fold(Duration::ZERO, |acc, sample| acc + sample);
    let average = total / (iterations as u32);
    let median = samples[samples.len() / 2];

    Ok(BenchResult {
        name: name.to_string(),
        iterations,
        average,
        median,
    })
}

fn print_summary(results: &[BenchResult]) {
    println!("jekyll-migrate benchmark results:\n");
    for result in results {
        println!(
            "- {}: avg {:?} (median {:?}) over {} iterations",
            result.name, result.average, result.median, result.iterations
        );
    }
}
