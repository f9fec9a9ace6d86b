//! Batch command - extract many invoices into one CSV.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use fuelx_core::invoice::rules::format_amount;
use fuelx_core::{FuelxConfig, InputFile, Pipeline, suggested_filename, to_csv};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output CSV file (default: rifornimenti_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the batch summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of parallel workers (overrides config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(jobs) = args.jobs {
        config.batch.jobs = jobs.max(1);
    }

    let inputs = collect_inputs(&args.input, &config)?;
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        inputs.len()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {} invoices...", inputs.len()));

    let export = config.export.clone();
    let pipeline = Pipeline::new(config);
    let result = tokio::task::spawn_blocking(move || pipeline.process_batch(&inputs)).await??;
    pb.finish_and_clear();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        result.outcomes().len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(result.processed_files()).green(),
        style(result.failed_files()).red()
    );
    println!(
        "   {} refuelings, EUR {}",
        result.total_records(),
        format_amount(result.total_amount(), 2, ',')
    );

    if result.failed_files() > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for (file, error) in result.failures() {
            println!("  - {} [{}]: {}", file, error.kind(), error);
        }
    }

    if result.rejected_rows() > 0 {
        println!();
        println!("{}", style("Files with skipped rows:").yellow());
        for (file, rejected) in result.partial_files() {
            println!("  - {}: {} rows did not match the layout", file, rejected);
        }
    }

    if let Some(summary_path) = &args.summary {
        fs::write(summary_path, serde_json::to_string_pretty(&result.summary())?)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if result.total_records() == 0 {
        anyhow::bail!("No refueling records extracted from {} files", result.outcomes().len());
    }

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(suggested_filename(Local::now().naive_local())));
    fs::write(&output_path, to_csv(&result, &export)?)?;
    println!(
        "{} CSV written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Expand the pattern, keep PDFs and enforce the batch limits.
fn collect_inputs(pattern: &str, config: &FuelxConfig) -> anyhow::Result<Vec<InputFile>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for path in glob(pattern)?.filter_map(|r| r.ok()) {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            paths.push(path);
        } else {
            warn!("Skipping non-PDF file {}", path.display());
        }
    }

    if paths.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", pattern);
    }

    if paths.len() > config.batch.max_files {
        anyhow::bail!(
            "{} files matched, at most {} are allowed per batch",
            paths.len(),
            config.batch.max_files
        );
    }

    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        let size = fs::metadata(&path)?.len();
        if size > config.batch.max_file_size_bytes {
            anyhow::bail!(
                "{} is {} bytes, above the limit of {} bytes",
                path.display(),
                size,
                config.batch.max_file_size_bytes
            );
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        debug!("Reading {}", path.display());
        inputs.push(InputFile::new(name, fs::read(&path)?));
    }

    Ok(inputs)
}
