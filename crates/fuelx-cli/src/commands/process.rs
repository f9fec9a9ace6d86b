//! Process command - extract refueling records from a single invoice.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fuelx_core::invoice::rules::format_amount;
use fuelx_core::{BatchResult, ExtractedInvoice, InputFile, Pipeline, to_csv};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF invoice
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let size = fs::metadata(&args.input)?.len();
    if size > config.batch.max_file_size_bytes {
        anyhow::bail!(
            "{} is {} bytes, above the limit of {} bytes",
            args.input.display(),
            size,
            config.batch.max_file_size_bytes
        );
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting invoice...");

    let name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("invoice.pdf")
        .to_string();
    let file = InputFile::new(name, fs::read(&args.input)?);

    let pipeline = Pipeline::new(config);
    let outcome = pipeline.process_file(&file);
    pb.finish_and_clear();

    let output = match (&outcome.result, args.format) {
        (Err(err), _) => anyhow::bail!("{} [{}]", err, err.kind()),
        (Ok(invoice), OutputFormat::Json) => serde_json::to_string_pretty(invoice)?,
        (Ok(invoice), OutputFormat::Text) => format_text(&outcome.file_name, invoice),
        (Ok(_), OutputFormat::Csv) => {
            let result = BatchResult::new(vec![outcome.clone()]);
            String::from_utf8(to_csv(&result, &pipeline.config().export)?)?
        }
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_text(file_name: &str, invoice: &ExtractedInvoice) -> String {
    let mut output = String::new();
    let header = &invoice.header;

    output.push_str(&format!("File: {}\n", file_name));
    output.push_str(&format!("Provider: {}\n", invoice.provider));
    if let Some(number) = &header.invoice_number {
        output.push_str(&format!("Invoice: {}\n", number));
    }
    if let Some(date) = header.invoice_date {
        output.push_str(&format!("Date: {}\n", date.format("%d/%m/%Y")));
    }
    if let Some(customer) = &header.customer {
        output.push_str(&format!("Customer: {}\n", customer));
    }
    if let Some(total) = header.total_gross {
        output.push_str(&format!("Invoice total: EUR {}\n", format_amount(total, 2, ',')));
    }
    output.push('\n');

    output.push_str(&format!("Refuelings ({}):\n", invoice.records.len()));
    for record in &invoice.records {
        output.push_str(&format!(
            "  {} {} {:>8} l  EUR {:>9}  {}\n",
            record.refuel_date().format("%d/%m/%Y"),
            record.plate(),
            format_amount(record.quantity(), 2, ','),
            format_amount(record.total_amount(), 2, ','),
            record.location()
        ));
    }

    if invoice.rejected_rows > 0 {
        output.push_str(&format!(
            "\nSkipped rows: {} (did not match the {} layout)\n",
            invoice.rejected_rows, invoice.provider
        ));
    }

    output
}
