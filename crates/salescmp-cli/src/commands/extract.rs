//! Extract command - pull monthly product records from a single statement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use salescmp_core::parser::RECORDS_PER_BLOCK;
use salescmp_core::pdf::split_lines;
use salescmp_core::{
    ExtractionResult, ProductRecord, RecordParser, SalesConfig, StatementParser, extract_records,
};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input statement (PDF, or a text file with --text)
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as already-extracted plain text
    #[arg(long)]
    text: bool,

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
    /// Plain text tables
    Text,
}

/// Column names of a record in CSV output.
pub const RECORD_COLUMNS: [&str; 8] = [
    "product",
    "batch",
    "weight_group",
    "month",
    "month_num",
    "year",
    "quantity",
    "value",
];

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = spinner()?;
    let result = extract(&args.input, args.text, &config, &pb)
        .inspect_err(|_| pb.finish_and_clear())?;
    pb.finish_and_clear();

    ensure_records(&result)?;

    let output = format_records(&result.records, args.format)?;

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

    eprintln!(
        "{} {} products, {} records in {}ms",
        style("ℹ").blue(),
        result.products,
        result.records.len(),
        result.processing_time_ms
    );
    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Spinner shown while a statement is read and parsed.
pub fn spinner() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    Ok(pb)
}

/// Read `path` and run the record parser over its lines.
pub fn extract(
    path: &Path,
    text: bool,
    config: &SalesConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ExtractionResult> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    info!("Processing file: {}", path.display());

    if text {
        pb.set_message("Reading text...");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let lines = split_lines(&content, config.pdf.normalize_unicode);

        pb.set_message("Parsing records...");
        Ok(StatementParser::from_config(&config.parser).parse(&lines))
    } else {
        pb.set_message("Extracting PDF text...");
        let data = fs::read(path)?;
        extract_records(&data, config).with_context(|| format!("Failed to extract {}", path.display()))
    }
}

/// Fail when no product block was found.
pub fn ensure_records(result: &ExtractionResult) -> anyhow::Result<()> {
    if result.is_empty() {
        anyhow::bail!("No data extracted. Please check the PDF format.");
    }
    Ok(())
}

/// CSV fields of a record, in `RECORD_COLUMNS` order.
pub fn record_fields(record: &ProductRecord) -> [String; 8] {
    [
        record.product.clone(),
        record.batch.clone(),
        record.weight_group.clone(),
        record.month.to_string(),
        record.month_num.to_string(),
        record.year.to_string(),
        record.quantity.to_string(),
        record.value.to_string(),
    ]
}

fn format_records(records: &[ProductRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[ProductRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(RECORD_COLUMNS)?;
    for record in records {
        wtr.write_record(record_fields(record))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// One table per product block: a row per month, both years side by side.
fn format_text(records: &[ProductRecord]) -> String {
    let mut output = String::new();

    for block in records.chunks(RECORDS_PER_BLOCK) {
        let Some(first) = block.first() else { continue };

        output.push_str(&format!("Product: {}\n", first.product));
        output.push_str(&format!("  Batch: {}\n", first.batch));
        output.push_str(&format!("  Weight group: {}\n", first.weight_group));

        if let [prior, current, ..] = block {
            output.push_str(&format!(
                "  {:<10} {:>10} {:>12} {:>10} {:>12}\n",
                "Month",
                format!("Q {}", prior.year),
                format!("V {}", prior.year),
                format!("Q {}", current.year),
                format!("V {}", current.year),
            ));
        }
        for pair in block.chunks(2) {
            if let [prior, current] = pair {
                output.push_str(&format!(
                    "  {:<10} {:>10} {:>12} {:>10} {:>12}\n",
                    prior.month.to_string(),
                    prior.quantity,
                    prior.value.to_string(),
                    current.quantity,
                    current.value.to_string(),
                ));
            }
        }
        output.push('\n');
    }

    output
}
