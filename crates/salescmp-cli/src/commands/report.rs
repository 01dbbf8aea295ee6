//! Report command - compare last month against earlier periods.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use tracing::info;

use salescmp_core::report::format_value;
use salescmp_core::{Comparison, ComparisonBuilder, PdfReport, Period, ReportRenderer, TextReport};

use super::config::load_config;
use super::extract::{ensure_records, extract, spinner};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Input statement (PDF, or a text file with --text)
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as already-extracted plain text
    #[arg(long)]
    text: bool,

    /// Reference date (YYYY-MM-DD); the report covers the month before it. Defaults to today
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: ReportFormat,

    /// Output file (PDF default: <Month>_comparison_report.pdf, others: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Landscape PDF report
    Pdf,
    /// Plain text tables
    Text,
    /// CSV, one line per comparison row
    Csv,
    /// JSON
    Json,
}

pub fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let pb = spinner()?;
    let result = extract(&args.input, args.text, &config, &pb)
        .inspect_err(|_| pb.finish_and_clear())?;
    pb.finish_and_clear();

    ensure_records(&result)?;

    let reference_date = args
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());
    let comparison = ComparisonBuilder::from_config(&config).build(&result.records, reference_date);

    info!(
        "{} comparison rows for {}",
        comparison.rows.len(),
        comparison.periods.label(Period::LastMonth)
    );
    if comparison.is_empty() {
        eprintln!(
            "{} No records for {}",
            style("!").yellow(),
            comparison.periods.label(Period::LastMonth)
        );
    }

    match args.format {
        ReportFormat::Pdf => {
            let bytes = PdfReport::from_config(&config.report).render(&comparison)?;
            let output_path = args
                .output
                .unwrap_or_else(|| PathBuf::from(comparison.report_file_name()));
            fs::write(&output_path, bytes)?;
            println!(
                "{} Report written to {}",
                style("✓").green(),
                output_path.display()
            );
        }
        format => {
            let output = match format {
                ReportFormat::Text => TextReport::new()
                    .with_minimum_marks(config.report.highlight_minimum)
                    .render_string(&comparison),
                ReportFormat::Csv => format_csv(&comparison)?,
                _ => serde_json::to_string_pretty(&comparison)?,
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
        }
    }

    Ok(())
}

fn format_csv(comparison: &Comparison) -> anyhow::Result<String> {
    let periods = &comparison.periods;
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![
        "weight_group".to_string(),
        "batch".to_string(),
        "product".to_string(),
    ];
    header.extend(Period::ALL.map(|p| format!("Q {}", periods.label(p))));
    header.extend(["DLY".to_string(), "DCY".to_string()]);
    header.extend(Period::ALL.map(|p| format!("V {}", periods.label(p))));
    header.extend(Period::ALL.map(|p| format!("min V {}", periods.label(p))));
    header.push("basmati".to_string());
    wtr.write_record(&header)?;

    for row in &comparison.rows {
        let mut record = vec![row.weight_group.clone(), row.batch.clone(), row.product.clone()];
        record.extend(Period::ALL.map(|p| row.figures(p).quantity.to_string()));
        record.extend([row.dly.to_string(), row.dcy.to_string()]);
        record.extend(Period::ALL.map(|p| format_value(row.figures(p).value)));
        record.extend(Period::ALL.map(|p| row.min_value.is_set(p).to_string()));
        record.push(row.is_basmati.to_string());
        wtr.write_record(&record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
