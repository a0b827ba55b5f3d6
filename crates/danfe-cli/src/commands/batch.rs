//! Batch processing command for multiple documents.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use danfe_core::batch::{collect_records, parse_documents};
use danfe_core::engine::{DanfeParser, DocumentResult};
use danfe_core::models::config::DanfexConfig;

use super::process::{OutputFormat, format_result, records_to_csv};
use crate::pdf;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-document results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each document
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write all records of the batch to one concatenated CSV
    #[arg(long)]
    merged: Option<PathBuf>,

    /// Also generate a per-document summary CSV
    #[arg(long)]
    summary: bool,

    /// Abort on the first unreadable file instead of skipping it
    #[arg(long)]
    fail_fast: bool,
}

/// One row of the batch summary.
#[derive(Serialize)]
struct SummaryRow<'a> {
    arquivo: &'a str,
    records: usize,
    skipped: usize,
    warnings: String,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = if let Some(path) = config_path {
        DanfexConfig::from_file(std::path::Path::new(path))?
    } else {
        DanfexConfig::default()
    };

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // Read document texts up front; extraction itself runs in parallel.
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut documents: Vec<(String, String)> = Vec::with_capacity(files.len());
    let mut unreadable: Vec<(PathBuf, String)> = Vec::new();

    for path in &files {
        match pdf::read_document(path, &config.pdf) {
            Ok(pair) => documents.push(pair),
            Err(e) => {
                if args.fail_fast {
                    anyhow::bail!("Failed to read {}: {}", path.display(), e);
                }
                warn!("Failed to read {}: {}", path.display(), e);
                unreadable.push((path.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("read");

    let parser = DanfeParser::with_config(config.extraction);
    let results = parse_documents(&parser, &documents);

    // Per-document outputs; results come back in input order, so pairing
    // with the document list by position is sound.
    if let Some(ref output_dir) = args.output_dir {
        for ((identifier, _), result) in documents.iter().zip(&results) {
            let stem = identifier
                .rsplit_once('.')
                .map(|(s, _)| s)
                .unwrap_or(identifier);

            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };
            let output_path = output_dir.join(format!("{}.{}", stem, extension));
            fs::write(&output_path, format_result(result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Concatenated record table across the whole batch, input order.
    let total_records: usize = results.iter().map(|r| r.records.len()).sum();
    let total_skipped: usize = results.iter().map(|r| r.skipped.len()).sum();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));
        write_summary(&summary_path, &documents, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if let Some(ref merged_path) = args.merged {
        let records = collect_records(results);
        fs::write(merged_path, records_to_csv(&records)?)?;
        println!(
            "{} Merged records written to {}",
            style("✓").green(),
            merged_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        documents.len(),
        start.elapsed()
    );
    println!(
        "   {} records, {} skipped lines, {} unreadable files",
        style(total_records).green(),
        style(total_skipped).yellow(),
        style(unreadable.len()).red()
    );

    if !unreadable.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for (path, error) in &unreadable {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

fn write_summary(
    path: &PathBuf,
    documents: &[(String, String)],
    results: &[DocumentResult],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for ((identifier, _), result) in documents.iter().zip(results) {
        writer.serialize(SummaryRow {
            arquivo: identifier,
            records: result.records.len(),
            skipped: result.skipped.len(),
            warnings: result.warnings.join("; "),
        })?;
    }

    writer.flush()?;
    Ok(())
}
