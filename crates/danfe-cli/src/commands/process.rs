//! Process command - extract records from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use danfe_core::engine::{DanfeParser, DocumentResult};
use danfe_core::models::config::DanfexConfig;
use danfe_core::models::record::ProductRecord;

use crate::pdf;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or pre-extracted .txt)
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
    /// Full document result as JSON
    Json,
    /// Records as CSV rows
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = if let Some(path) = config_path {
        DanfexConfig::from_file(std::path::Path::new(path))?
    } else {
        DanfexConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let (identifier, text) = pdf::read_document(&args.input, &config.pdf)?;

    let parser = DanfeParser::with_config(config.extraction);
    let result = parser.parse_document(&identifier, &text);

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_result(&result, args.format)?;

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

    println!(
        "{} {} record(s), {} skipped line(s)",
        style("ℹ").blue(),
        result.records.len(),
        result.skipped.len()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a document result in the chosen output format.
pub fn format_result(result: &DocumentResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => records_to_csv(&result.records),
        OutputFormat::Text => Ok(format_text_summary(result)),
    }
}

/// Serialize records as CSV with a header row.
pub fn records_to_csv(records: &[ProductRecord]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn format_text_summary(result: &DocumentResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("Emissor:      {}\n", result.metadata.emissor));
    out.push_str(&format!("Destinatário: {}\n", result.metadata.destinatario));
    out.push_str(&format!(
        "Emissão:      {}\n",
        result
            .metadata
            .data_emissao
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    ));
    out.push_str(&format!("Chave:        {}\n", result.metadata.chave_acesso));
    out.push_str(&format!(
        "Total:        {}\n\n",
        result.metadata.valor_total_nota
    ));

    for record in &result.records {
        out.push_str(&format!(
            "{:<10} {:<40} {:>10} {} x {:>10} = {:>12}\n",
            record.codigo,
            record.descricao,
            record.qtd,
            record.unid,
            record.vlr_unit,
            record.vlr_total
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_header_and_one_row_per_record() {
        let parser = DanfeParser::new();
        let result = parser.parse_document(
            "nfe.pdf",
            "DADOS DO PRODUTO/SERVIÇO\n123456 PARAFUSO M6 7891 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00\n",
        );

        let csv = records_to_csv(&result.records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("arquivo,data_emissao,codigo,descricao,ncm"));
        assert!(lines[1].contains("PARAFUSO M6"));
    }

    #[test]
    fn empty_record_set_yields_header_only_csv() {
        let csv = records_to_csv(&[]).unwrap();
        assert!(csv.is_empty() || csv.lines().count() <= 1);
    }
}
