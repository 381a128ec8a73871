//! Validate command - check a single invoice text against the FTA rules.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::info;

use ftav_core::export::ExportRow;
use ftav_core::{COLUMNS, DocumentResult, RawDocument, Severity, ValidationSession};

use super::RuleOverrides;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Plain-text invoice file, or "-" to read standard input
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(flatten)]
    overrides: RuleOverrides,
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

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path, &args.overrides)?;

    let document = read_document(&args.input).await?;
    let session = ValidationSession::new(&config);
    let id = session.submit(std::slice::from_ref(&document));

    let batch = session
        .store()
        .get(&id)
        .context("Submitted batch disappeared from the session")?;
    let result = batch
        .documents
        .first()
        .context("Submitted batch is empty")?;

    info!(
        "Validated {} in {:?}: {}",
        document.name,
        start.elapsed(),
        result.verdict.status()
    );

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Csv => format_csv(&ExportRow::new(&id, result))?,
        OutputFormat::Text => format_text(result),
    };

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

async fn read_document(input: &Path) -> anyhow::Result<RawDocument> {
    if input == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(RawDocument::new("stdin", text));
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("invoice");

    Ok(RawDocument::new(name, String::from_utf8_lossy(&bytes)))
}

fn format_csv(row: &ExportRow) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(COLUMNS)?;
    wtr.write_record(row.values())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &DocumentResult) -> String {
    let fields = &result.fields;
    let verdict = &result.verdict;
    let mut output = String::new();

    let status = if verdict.is_approved() {
        style(verdict.status().label()).green()
    } else {
        style(verdict.status().label()).red()
    };
    output.push_str(&format!("Document: {}\n", result.name));
    output.push_str(&format!("Status: {}\n", status));
    if !verdict.derived_type().label().is_empty() {
        output.push_str(&format!("Type: {}\n", verdict.derived_type().label()));
    }
    output.push('\n');

    let show = |label: &str, value: Option<String>| {
        format!("  {:<15} {}\n", label, value.unwrap_or_else(|| "-".to_string()))
    };
    output.push_str(&show("TRN:", fields.trn.clone()));
    output.push_str(&show("Invoice number:", fields.invoice_number.clone()));
    output.push_str(&show(
        "Invoice date:",
        fields.invoice_date.as_ref().map(|d| d.raw.clone()),
    ));
    output.push_str(&show("Supplier:", fields.supplier.clone()));
    output.push_str(&show("Customer:", fields.customer.clone()));
    output.push_str(&show("VAT rate:", fields.vat_rate.clone()));
    output.push_str(&show(
        "VAT amount:",
        fields.vat_amount.map(|a| format!("AED {:.2}", a)),
    ));
    output.push_str(&show(
        "Total amount:",
        fields.total_amount.map(|a| format!("AED {:.2}", a)),
    ));
    output.push('\n');

    output.push_str("Remarks:\n");
    for remark in verdict.remarks() {
        let marker = match remark.severity {
            Severity::Hard => style("✗").red(),
            Severity::Info => style("ℹ").blue(),
        };
        output.push_str(&format!("  {} {}\n", marker, remark.message));
    }

    output
}
