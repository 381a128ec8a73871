//! Batch command - validate groups of invoice text files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use ftav_core::{Batch, COLUMNS, ExportRow, RawDocument, ValidationSession};

use super::RuleOverrides;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob patterns; the files of each pattern form one batch
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the export of all batches to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Delete the n-th batch (1-based) before exporting
    #[arg(long, value_name = "N")]
    drop: Option<usize>,

    /// Number of files read concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    #[command(flatten)]
    overrides: RuleOverrides,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of rows
    Json,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path, &args.overrides)?;

    let groups = args
        .inputs
        .iter()
        .map(|pattern| expand(pattern))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let total: usize = groups.iter().map(Vec::len).sum();

    println!(
        "{} Found {} files in {} batches",
        style("ℹ").blue(),
        total,
        groups.len()
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let session = ValidationSession::new(&config);
    let limit = Arc::new(Semaphore::new(args.jobs.max(1)));

    for files in groups {
        let documents = read_documents(files, &limit, &pb).await?;
        session.submit(&documents);
    }
    pb.finish_and_clear();

    if let Some(n) = args.drop {
        let ids = session.store().batch_ids();
        let Some(id) = n.checked_sub(1).and_then(|i| ids.get(i)) else {
            anyhow::bail!("Cannot drop batch {}: only {} batches exist", n, ids.len());
        };
        session.delete_batch(id);
        println!("{} Dropped batch {}", style("✓").green(), id);
    }

    let batches = session.store().batches();
    for batch in &batches {
        print_batch_summary(batch);
    }

    if let Some(output_path) = &args.output {
        let rows = session.rows();
        match args.format {
            ExportFormat::Csv => write_csv(output_path, &rows)?,
            ExportFormat::Json => std::fs::write(output_path, serde_json::to_string_pretty(&rows)?)?,
        }
        println!(
            "{} Exported {} rows to {}",
            style("✓").green(),
            rows.len(),
            output_path.display()
        );
    }

    let documents: usize = batches.iter().map(Batch::len).sum();
    let approved: usize = batches.iter().map(Batch::approved).sum();
    println!();
    println!(
        "{} Validated {} documents in {:?}",
        style("✓").green(),
        documents,
        start.elapsed()
    );
    println!(
        "   {} approved, {} not approved",
        style(approved).green(),
        style(documents - approved).red()
    );

    Ok(())
}

/// Files matched by one pattern, sorted for a stable submission order.
fn expand(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    files.sort();
    Ok(files)
}

/// Read a group of files concurrently, keeping their order.
///
/// An unreadable file becomes a document with empty text.
async fn read_documents(
    files: Vec<PathBuf>,
    limit: &Arc<Semaphore>,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<RawDocument>> {
    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        let limit = Arc::clone(limit);
        tasks.spawn(async move {
            let _permit = limit.acquire_owned().await;
            let text = match tokio::fs::read(&path).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    String::new()
                }
            };
            (index, RawDocument::new(display_name(&path), text))
        });
    }

    let mut documents = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, document) = joined?;
        debug!("Read {} ({} bytes)", document.name, document.text.len());
        documents.push((index, document));
        pb.inc(1);
    }

    documents.sort_by_key(|(index, _)| *index);
    Ok(documents.into_iter().map(|(_, doc)| doc).collect())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn print_batch_summary(batch: &Batch) {
    println!(
        "{} Batch {}: {} documents, {} approved",
        style("•").cyan(),
        style(&batch.id).bold(),
        batch.len(),
        batch.approved()
    );

    for doc in batch.documents.iter().filter(|d| !d.verdict.is_approved()) {
        println!(
            "    {} {}: {}",
            style("✗").red(),
            doc.name,
            doc.verdict.hard_messages().join(", ")
        );
    }
}

fn write_csv(path: &Path, rows: &[ExportRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.write_record(row.values())?;
    }

    wtr.flush()?;
    Ok(())
}
