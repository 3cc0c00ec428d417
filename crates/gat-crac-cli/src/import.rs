//! The `import` subcommand.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use gat_crac::{load_dataset, ImportConfig, Pipeline};
use gat_secmodel::load_topology;
use tracing::info;

use crate::cli::ReportFormat;

pub struct ImportArgs {
    pub dataset: PathBuf,
    pub network: PathBuf,
    pub timestamp: String,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
}

/// Parse a snapshot timestamp. Offsets are honoured; bare dates and times
/// are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("invalid timestamp '{raw}', expected RFC 3339"))
}

pub fn run_import(args: &ImportArgs, config: ImportConfig) -> Result<()> {
    let snapshot = parse_timestamp(&args.timestamp)?;
    let dataset = load_dataset(&args.dataset)?;
    let topology = load_topology(&args.network)?;
    info!(
        documents = dataset.documents.len(),
        records = dataset.record_count(),
        elements = topology.len(),
        "importing at {snapshot}"
    );

    let run = Pipeline::new(&topology, config)
        .run(&dataset, snapshot)
        .context("import failed")?;
    info!("security model: {}", run.model.summary());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        ReportFormat::Text => {
            for line in run.report.render_text() {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "{}", run.report.summary())?;
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &run.report)?;
            writeln!(out)?;
        }
    }

    if let Some(path) = &args.output {
        write_model(path, &run.model)?;
        info!("security model written to {}", path.display());
    }
    Ok(())
}

fn write_model(path: &Path, model: &gat_secmodel::SecurityModel) -> Result<()> {
    let json = serde_json::to_string_pretty(model)?;
    fs::write(path, json).with_context(|| format!("writing security model '{}'", path.display()))
}
