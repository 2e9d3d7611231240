//! Shared query pipeline for the `--did` and `--could` commands.

use crate::accounts::DisplayResolvable;
use crate::audit::{aggregate, merge, select_logs, QueryKind, QueryWindow, RecordSource};
use crate::report::json::write_json;
use crate::report::matrix::write_matrix;
use crate::report::text::write_text;
use crate::report::{OutputFormat, Report};
use crate::utils::format::format_number;
use crate::utils::reader::read_all;
use anyhow::{Context, Result};
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Select the log family's relevant generations and read each of them.
///
/// Generations are returned in selection order, one buffer per file, for
/// the record source to decode independently.
pub fn read_log_family(prefix: &Path, query_time: f64) -> Result<Vec<Vec<u8>>> {
    let files = select_logs(prefix, query_time)
        .with_context(|| format!("Failed to select logs for {}", prefix.display()))?;

    if files.is_empty() {
        warn!("No log files matching {}* changed in the window", prefix.display());
    }
    read_generations(&files)
}

/// Read every file in `files`.
///
/// A generation rotated away between selection and read is skipped; any
/// other read failure aborts the query.
pub fn read_generations(files: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    let mut generations = Vec::with_capacity(files.len());
    let mut total = 0;
    for (idx, file) in files.iter().enumerate() {
        info!("[{}/{}] Reading: {}", idx + 1, files.len(), file.display());
        match read_all(file) {
            Ok(bytes) => {
                total += bytes.len();
                generations.push(bytes);
            }
            Err(err) if err.is_missing_file() => {
                warn!("Skipping {}: rotated away before it could be read", file.display());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", file.display()));
            }
        }
    }

    info!(
        "Read {} bytes from {} files",
        format_number(total),
        generations.len()
    );
    Ok(generations)
}

/// Aggregate, merge and render one query
pub fn render_query<S, R, W>(
    kind: QueryKind,
    window: &QueryWindow,
    source: &S,
    resolver: &R,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    S: RecordSource + ?Sized,
    R: DisplayResolvable + ?Sized,
    W: Write,
{
    let aggregation = aggregate(source.entries(), window.query_time);
    let intervals = merge(&aggregation.records);
    info!(
        "{} users, {} active days, {} intervals",
        aggregation.users.len(),
        aggregation.records.len(),
        intervals.len()
    );

    let report = Report::new(kind, window, &aggregation, &intervals);
    match format {
        OutputFormat::Text => write_text(&report, resolver, out).context("Failed to write report")?,
        OutputFormat::Csv => write_matrix(&report, resolver, out).context("Failed to write CSV")?,
        OutputFormat::Json => write_json(&report, resolver, out).context("Failed to write JSON")?,
    }
    Ok(())
}
