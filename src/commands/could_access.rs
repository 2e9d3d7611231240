//! Who *could* log in.
//!
//! Reads the snapshot log written by `--log` (and its rotations) and reports
//! which accounts held an authorized key on each day of the window.
//!
//! # Usage
//!
//! ```bash
//! access-audit --could 30
//! access-audit --could 90 --csv --path /srv/audit/could.log
//! ```

use super::query::{read_log_family, render_query};
use crate::audit::snapshot::SnapshotLog;
use crate::audit::{QueryKind, QueryWindow};
use crate::config::AuditConfig;
use crate::report::OutputFormat;
use anyhow::Result;
use std::io::Write;

pub fn run(config: &AuditConfig, days: i64, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report(config, &QueryWindow::local(days)?, format, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Produce the report for an explicit window
pub fn report<W: Write>(
    config: &AuditConfig,
    window: &QueryWindow,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let generations = read_log_family(&config.snapshot_log, window.query_time)?;
    let log = SnapshotLog::from_generations(generations);
    render_query(QueryKind::Could, window, &log, &config.accounts, format, out)
}
