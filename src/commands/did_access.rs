//! Who *did* log in.
//!
//! Reads every `wtmp` generation modified inside the window, decodes the
//! login accounting records and reports the users with sessions on each day.
//!
//! # Usage
//!
//! ```bash
//! # Last 31 days (the default)
//! access-audit --did
//!
//! # Last week, as a presence matrix
//! access-audit --did 7 --csv
//!
//! # Records copied from another host
//! access-audit --did 30 --path /srv/evidence/web01/wtmp
//! ```

use super::query::{read_log_family, render_query};
use crate::audit::wtmp::WtmpLog;
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
    let generations = read_log_family(&config.wtmp_prefix, window.query_time)?;
    let log = WtmpLog::from_generations(generations);
    render_query(QueryKind::Did, window, &log, &config.accounts, format, out)
}
