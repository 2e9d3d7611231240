//! Record who *could* log in right now.
//!
//! Cross-references the SSH key holder file against the account database and
//! appends one row to the snapshot log. Meant to run from cron; `--could`
//! reports over the accumulated rows.
//!
//! # Usage
//!
//! ```bash
//! # Daily snapshot
//! 0 6 * * * /usr/local/bin/access-audit --log
//!
//! # Alternative log location
//! access-audit --log --path /srv/audit/could.log
//! ```

use crate::accounts::{read_key_holders, AccountDatabase};
use crate::audit::snapshot::{append_row, SnapshotRow};
use crate::config::AuditConfig;
use anyhow::{Context, Result};
use log::info;
use std::collections::HashSet;

pub fn run(config: &AuditConfig) -> Result<()> {
    let row = log_could_access(config)?;
    info!(
        "Logged {} accounts with keys to {}",
        row.users.len(),
        config.snapshot_log.display()
    );
    Ok(())
}

/// Append the current key holders to the snapshot log and return the row
pub fn log_could_access(config: &AuditConfig) -> Result<SnapshotRow> {
    let holders = read_key_holders(&config.keys_file).with_context(|| {
        format!(
            "Failed to read key holders from {}",
            config.keys_file.display()
        )
    })?;

    let users = accounts_with_keys(&config.accounts, &holders)?;
    let row = SnapshotRow::now(users);

    append_row(&config.snapshot_log, &row).with_context(|| {
        format!(
            "Failed to append to snapshot log {}",
            config.snapshot_log.display()
        )
    })?;
    Ok(row)
}

/// Account names holding a key, in database order, each listed once
pub fn accounts_with_keys(
    accounts: &AccountDatabase,
    holders: &HashSet<String>,
) -> Result<Vec<String>> {
    let entries = accounts
        .list_all()
        .context("Failed to list the account database")?;

    let mut seen = HashSet::new();
    Ok(entries
        .into_iter()
        .filter(|entry| holders.contains(&entry.name))
        .filter(|entry| seen.insert(entry.name.clone()))
        .map(|entry| entry.name)
        .collect())
}
