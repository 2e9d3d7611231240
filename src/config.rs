//! Paths the audit reads from and writes to.
//!
//! Resolution order for each setting: command line option, then environment
//! variable, then the built-in default.

use crate::accounts::AccountDatabase;
use std::env;
use std::path::PathBuf;

/// Default prefix of the rotated `wtmp` family
pub const DEFAULT_WTMP_PREFIX: &str = "/var/log/wtmp";
/// Default "could access" snapshot log
pub const DEFAULT_SNAPSHOT_LOG: &str = "/var/log/could.log";
/// Default key holder file
pub const DEFAULT_KEYS_FILE: &str = "/var/lib/misc/ssh-rsa-shadow";

pub const WTMP_ENV: &str = "ACCESS_AUDIT_WTMP";
pub const SNAPSHOT_LOG_ENV: &str = "ACCESS_AUDIT_SNAPSHOT_LOG";
pub const KEYS_FILE_ENV: &str = "ACCESS_AUDIT_KEYS_FILE";
pub const PASSWD_FILE_ENV: &str = "ACCESS_AUDIT_PASSWD_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Path prefix of the rotated login accounting files
    pub wtmp_prefix: PathBuf,
    /// Snapshot log written by `--log` and read (with its rotations) by `--could`
    pub snapshot_log: PathBuf,
    /// Colon delimited SSH key holder file
    pub keys_file: PathBuf,
    pub accounts: AccountDatabase,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            wtmp_prefix: PathBuf::from(DEFAULT_WTMP_PREFIX),
            snapshot_log: PathBuf::from(DEFAULT_SNAPSHOT_LOG),
            keys_file: PathBuf::from(DEFAULT_KEYS_FILE),
            accounts: AccountDatabase::Live,
        }
    }
}

impl AuditConfig {
    /// Build a configuration from command line values with environment and
    /// default fallbacks.
    pub fn from_options(
        wtmp_prefix: Option<&str>,
        snapshot_log: Option<&str>,
        keys_file: Option<&str>,
        passwd_file: Option<&str>,
    ) -> Self {
        let defaults = Self::default();

        let accounts = option_or_env(passwd_file, PASSWD_FILE_ENV)
            .map_or(defaults.accounts, AccountDatabase::File);

        Self {
            wtmp_prefix: option_or_env(wtmp_prefix, WTMP_ENV).unwrap_or(defaults.wtmp_prefix),
            snapshot_log: option_or_env(snapshot_log, SNAPSHOT_LOG_ENV)
                .unwrap_or(defaults.snapshot_log),
            keys_file: option_or_env(keys_file, KEYS_FILE_ENV).unwrap_or(defaults.keys_file),
            accounts,
        }
    }
}

fn option_or_env(value: Option<&str>, var: &str) -> Option<PathBuf> {
    value
        .map(str::to_string)
        .or_else(|| env::var(var).ok())
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}
