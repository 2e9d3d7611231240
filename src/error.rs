//! Error types shared by the audit pipeline.
//!
//! Library code returns [`AuditError`]; the command layer wraps these in
//! `anyhow` with extra context before they reach `main`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// Query durations must be a positive number of days
    #[error("invalid days value: {0} (positive integer required)")]
    InvalidDays(i64),

    /// The local zone has no valid instant on the window's first date
    #[error("cannot place the start of {0} in the local time zone")]
    NoStartOfDay(chrono::NaiveDate),

    /// The directory holding a rotated log family does not exist
    #[error("log directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log path pattern {pattern}: {message}")]
    Glob { pattern: String, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("account lookup failed: {0}")]
    AccountLookup(String),
}

impl AuditError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a file that no longer exists
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
