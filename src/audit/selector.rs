//! Rotated log file selection.
//!
//! A log family is every file whose name starts with a common prefix:
//! `/var/log/wtmp`, `/var/log/wtmp.1`, `/var/log/wtmp.2.gz`, ... A rotated
//! generation is never written after rotation, so one last modified before
//! the window starts cannot hold in-window records and is skipped.

use crate::error::AuditError;
use crate::utils::time::epoch_seconds;
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Files of the `prefix` family modified after `query_time`, in reverse
/// lexicographic order.
///
/// A missing parent directory is [`AuditError::NotFound`] and an unreadable
/// one is [`AuditError::Io`]; no matches yields an empty list.
pub fn select_logs(prefix: impl AsRef<Path>, query_time: f64) -> Result<Vec<PathBuf>, AuditError> {
    let prefix = prefix.as_ref();

    let directory = match prefix.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !directory.is_dir() {
        return Err(AuditError::NotFound(directory.to_path_buf()));
    }

    let escaped = glob::Pattern::escape(&prefix.to_string_lossy());
    let pattern = format!("{escaped}*");
    let paths = glob::glob(&pattern).map_err(|err| AuditError::Glob {
        pattern: pattern.clone(),
        message: err.to_string(),
    })?;

    let mut selected = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) if err.error().kind() == ErrorKind::NotFound => {
                warn!("[selector] {} vanished while listing", err.path().display());
                continue;
            }
            Err(err) => {
                let path = err.path().to_path_buf();
                return Err(AuditError::io(path, err.into_error()));
            }
        };
        if !path.is_file() {
            continue;
        }

        if modified_after(&path, query_time)? {
            selected.push(path);
        } else {
            debug!(
                "[selector] Skipping {} (last modified before the window)",
                path.display()
            );
        }
    }

    selected.sort_by(|a, b| b.cmp(a));
    Ok(selected)
}

/// Whether `path` was modified strictly after `query_time`. A file rotated
/// away since it was listed counts as not modified.
fn modified_after(path: &Path, query_time: f64) -> Result<bool, AuditError> {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => Ok(epoch_seconds(modified) > query_time),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("[selector] {} vanished before it could be inspected", path.display());
            Ok(false)
        }
        Err(err) => Err(AuditError::io(path, err)),
    }
}
