//! The "could access" snapshot log.
//!
//! Each row records, at one point in time, which accounts held both an
//! authorized SSH key and an account database entry:
//!
//! ```text
//! 1704067200.123456,2024-01-01 00:00:00.123456,alice,bob
//! ```
//!
//! Rows have a variable number of trailing user fields. Rotated generations
//! share the log's path as a common prefix.

use super::{RawEntry, RecordSource};
use crate::error::AuditError;
use crate::utils::time::{human_timestamp, now_seconds};
use log::warn;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// One snapshot row
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub timestamp: f64,
    pub human_timestamp: String,
    pub users: Vec<String>,
}

impl SnapshotRow {
    /// Row stamped with the current time
    pub fn now(users: Vec<String>) -> Self {
        let timestamp = now_seconds();
        Self {
            timestamp,
            human_timestamp: human_timestamp(timestamp),
            users,
        }
    }

    /// Encode as one CSV line, newline included
    pub fn to_line(&self) -> Result<Vec<u8>, AuditError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        let timestamp = format!("{:.6}", self.timestamp);
        let mut record = vec![timestamp.as_str(), self.human_timestamp.as_str()];
        record.extend(self.users.iter().map(String::as_str));
        writer.write_record(&record)?;

        writer
            .into_inner()
            .map_err(|err| AuditError::io("<snapshot row>", err.into_error()))
    }
}

/// Append one row to the snapshot log, creating it if needed.
///
/// The whole row goes out in a single `write_all` on an append-mode handle,
/// so concurrent appenders never interleave within a row.
pub fn append_row(path: impl AsRef<Path>, row: &SnapshotRow) -> Result<(), AuditError> {
    let path = path.as_ref();
    let line = row.to_line()?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| AuditError::io(path, err))?;
    file.write_all(&line)
        .map_err(|err| AuditError::io(path, err))
}

/// The snapshot log generations of one query.
///
/// Generations are parsed one at a time, so a rotated file missing its final
/// newline cannot run its last row into the next file's first row.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLog {
    generations: Vec<Vec<u8>>,
}

impl SnapshotLog {
    /// A single generation
    pub fn new(buffer: Vec<u8>) -> Self {
        Self::from_generations(vec![buffer])
    }

    pub fn from_generations(generations: Vec<Vec<u8>>) -> Self {
        Self { generations }
    }

    /// Decode every well-formed row; malformed rows are logged and skipped
    pub fn rows(&self) -> impl Iterator<Item = SnapshotRow> + '_ {
        self.generations
            .iter()
            .flat_map(|generation| parse_rows(generation))
    }
}

fn parse_rows(buffer: &[u8]) -> impl Iterator<Item = SnapshotRow> + '_ {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(buffer)
        .into_records()
        .enumerate()
        .filter_map(|(index, result)| {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    warn!("[snapshot] Skipping unreadable row {}: {err}", index + 1);
                    return None;
                }
            };

            let timestamp = match record.get(0).map(|t| t.trim().parse::<f64>()) {
                Some(Ok(timestamp)) => timestamp,
                _ => {
                    warn!(
                        "[snapshot] Skipping row {} without a numeric timestamp",
                        index + 1
                    );
                    return None;
                }
            };

            Some(SnapshotRow {
                timestamp,
                human_timestamp: record.get(1).unwrap_or_default().to_string(),
                users: record
                    .iter()
                    .skip(2)
                    .filter(|u| !u.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
}

impl RecordSource for SnapshotLog {
    fn entries(&self) -> Box<dyn Iterator<Item = RawEntry> + '_> {
        Box::new(self.rows().flat_map(|row| {
            if row.users.is_empty() {
                return vec![RawEntry::anonymous(row.timestamp)];
            }
            let timestamp = row.timestamp;
            row.users
                .into_iter()
                .map(|user| RawEntry::new(timestamp, user))
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(timestamp: f64, users: &[&str]) -> SnapshotRow {
        SnapshotRow {
            timestamp,
            human_timestamp: "2024-01-01 00:00:00".to_string(),
            users: users.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_row_line_format() {
        let line = row(1_704_067_200.5, &["alice", "bob"]).to_line().unwrap();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "1704067200.500000,2024-01-01 00:00:00,alice,bob\n"
        );
    }

    #[test]
    fn test_entries_flatten_users() {
        let log = SnapshotLog::new(
            b"100.0,1970-01-01 00:01:40,alice,bob\n200.5,1970-01-01 00:03:20,bob\n".to_vec(),
        );
        let entries: Vec<_> = log.entries().collect();
        assert_eq!(
            entries,
            vec![
                RawEntry::new(100.0, "alice"),
                RawEntry::new(100.0, "bob"),
                RawEntry::new(200.5, "bob"),
            ]
        );
    }

    #[test]
    fn test_row_without_users() {
        let log = SnapshotLog::new(b"100.0,1970-01-01 00:01:40\n".to_vec());
        let entries: Vec<_> = log.entries().collect();
        assert_eq!(entries, vec![RawEntry::anonymous(100.0)]);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let log = SnapshotLog::new(
            b"not-a-time,whenever,mallory\n\n300,1970-01-01 00:05:00,carol\n".to_vec(),
        );
        let rows: Vec<_> = log.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].users, vec!["carol"]);
    }

    #[test]
    fn test_generation_without_final_newline() {
        let log = SnapshotLog::from_generations(vec![
            b"100.0,1970-01-01 00:01:40,bob".to_vec(),
            b"200.0,1970-01-01 00:03:20,alice\n".to_vec(),
        ]);
        let rows: Vec<_> = log.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].users, vec!["bob"]);
        assert_eq!(rows[1].users, vec!["alice"]);
        assert_eq!(rows[1].timestamp, 200.0);
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("could.log");

        append_row(&path, &row(100.0, &["alice"])).unwrap();
        append_row(&path, &row(200.0, &["alice", "bob"])).unwrap();

        let log = SnapshotLog::new(std::fs::read(&path).unwrap());
        let rows: Vec<_> = log.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].users, vec!["alice", "bob"]);
        assert_eq!(rows[1].timestamp, 200.0);
    }
}
