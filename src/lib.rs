//! # Access Audit
//!
//! Audit login access to a host: who **did** log in during a window, and who
//! **could** have logged in.
//!
//! ## Overview
//!
//! - *Did* access comes from the rotated binary login accounting files
//!   (`/var/log/wtmp`, `wtmp.1`, `wtmp.2.gz`, ...).
//! - *Could* access comes from a snapshot log, appended to on a schedule,
//!   recording which accounts hold both an authorized SSH key and an
//!   account database entry.
//!
//! Both queries run the same pipeline: pick the rotated files touched during
//! the window, decode their records, collect the users present on each
//! calendar day, then merge runs of consecutive days with identical users
//! into intervals. Reports come as grouped text, a users x dates CSV presence
//! matrix, or JSON.
//!
//! ## Architecture
//!
//! - [`audit`] - Record decoding, file selection, aggregation and merging
//! - [`accounts`] - Account database lookups and display names
//! - [`report`] - Text, CSV and JSON renderers
//! - [`commands`] - The `--did`, `--could` and `--log` commands
//! - [`config`] - Path configuration
//! - [`utils`] - Shared utilities (reading, time, formatting, progress)
//!
//! ## Example Usage
//!
//! ```bash
//! # Who logged in during the last 31 days
//! access-audit --did
//!
//! # Who could log in during the last week, as a presence matrix
//! access-audit --could 7 --csv
//!
//! # Snapshot current key holders (run from cron)
//! access-audit --log
//! ```

pub mod accounts;
pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod report;
pub mod utils;

pub use error::AuditError;
