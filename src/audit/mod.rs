//! Core audit pipeline: record sources, file selection, aggregation and
//! interval merging.
//!
//! ```text
//! select_logs -> read_all (one buffer per file) -> RecordSource::entries
//!             -> aggregate -> merge -> report
//! ```
//!
//! - [`selector`] - Rotated log file selection by prefix and mtime
//! - [`wtmp`] - Binary login accounting record decoder
//! - [`snapshot`] - "Could access" CSV snapshot log reader and writer
//! - [`aggregate`] - Per-day user presence
//! - [`merge`] - Consecutive identical days into intervals
//! - [`types`] - Shared data structures

pub mod aggregate;
pub mod merge;
pub mod selector;
pub mod snapshot;
pub mod types;
pub mod wtmp;

pub use aggregate::{aggregate, aggregate_in, Aggregation};
pub use merge::merge;
pub use selector::select_logs;
pub use types::{DayRecord, MergedInterval, QueryKind, QueryWindow, RawEntry};

/// A restartable sequence of decoded access entries.
///
/// Every call to [`entries`](RecordSource::entries) walks the underlying
/// buffers again from the start, each file from its own first byte.
pub trait RecordSource {
    fn entries(&self) -> Box<dyn Iterator<Item = RawEntry> + '_>;
}
