//! Coalescing per-day records into intervals.
//!
//! Consecutive calendar days with exactly the same users collapse into one
//! interval, so a month of daily logins by the same team reads as a single
//! "between A and B" entry.

use super::{DayRecord, MergedInterval};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Merge day records into chronologically ordered, non-overlapping intervals
pub fn merge(records: &BTreeMap<NaiveDate, DayRecord>) -> Vec<MergedInterval> {
    merge_records(records.values().cloned())
}

/// [`merge`] over any collection of records, in any order
pub fn merge_records<I>(records: I) -> Vec<MergedInterval>
where
    I: IntoIterator<Item = DayRecord>,
{
    let mut sorted: Vec<MergedInterval> = records
        .into_iter()
        .map(|record| MergedInterval {
            start: record.start,
            end: record.end,
            // BTreeSet iteration is already lexicographic
            users: record.users.into_iter().collect(),
        })
        .collect();
    sorted.sort_by_key(|interval| interval.start);

    let mut merged: Vec<MergedInterval> = Vec::with_capacity(sorted.len());
    for next in sorted {
        if let Some(current) = merged.last_mut() {
            let follows = current.end.checked_add_days(Days::new(1)) == Some(next.start);
            if follows && current.users == next.users {
                current.end = next.end;
                continue;
            }
        }
        merged.push(next);
    }

    merged
}
