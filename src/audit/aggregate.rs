//! Per-day aggregation of access entries.

use super::{DayRecord, RawEntry};
use crate::utils::time::date_in;
use chrono::{Local, NaiveDate, TimeZone};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Users seen in a window and the per-date presence records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Every user seen at least once
    pub users: BTreeSet<String>,
    pub records: BTreeMap<NaiveDate, DayRecord>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Whether `user` was present on `date`
    pub fn was_present(&self, user: &str, date: NaiveDate) -> bool {
        self.records
            .get(&date)
            .is_some_and(|record| record.users.contains(user))
    }

    fn add(&mut self, date: NaiveDate, user: &str) {
        if !self.users.contains(user) {
            self.users.insert(user.to_string());
        }
        match self.records.get_mut(&date) {
            Some(record) => {
                if !record.users.contains(user) {
                    record.users.insert(user.to_string());
                }
            }
            None => {
                self.records.insert(date, DayRecord::new(date, user));
            }
        }
    }
}

/// Aggregate entries strictly later than `query_time`, bucketing by the
/// host's local calendar date.
pub fn aggregate<I>(entries: I, query_time: f64) -> Aggregation
where
    I: IntoIterator<Item = RawEntry>,
{
    aggregate_in(entries, query_time, &Local)
}

/// [`aggregate`] with an explicit zone for the date bucketing
pub fn aggregate_in<I, Tz>(entries: I, query_time: f64, tz: &Tz) -> Aggregation
where
    I: IntoIterator<Item = RawEntry>,
    Tz: TimeZone,
{
    let mut aggregation = Aggregation::default();
    let mut skipped = 0usize;

    for entry in entries {
        if entry.timestamp <= query_time {
            skipped += 1;
            continue;
        }
        let Some(user) = entry.user() else {
            continue;
        };
        let Some(date) = date_in(entry.timestamp, tz) else {
            debug!(
                "[aggregate] Ignoring entry for {user} with unrepresentable time {}",
                entry.timestamp
            );
            continue;
        };
        aggregation.add(date, user);
    }

    debug!(
        "[aggregate] {} users over {} days, {} entries before the window",
        aggregation.users.len(),
        aggregation.records.len(),
        skipped
    );
    aggregation
}
