//! Data structures flowing through the audit pipeline.
//!
//! Both record sources reduce to [`RawEntry`]; the aggregator turns those into
//! per-date [`DayRecord`]s and the merger coalesces them into
//! [`MergedInterval`]s for the renderers.

use crate::error::AuditError;
use crate::utils::time::start_of_day;
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which question a report answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Users who logged in, from `wtmp`
    Did,
    /// Users who held keys and accounts, from the snapshot log
    Could,
}

/// A single decoded access record.
///
/// `user` is `None` for accounting records that are not logins (boot,
/// runlevel and logout markers).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Seconds since the epoch, with sub-second precision
    pub timestamp: f64,
    pub user: Option<String>,
}

impl RawEntry {
    pub fn new(timestamp: f64, user: impl Into<String>) -> Self {
        Self {
            timestamp,
            user: Some(user.into()),
        }
    }

    pub fn anonymous(timestamp: f64) -> Self {
        Self {
            timestamp,
            user: None,
        }
    }

    /// The user, if present and non-empty
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.is_empty())
    }
}

/// Users present on one calendar date (or, when re-fed into the merger, on a
/// run of dates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub users: BTreeSet<String>,
}

impl DayRecord {
    pub fn new(date: NaiveDate, user: &str) -> Self {
        Self {
            start: date,
            end: date,
            users: BTreeSet::from([user.to_string()]),
        }
    }
}

/// A run of consecutive dates sharing an identical user set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Sorted by username
    pub users: Vec<String>,
}

impl MergedInterval {
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

/// The time window a query covers.
///
/// The window is day-aligned: it spans `days` calendar dates ending today,
/// and `query_time` is the first instant of the first of those dates. Entries
/// must be strictly later than `query_time` to count.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryWindow {
    pub days: u32,
    pub query_time: f64,
    pub first_day: NaiveDate,
    pub today: NaiveDate,
}

impl QueryWindow {
    /// Window of `days` dates ending at the local date of `now`
    pub fn ending_at<Tz: TimeZone>(days: i64, now: &DateTime<Tz>) -> Result<Self, AuditError> {
        let days = u32::try_from(days)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or(AuditError::InvalidDays(days))?;

        let tz = now.timezone();
        let today = now.date_naive();
        let first_day = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or(AuditError::InvalidDays(i64::from(days)))?;

        let query_time = start_of_day(first_day, &tz)
            .ok_or(AuditError::NoStartOfDay(first_day))?
            .timestamp() as f64;

        Ok(Self {
            days,
            query_time,
            first_day,
            today,
        })
    }

    /// Window ending at the current local date
    pub fn local(days: i64) -> Result<Self, AuditError> {
        Self::ending_at(days, &Local::now())
    }

    /// Every date of the window, oldest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.first_day
            .iter_days()
            .take(self.days as usize)
            .collect()
    }
}
