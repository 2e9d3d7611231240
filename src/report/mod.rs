//! Report rendering.
//!
//! A [`Report`] bundles everything the renderers need: the query window, the
//! aggregated presence data, the merged intervals and the host name. Each
//! output mode writes to any `io::Write`:
//!
//! - [`text`] - grouped human summary
//! - [`matrix`] - users x dates CSV presence matrix
//! - [`json`] - merged intervals as JSON

pub mod json;
pub mod matrix;
pub mod text;

use crate::accounts::DisplayResolvable;
use crate::audit::{Aggregation, MergedInterval, QueryKind, QueryWindow};
use crate::utils::time::human_timestamp;
use std::borrow::Cow;
use std::collections::HashMap;

/// Output mode for query reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// Everything needed to render one query
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub kind: QueryKind,
    pub hostname: String,
    /// Human readable window start
    pub since: String,
    pub window: &'a QueryWindow,
    pub aggregation: &'a Aggregation,
    pub intervals: &'a [MergedInterval],
}

impl<'a> Report<'a> {
    /// Report for this host, with the window start in local time
    pub fn new(
        kind: QueryKind,
        window: &'a QueryWindow,
        aggregation: &'a Aggregation,
        intervals: &'a [MergedInterval],
    ) -> Self {
        Self {
            kind,
            hostname: local_hostname(),
            since: human_timestamp(window.query_time),
            window,
            aggregation,
            intervals,
        }
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    #[must_use]
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = since.into();
        self
    }

    /// Resolve every distinct user once
    pub fn display_names<R>(&self, resolver: &R) -> HashMap<String, String>
    where
        R: DisplayResolvable + ?Sized,
    {
        self.aggregation
            .users
            .iter()
            .map(|user| (user.clone(), resolver.display_name(user)))
            .collect()
    }
}

fn local_hostname() -> String {
    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}

/// Display name lookup with the placeholder for users missing from `names`
pub(crate) fn name_of<'n>(names: &'n HashMap<String, String>, user: &str) -> Cow<'n, str> {
    match names.get(user) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(crate::accounts::fallback_name(user)),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::audit::{aggregate_in, merge, RawEntry};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    /// Resolver backed by a fixed map
    pub struct StaticNames(pub HashMap<&'static str, &'static str>);

    impl DisplayResolvable for StaticNames {
        fn resolve_name(&self, username: &str) -> Option<String> {
            self.0.get(username).map(|n| n.to_string())
        }
    }

    pub fn names() -> StaticNames {
        StaticNames(HashMap::from([("alice", "Alice Smith"), ("bob", "Bob Jones")]))
    }

    /// Three day window ending 2024-01-03, day aligned at UTC midnight
    pub fn window() -> QueryWindow {
        QueryWindow::ending_at(3, &Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap()).unwrap()
    }

    pub fn build(window: &QueryWindow, entries: Vec<RawEntry>) -> (Aggregation, Vec<MergedInterval>) {
        let aggregation = aggregate_in(entries, window.query_time, &Utc);
        let intervals = merge(&aggregation.records);
        (aggregation, intervals)
    }

    pub const DAY: f64 = 86_400.0;
}
