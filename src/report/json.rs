//! Machine readable report.

use super::{name_of, Report};
use crate::accounts::DisplayResolvable;
use crate::audit::QueryKind;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    query: QueryKind,
    hostname: &'a str,
    days: u32,
    since: &'a str,
    users: Vec<JsonUser>,
    intervals: Vec<JsonInterval<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonUser {
    username: String,
    display_name: String,
}

#[derive(Debug, Serialize)]
struct JsonInterval<'a> {
    start: NaiveDate,
    end: NaiveDate,
    users: &'a [String],
}

pub fn write_json<W, R>(report: &Report<'_>, resolver: &R, mut out: W) -> io::Result<()>
where
    W: Write,
    R: DisplayResolvable + ?Sized,
{
    let names = report.display_names(resolver);
    let users = report
        .aggregation
        .users
        .iter()
        .map(|user| JsonUser {
            username: user.clone(),
            display_name: name_of(&names, user).into_owned(),
        })
        .collect();

    let document = JsonReport {
        query: report.kind,
        hostname: &report.hostname,
        days: report.window.days,
        since: &report.since,
        users,
        intervals: report
            .intervals
            .iter()
            .map(|i| JsonInterval {
                start: i.start,
                end: i.end,
                users: &i.users,
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut out, &document)?;
    writeln!(out)
}
