//! Grouped human readable report.
//!
//! ```text
//!
//! 2 users accessed web01 in the last 31 days (since 2024-01-01 00:00:00):
//!
//! 2 users between 2024-01-02 and 2024-01-04:
//! Alice Smith
//! Bob Jones
//!
//! 1 user on 2024-01-09:
//! Alice Smith
//!
//! ```

use super::{name_of, Report};
use crate::accounts::DisplayResolvable;
use crate::audit::QueryKind;
use crate::utils::format::pluralise;
use std::io::{self, Write};

pub fn write_text<W, R>(report: &Report<'_>, resolver: &R, out: &mut W) -> io::Result<()>
where
    W: Write,
    R: DisplayResolvable + ?Sized,
{
    let days = pluralise("day", report.window.days as usize);

    if report.aggregation.is_empty() {
        let sentence = match report.kind {
            QueryKind::Could => format!(
                "No users have had access to {} in the last {} (since {}).",
                report.hostname, days, report.since
            ),
            QueryKind::Did => format!(
                "{} has not been accessed in the last {} (since {}).",
                report.hostname, days, report.since
            ),
        };
        writeln!(out)?;
        writeln!(out, "{}", sentence)?;
        writeln!(out)?;
        return Ok(());
    }

    let users = pluralise("user", report.aggregation.users.len());
    let verb = match report.kind {
        QueryKind::Could => "had access to",
        QueryKind::Did => "accessed",
    };
    writeln!(out)?;
    writeln!(
        out,
        "{} {} {} in the last {} (since {}):",
        users, verb, report.hostname, days, report.since
    )?;

    let names = report.display_names(resolver);
    for interval in report.intervals {
        let period = if interval.is_single_day() {
            format!("on {}", interval.start)
        } else {
            format!("between {} and {}", interval.start, interval.end)
        };
        writeln!(out)?;
        writeln!(out, "{} {}:", pluralise("user", interval.users.len()), period)?;

        let mut display: Vec<_> = interval
            .users
            .iter()
            .map(|user| name_of(&names, user))
            .collect();
        display.sort();
        for name in display {
            writeln!(out, "{}", name)?;
        }
    }
    writeln!(out)?;

    Ok(())
}
