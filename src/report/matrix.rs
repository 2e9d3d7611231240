//! CSV presence matrix: one row per user, one column per date of the window.
//!
//! ```text
//! user,2024-01-01,2024-01-02,2024-01-03
//! Alice Smith,*,*,
//! Bob Jones,,*,
//! ```
//!
//! The columns cover the whole window rather than just the active dates, so
//! gaps show up as blank cells.

use super::{name_of, Report};
use crate::accounts::DisplayResolvable;
use crate::error::AuditError;
use std::io::Write;

/// Cell value for "present on this date"
pub const PRESENT: &str = "*";

pub fn write_matrix<W, R>(report: &Report<'_>, resolver: &R, out: W) -> Result<(), AuditError>
where
    W: Write,
    R: DisplayResolvable + ?Sized,
{
    let dates = report.window.dates();
    let mut writer = csv::WriterBuilder::new().from_writer(out);

    let mut header = Vec::with_capacity(dates.len() + 1);
    header.push("user".to_string());
    header.extend(dates.iter().map(|d| d.format("%Y-%m-%d").to_string()));
    writer.write_record(&header)?;

    let names = report.display_names(resolver);
    let mut rows: Vec<_> = report
        .aggregation
        .users
        .iter()
        .map(|user| (name_of(&names, user).into_owned(), user))
        .collect();
    rows.sort();

    for (display, user) in rows {
        let mut record = Vec::with_capacity(dates.len() + 1);
        record.push(display);
        record.extend(dates.iter().map(|date| {
            if report.aggregation.was_present(user, *date) {
                PRESENT.to_string()
            } else {
                String::new()
            }
        }));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .map_err(|err| AuditError::io("<report output>", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{QueryKind, RawEntry};
    use crate::report::fixtures::{build, names, window, DAY};

    fn render(entries: Vec<RawEntry>) -> Vec<Vec<String>> {
        let window = window();
        let (aggregation, intervals) = build(&window, entries);
        let report = Report::new(QueryKind::Did, &window, &aggregation, &intervals);
        let mut out = Vec::new();
        write_matrix(&report, &names(), &mut out).unwrap();

        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(out.as_slice())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_spans_whole_window() {
        let t = window().query_time;
        let rows = render(vec![RawEntry::new(t + DAY + 10.0, "alice")]);

        assert_eq!(
            rows[0],
            vec!["user", "2024-01-01", "2024-01-02", "2024-01-03"]
        );
        assert_eq!(rows[1], vec!["Alice Smith", "", "*", ""]);
        assert_eq!(rows[1].iter().filter(|c| *c == PRESENT).count(), 1);
    }

    #[test]
    fn test_empty_window_has_header_only() {
        let rows = render(vec![]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 4);
    }

    #[test]
    fn test_rows_sorted_by_display_name() {
        let t = window().query_time;
        let rows = render(vec![
            RawEntry::new(t + 10.0, "zed"),
            RawEntry::new(t + 10.0, "bob"),
            RawEntry::new(t + 2.0 * DAY + 10.0, "alice"),
        ]);

        let names: Vec<_> = rows[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(
            names,
            vec!["Alice Smith", "Bob Jones", "zed (real name not found)"]
        );
        assert_eq!(rows[3], vec!["zed (real name not found)", "*", "", ""]);
    }
}
