//! Time helpers.
//!
//! Record timestamps are fractional epoch seconds. Reports bucket them by
//! calendar date in the host's zone, so most helpers take the zone as a
//! parameter and the `Local` variants are thin wrappers.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Convert a `SystemTime` (file mtime, "now") into fractional epoch seconds
pub fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

/// Current time as fractional epoch seconds
pub fn now_seconds() -> f64 {
    epoch_seconds(SystemTime::now())
}

/// Convert fractional epoch seconds into a zoned timestamp.
///
/// Returns `None` when the value is not finite or falls outside chrono's
/// representable range.
pub fn datetime_in<Tz: TimeZone>(timestamp: f64, tz: &Tz) -> Option<DateTime<Tz>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos).map(|dt| dt.with_timezone(tz))
}

/// Calendar date of a timestamp in the given zone
pub fn date_in<Tz: TimeZone>(timestamp: f64, tz: &Tz) -> Option<NaiveDate> {
    datetime_in(timestamp, tz).map(|dt| dt.date_naive())
}

/// First instant of `date` in `tz`.
///
/// Where midnight does not exist (a DST gap), the first valid instant after
/// the gap is used instead.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight).earliest().or_else(|| {
        (1..=24).find_map(|quarter| {
            tz.from_local_datetime(&(midnight + chrono::Duration::minutes(quarter * 15)))
                .earliest()
        })
    })
}

/// Render a timestamp for humans, `2024-01-31 08:15:00` with a microsecond
/// suffix only when the fraction is non-zero.
pub fn human_timestamp_in<Tz: TimeZone>(timestamp: f64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match datetime_in(timestamp, tz) {
        Some(dt) if dt.timestamp_subsec_micros() == 0 => {
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => format!("{timestamp}"),
    }
}

/// [`human_timestamp_in`] for the host's local zone
pub fn human_timestamp(timestamp: f64) -> String {
    human_timestamp_in(timestamp, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset};
    use std::time::Duration;

    #[test]
    fn test_epoch_seconds() {
        let time = UNIX_EPOCH + Duration::from_millis(1_500);
        assert!((epoch_seconds(time) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_date_in_respects_zone() {
        // 2024-01-01T23:30:00Z
        let ts = 1_704_151_800.0;
        assert_eq!(date_in(ts, &Utc), NaiveDate::from_ymd_opt(2024, 1, 1));

        let east = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(date_in(ts, &east), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_datetime_in_rejects_nan() {
        assert!(datetime_in(f64::NAN, &Utc).is_none());
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let start = start_of_day(date, &Utc).unwrap();
        assert_eq!(start.timestamp(), 1_709_596_800);
        assert_eq!(start.day(), 5);
    }

    #[test]
    fn test_human_timestamp() {
        assert_eq!(
            human_timestamp_in(1_704_067_200.0, &Utc),
            "2024-01-01 00:00:00"
        );
        assert_eq!(
            human_timestamp_in(1_704_067_200.25, &Utc),
            "2024-01-01 00:00:00.250000"
        );
    }
}
