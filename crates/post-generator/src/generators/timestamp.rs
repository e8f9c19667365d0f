//! Post timestamp generation and formatting.
//!
//! Timestamps are rendered with exactly millisecond precision, which is what
//! downstream `timestamp(3)` columns (e.g. Trino) expect.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use rand::Rng;

/// Length of a formatted timestamp, e.g. `2024-03-11T10:15:30.123`.
pub const TIMESTAMP_LEN: usize = 23;

/// `strftime` format producing [`TIMESTAMP_LEN`] characters for four-digit years.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Format a datetime with millisecond precision.
///
/// Sub-millisecond digits are truncated, not rounded, and a zero fraction
/// still renders as `.000`.
pub fn format_timestamp(datetime: NaiveDateTime) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Midnight on January 1st of the year `now` falls in.
pub fn start_of_year(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
}

/// Generate a datetime between the start of the current year and `now`.
pub fn generate_this_year<R: Rng>(rng: &mut R, now: NaiveDateTime) -> NaiveDateTime {
    let start = start_of_year(now);
    let span_micros = (now - start).num_microseconds().unwrap_or(0);

    if span_micros <= 0 {
        return start;
    }

    start + TimeDelta::microseconds(rng.gen_range(0..=span_micros))
}
