// src/core/time.rs
//! Timestamp coercion for ordering and cutoff checks.
//!
//! Table cells stay text everywhere; these helpers turn them into something
//! orderable on demand. `None` means "unorderable" and always sorts earliest.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::consts::SNAPSHOT_TIME_FORMAT;

/// Formats tried, in order, by [`parse_lenient`].
const LENIENT_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    SNAPSHOT_TIME_FORMAT,
    "%d-%b-%Y %H:%M:%S",
];

const DATE_ONLY_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%d-%b-%Y"];

/// Snapshot pages print Stop and Peak as a bare time of day.
const CLOCK_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// How a column's text becomes a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeParse {
    /// Exactly this chrono format, whole string.
    Strict(&'static str),
    /// Any of the date/time shapes the archive and our own CSVs are known to use.
    Lenient,
    /// Lenient, or a bare time of day placed on the day of an anchor stamp.
    Clock,
}

impl TimeParse {
    pub fn parse(self, text: &str) -> Option<NaiveDateTime> {
        self.parse_near(text, None)
    }

    /// Like [`TimeParse::parse`]; `anchor` only matters to [`TimeParse::Clock`].
    pub fn parse_near(self, text: &str, anchor: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
        match self {
            TimeParse::Strict(fmt) => parse_strict(text, fmt),
            TimeParse::Lenient => parse_lenient(text),
            TimeParse::Clock => parse_lenient(text).or_else(|| parse_clock_near(text, anchor)),
        }
    }
}

pub fn parse_strict(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), fmt).ok()
}

/// Snapshot/report stamp as printed on the archive: `14-May-2024 16:33`.
pub fn parse_snapshot_time(text: &str) -> Option<NaiveDateTime> {
    parse_strict(text, SNAPSHOT_TIME_FORMAT)
}

pub fn parse_lenient(text: &str) -> Option<NaiveDateTime> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    LENIENT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
        .or_else(|| {
            DATE_ONLY_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let t = text.trim();
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())
}

/// A time of day on the anchor's date, or the next date when it reads earlier
/// than the anchor (the event ran past midnight). No anchor: 1970-01-01.
pub fn parse_clock_near(text: &str, anchor: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    let time = parse_clock(text)?;
    let Some(anchor) = anchor else {
        return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(time));
    };
    let same_day = anchor.date().and_time(time);
    if same_day < anchor {
        anchor.date().succ_opt().map(|d| d.and_time(time))
    } else {
        Some(same_day)
    }
}

/// Inclusive cutoff check on a parsed stamp.
pub fn before_cutoff(dt: &NaiveDateTime, min_year: i32) -> bool {
    dt.year() < min_year
}
