// src/model.rs
//! Typed records produced by the page specs.
//!
//! Records only exist between extraction and the merge. Once they enter a
//! [`DataSet`] they are plain text cells again, in the column order below.

use crate::store::DataSet;

pub mod columns {
    pub const SNAPSHOT_TIME: &str = "Snapshot Time";
    pub const SNAPSHOT_URL: &str = "Snapshot URL";
    pub const EVENT_NUM: &str = "Event#";
    pub const ENAME: &str = "EName";
    pub const START: &str = "Start";
    pub const STOP: &str = "Stop";
    pub const PEAK: &str = "Peak";
    pub const GOES_CLASS: &str = "GOES Class";
    pub const DERIVED_POSITION: &str = "Derived Position";

    pub const REPORT_DATE: &str = "Report Date";
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TOTAL_EVENTS: &str = "Total Events";
    pub const LARGEST_FLARE: &str = "Largest Flare";
    pub const C_CLASS: &str = "C-class";
    pub const M_CLASS: &str = "M-class";
    pub const X_CLASS: &str = "X-class";
    pub const PROTON_EVENTS: &str = "Proton Events";
}

use columns::*;

/// A record type with a fixed persisted column layout.
pub trait Record {
    const HEADERS: &'static [&'static str];
    fn into_row(self) -> Vec<String>;
}

/// One flare as listed on one snapshot page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub snapshot_time: String,
    pub snapshot_url: String,
    pub event_num: String,
    pub ename: String,
    pub start: String,
    pub stop: String,
    pub peak: String,
    pub goes_class: String,
    pub derived_position: String,
}

impl Record for EventRecord {
    const HEADERS: &'static [&'static str] = &[
        SNAPSHOT_TIME, SNAPSHOT_URL, EVENT_NUM, ENAME, START, STOP, PEAK, GOES_CLASS,
        DERIVED_POSITION,
    ];

    fn into_row(self) -> Vec<String> {
        vec![
            self.snapshot_time,
            self.snapshot_url,
            self.event_num,
            self.ename,
            self.start,
            self.stop,
            self.peak,
            self.goes_class,
            self.derived_position,
        ]
    }
}

/// One line of the archive index: a reporting period and its tallies.
/// Counts are kept as printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRecord {
    pub report_date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_events: String,
    pub largest_flare: String,
    pub c_class: String,
    pub m_class: String,
    pub x_class: String,
    pub proton_events: String,
}

impl Record for SummaryRecord {
    const HEADERS: &'static [&'static str] = &[
        REPORT_DATE, START_TIME, END_TIME, TOTAL_EVENTS, LARGEST_FLARE, C_CLASS, M_CLASS,
        X_CLASS, PROTON_EVENTS,
    ];

    fn into_row(self) -> Vec<String> {
        vec![
            self.report_date,
            self.start_time,
            self.end_time,
            self.total_events,
            self.largest_flare,
            self.c_class,
            self.m_class,
            self.x_class,
            self.proton_events,
        ]
    }
}

impl DataSet {
    pub fn from_records<R: Record>(records: Vec<R>) -> Self {
        Self {
            headers: R::HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: records.into_iter().map(Record::into_row).collect(),
        }
    }
}
