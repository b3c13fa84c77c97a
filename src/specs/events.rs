// src/specs/events.rs
//! Snapshot page → flare events.
//!
//! The event table has no stable id or class, so it is picked by content: the
//! first table whose rendered text mentions all of [`MARKERS`]. Rows are then read
//! positionally, cells 0–6:
//! `Event#, EName, Start, Stop, Peak, GOES Class, Derived Position`.

use crate::core::{Fetch, html};
use crate::model::EventRecord;
use crate::specs::snapshots::SnapshotLink;

pub const MARKERS: [&str; 3] = ["EName", "GOES Class", "Derived Position"];
pub const MIN_CELLS: usize = 7;

/// Why a snapshot produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
    /// Fetch failed, timed out or 404'd.
    Unreachable,
    NoEventTable,
    NoRows,
}

/// Fetch one snapshot and read its events.
pub fn fetch(fetcher: &dyn Fetch, link: &SnapshotLink) -> Result<Vec<EventRecord>, Skip> {
    let doc = fetcher.fetch(&link.url).ok_or(Skip::Unreachable)?;
    let table = find_event_table(&doc).ok_or(Skip::NoEventTable)?;

    let events = parse_table(table, &link.time_text, &link.url);
    if events.is_empty() {
        return Err(Skip::NoRows);
    }
    Ok(events)
}

/// First table, in document order, carrying every marker.
pub fn find_event_table(doc: &str) -> Option<&str> {
    html::blocks_ci(doc, "table").into_iter().find(|table| {
        let text = html::strip_tags(table);
        MARKERS.iter().all(|m| text.contains(m))
    })
}

/// Whole page in, events out. Empty when there is no event table.
pub fn parse_doc(doc: &str, snapshot_time: &str, snapshot_url: &str) -> Vec<EventRecord> {
    find_event_table(doc)
        .map(|table| parse_table(table, snapshot_time, snapshot_url))
        .unwrap_or_default()
}

fn parse_table(table: &str, snapshot_time: &str, snapshot_url: &str) -> Vec<EventRecord> {
    let mut out = Vec::new();
    for row in html::rows(table) {
        if row.len() < MIN_CELLS {
            continue;
        }
        let cell = |i: usize| row[i].text();

        let ename = cell(1);
        if ename.is_empty() {
            continue;
        }

        out.push(EventRecord {
            snapshot_time: snapshot_time.to_string(),
            snapshot_url: snapshot_url.to_string(),
            event_num: cell(0),
            ename,
            start: cell(2),
            stop: cell(3),
            peak: cell(4),
            goes_class: cell(5),
            derived_position: cell(6),
        });
    }
    out
}
