// src/specs/summary.rs
//! Archive index → one summary row per reporting period.
//!
//! Any row with at least [`MIN_CELLS`] cells is a candidate, read positionally:
//! `Report Date, Start Time, End Time, Total Events, Largest Flare, C, M, X, Protons`.
//! Unlike the snapshot index, old rows are filtered out rather than ending the scan.

use chrono::NaiveDateTime;

use crate::config::ArchiveOptions;
use crate::core::time::{before_cutoff, parse_snapshot_time};
use crate::core::{Fetch, html};
use crate::model::SummaryRecord;

pub const MIN_CELLS: usize = 9;

/// Fetch the archive index and read its summary rows. An unreachable page yields none.
pub fn fetch(fetcher: &dyn Fetch, opts: &ArchiveOptions) -> Vec<SummaryRecord> {
    let Some(doc) = fetcher.fetch(&opts.base_url) else {
        loge!("Summary page unavailable: {}", opts.base_url);
        return Vec::new();
    };
    parse_doc(&doc, opts.min_year)
}

/// Rows dated in or after `min_year`, oldest first.
pub fn parse_doc(doc: &str, min_year: i32) -> Vec<SummaryRecord> {
    let mut dated: Vec<(NaiveDateTime, SummaryRecord)> = Vec::new();

    for row in html::rows(doc) {
        if row.len() < MIN_CELLS {
            continue;
        }
        let cell = |i: usize| row[i].text();

        let report_date = cell(0);
        let Some(stamp) = parse_snapshot_time(&report_date) else { continue };
        if before_cutoff(&stamp, min_year) {
            continue;
        }

        dated.push((stamp, SummaryRecord {
            report_date,
            start_time: cell(1),
            end_time: cell(2),
            total_events: cell(3),
            largest_flare: cell(4),
            c_class: cell(5),
            m_class: cell(6),
            x_class: cell(7),
            proton_events: cell(8),
        }));
    }

    dated.sort_by_key(|(stamp, _)| *stamp);
    dated.into_iter().map(|(_, rec)| rec).collect()
}
