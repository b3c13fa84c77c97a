// src/specs/snapshots.rs
//! Snapshot index: which dated snapshot pages to visit.
//!
//! The archive lists snapshots newest first, one per row, the first cell holding
//! a link whose text is the snapshot stamp (`14-May-2024 16:33`). Scanning stops
//! at the first stamp older than the cutoff year: nothing below it is read, even
//! rows that would qualify on their own.

use url::Url;

use crate::config::ArchiveOptions;
use crate::core::time::{before_cutoff, parse_snapshot_time};
use crate::core::{Fetch, html, net};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotLink {
    /// Stamp exactly as printed in the index.
    pub time_text: String,
    /// Absolute URL of the snapshot page.
    pub url: String,
}

/// Fetch the index page and list its snapshots. An unreachable page yields none.
pub fn fetch(fetcher: &dyn Fetch, opts: &ArchiveOptions) -> Result<Vec<SnapshotLink>> {
    let base = Url::parse(&opts.base_url)?;

    let Some(doc) = fetcher.fetch(base.as_str()) else {
        loge!("Snapshot index unavailable: {}", base);
        return Ok(Vec::new());
    };

    let t = std::time::Instant::now();
    let links = parse_doc(&doc, &base, opts.min_year);
    logd!("Snapshots: parsed index in {:?}, {} links", t.elapsed(), links.len());
    Ok(links)
}

pub fn parse_doc(doc: &str, base: &Url, min_year: i32) -> Vec<SnapshotLink> {
    let mut out = Vec::new();

    for row in html::rows(doc) {
        let Some(link) = row.first().and_then(|td| td.first_link()) else { continue };

        let Some(stamp) = parse_snapshot_time(&link.text) else {
            logd!("Snapshots: skipping row with stamp {:?}", link.text);
            continue;
        };
        if before_cutoff(&stamp, min_year) {
            logd!("Snapshots: {} is before {min_year}, stopping", link.text);
            break;
        }

        if let Some(url) = net::resolve(base, &link.href) {
            out.push(SnapshotLink { time_text: link.text, url });
        }
    }

    out
}
