// src/store.rs
//! Persisted tables.
//!
//! A [`DataSet`] is a header row plus rows of text cells. Loading never infers
//! types: dates and counts come back exactly as they were written, and the merge
//! re-derives whatever it needs each run.

use std::path::Path;

use crate::error::Result;
use crate::file::{ensure_parent, is_missing_or_empty};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text by column name; missing column or short row reads as "".
    pub fn cell<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.column(name)
            .and_then(|ix| row.get(ix))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Stack `fresh` under `prior`, lining columns up by header name.
    /// Prior columns keep their order; columns only `fresh` has are appended.
    /// Cells a side doesn't have become "".
    pub fn concat(prior: DataSet, fresh: DataSet) -> DataSet {
        if prior.is_empty() {
            return fresh;
        }

        let mut headers = prior.headers.clone();
        for h in &fresh.headers {
            if !headers.contains(h) {
                headers.push(h.clone());
            }
        }

        let mut rows = Vec::with_capacity(prior.rows.len() + fresh.rows.len());
        rows.extend(prior.rows.into_iter().map(|r| realign(&prior.headers, r, &headers)));
        rows.extend(fresh.rows.into_iter().map(|r| realign(&fresh.headers, r, &headers)));

        DataSet { headers, rows }
    }
}

fn realign(src: &[String], mut row: Vec<String>, dst: &[String]) -> Vec<String> {
    if src == dst {
        row.resize(dst.len(), s!());
        return row;
    }
    dst.iter()
        .map(|h| {
            src.iter()
                .position(|s| s == h)
                .and_then(|ix| row.get_mut(ix).map(std::mem::take))
                .unwrap_or_default()
        })
        .collect()
}

/// Load a table written by [`save_dataset`] (or by hand).
/// Absent or zero-byte files load as an empty table.
pub fn load_dataset(path: &Path) -> Result<DataSet> {
    if is_missing_or_empty(path) {
        return Ok(DataSet::default());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mut row: Vec<String> = rec.iter().map(str::to_string).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), s!());
        }
        rows.push(row);
    }

    logd!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(DataSet { headers, rows })
}

/// Overwrite `path` with the whole table.
pub fn save_dataset(path: &Path, ds: &DataSet) -> Result<()> {
    ensure_parent(path)?;

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;

    wtr.write_record(&ds.headers)?;
    for row in &ds.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    logf!("Wrote {} rows to {}", ds.rows.len(), path.display());
    Ok(())
}
