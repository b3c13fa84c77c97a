// src/reconcile.rs
//! Merge freshly scraped rows into the persisted table.
//!
//! One routine, two policies. The shape is always:
//!
//! ```text
//! prior ++ fresh → stable sort by policy.order → dedup on policy.dedup
//!               (keep first or last) → stable sort by policy.publish
//! ```
//!
//! "Most recent wins" is never chosen explicitly. It falls out of sorting newest
//! first and keeping the first row of each key (events), or of keeping the last
//! inserted row of an equal key after a stable sort (summary).
//!
//! Ordering values are derived from cell text on every run. Text that doesn't
//! parse is `None`, which orders before every real timestamp, so it loses ties
//! in a descending sort.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::config::consts::SNAPSHOT_TIME_FORMAT;
use crate::core::time::{parse_lenient, TimeParse};
use crate::model::columns::{ENAME, PEAK, REPORT_DATE, SNAPSHOT_TIME, START};
use crate::store::DataSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug)]
pub struct OrderKey {
    pub column: &'static str,
    pub parse: TimeParse,
    /// Column whose stamp supplies the day for a bare time of day.
    pub anchor: Option<&'static str>,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug)]
pub enum DedupKey {
    /// Cell text, compared verbatim.
    Text(&'static str),
    /// Parsed timestamp. Every unparseable cell shares one key.
    Time(&'static str, TimeParse),
}

/// Which row of a duplicate group survives, by position after the pre-sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keep {
    First,
    Last,
}

#[derive(Clone, Copy, Debug)]
pub struct MergePolicy {
    pub label: &'static str,
    pub dedup: DedupKey,
    pub order: &'static [OrderKey],
    pub keep: Keep,
    pub publish: &'static [OrderKey],
}

const EVENT_ORDER: &[OrderKey] = &[
    OrderKey {
        column: SNAPSHOT_TIME,
        parse: TimeParse::Strict(SNAPSHOT_TIME_FORMAT),
        anchor: None,
        direction: Direction::Desc,
    },
    // Peak is usually printed as a time of day; Start carries the date.
    OrderKey {
        column: PEAK,
        parse: TimeParse::Clock,
        anchor: Some(START),
        direction: Direction::Desc,
    },
];

const SUMMARY_ORDER: &[OrderKey] = &[OrderKey {
    column: REPORT_DATE,
    parse: TimeParse::Lenient,
    anchor: None,
    direction: Direction::Desc,
}];

/// One row per `EName`: the one from the latest snapshot, later peak breaking ties.
pub const EVENTS: MergePolicy = MergePolicy {
    label: "events",
    dedup: DedupKey::Text(ENAME),
    order: EVENT_ORDER,
    keep: Keep::First,
    publish: EVENT_ORDER,
};

/// One row per report date: the most recently written one.
pub const SUMMARY: MergePolicy = MergePolicy {
    label: "summary",
    dedup: DedupKey::Time(REPORT_DATE, TimeParse::Lenient),
    order: SUMMARY_ORDER,
    keep: Keep::Last,
    publish: SUMMARY_ORDER,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub table: DataSet,
    pub prior_rows: usize,
    /// `max(0, table rows - prior rows)`. A row-count delta, not a count of new keys:
    /// a revision replacing a row in place adds 0.
    pub added: usize,
    /// False when there was nothing fresh to merge; `table` is then the prior table
    /// untouched and should not be written back.
    pub merged: bool,
}

pub fn reconcile(prior: DataSet, fresh: DataSet, policy: &MergePolicy) -> MergeOutcome {
    let prior_rows = prior.len();

    if fresh.is_empty() {
        logd!("{}: nothing fresh to merge", policy.label);
        return MergeOutcome { table: prior, prior_rows, added: 0, merged: false };
    }

    let working = DataSet::concat(prior, fresh);
    let working = sort_rows(working, policy.order);
    let working = dedup_rows(working, policy.dedup, policy.keep);
    let table = sort_rows(working, policy.publish);

    let added = table.len().saturating_sub(prior_rows);
    logf!(
        "{}: {} prior rows, {} after merge, {} added",
        policy.label, prior_rows, table.len(), added
    );

    MergeOutcome { table, prior_rows, added, merged: true }
}

type Stamp = Option<NaiveDateTime>;

fn compare_keys(a: &[Stamp], b: &[Stamp], keys: &[OrderKey]) -> Ordering {
    for ((x, y), key) in a.iter().zip(b).zip(keys) {
        // None < Some(_): unorderable text counts as earliest.
        let ord = match key.direction {
            Direction::Asc => x.cmp(y),
            Direction::Desc => y.cmp(x),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Stable multi-key sort on parsed timestamps.
pub fn sort_rows(mut ds: DataSet, keys: &[OrderKey]) -> DataSet {
    if keys.is_empty() || ds.rows.len() < 2 {
        return ds;
    }

    let cols: Vec<(Option<usize>, Option<usize>)> = keys
        .iter()
        .map(|k| (ds.column(k.column), k.anchor.and_then(|a| ds.column(a))))
        .collect();
    let mut keyed: Vec<(Vec<Stamp>, Vec<String>)> = ds
        .rows
        .drain(..)
        .map(|row| {
            let stamps = keys
                .iter()
                .zip(&cols)
                .map(|(k, &(col, anchor))| {
                    let anchor = anchor.and_then(|ix| row.get(ix)).and_then(|t| parse_lenient(t));
                    col.and_then(|ix| row.get(ix)).and_then(|text| k.parse.parse_near(text, anchor))
                })
                .collect();
            (stamps, row)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, keys));
    ds.rows = keyed.into_iter().map(|(_, row)| row).collect();
    ds
}

#[derive(Hash, PartialEq, Eq)]
enum KeyValue {
    Text(String),
    Time(Stamp),
}

fn key_of(ds: &DataSet, row: &[String], key: DedupKey) -> KeyValue {
    match key {
        DedupKey::Text(col) => KeyValue::Text(ds.cell(row, col).to_string()),
        DedupKey::Time(col, parse) => KeyValue::Time(parse.parse(ds.cell(row, col))),
    }
}

/// Drop all but one row per key. Survivors keep their relative order.
pub fn dedup_rows(mut ds: DataSet, key: DedupKey, keep: Keep) -> DataSet {
    let n = ds.rows.len();
    let mut seen: HashSet<KeyValue> = HashSet::with_capacity(n);
    let mut survives = vec![false; n];

    let order: Box<dyn Iterator<Item = usize>> = match keep {
        Keep::First => Box::new(0..n),
        Keep::Last => Box::new((0..n).rev()),
    };
    for i in order {
        survives[i] = seen.insert(key_of(&ds, &ds.rows[i], key));
    }

    let before = n;
    let rows = std::mem::take(&mut ds.rows);
    ds.rows = rows
        .into_iter()
        .zip(survives)
        .filter_map(|(row, kept)| kept.then_some(row))
        .collect();
    logd!("dedup: {} -> {} rows", before, ds.rows.len());
    ds
}
