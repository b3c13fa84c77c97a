// src/runner.rs
//! The three things a run can do: refresh the events table, refresh the
//! summary table, or read the events table back.
//!
//! Pipelines never print. Everything a user should see goes through
//! [`Progress::log`]; everything a caller needs to check comes back in
//! [`RunSummary`].

use std::path::{Path, PathBuf};

use crate::{
    config::{consts::QUERY_LIMIT, ArchiveOptions},
    core::Fetch,
    error::Result,
    model::columns::{DERIVED_POSITION, ENAME, GOES_CLASS, PEAK},
    progress::Progress,
    reconcile::{self, reconcile, MergePolicy},
    scrape::collect_events,
    specs,
    store::{load_dataset, save_dataset, DataSet},
};

/// What a pipeline run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Snapshot links kept from the index (events pipeline only).
    pub snapshots_found: usize,
    /// URLs of snapshots that gave no rows, in index order.
    pub snapshots_skipped: Vec<String>,
    pub rows_scraped: usize,
    /// Rows in the table after the merge; 0 when nothing was written.
    pub rows_written: usize,
    pub rows_added: usize,
    pub written: Option<PathBuf>,
}

fn say(progress: &mut Option<&mut dyn Progress>, msg: &str) {
    logf!("{msg}");
    if let Some(p) = progress.as_deref_mut() {
        p.log(msg);
    }
}

/// Fetch the index, visit every kept snapshot, merge into the events table.
pub fn update_events(
    opts: &ArchiveOptions,
    fetcher: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    say(&mut progress, "EVENT SCRAPER STARTED ...");
    let mut summary = RunSummary::default();

    let links = specs::snapshots::fetch(fetcher, opts)?;
    if links.is_empty() {
        say(&mut progress, "No snapshot links found.");
        return Ok(summary);
    }
    summary.snapshots_found = links.len();
    say(&mut progress, &format!("Snapshot links found: {}", links.len()));

    // Reborrow for the pool only, so the reports below can use `progress` again.
    let pool_progress = progress.as_mut().map(|p| &mut **p as &mut dyn Progress);
    let collected = collect_events(fetcher, &links, &opts.net, pool_progress);
    summary.snapshots_skipped = collected.skipped.into_iter().map(|(url, _)| url).collect();

    say(
        &mut progress,
        &format!("Snapshots skipped (404/no data/etc): {}", summary.snapshots_skipped.len()),
    );
    if let Some(url) = summary.snapshots_skipped.first() {
        say(&mut progress, &format!("Example skipped URL: {url}"));
    }

    if collected.events.is_empty() {
        say(&mut progress, "No event rows scraped. Nothing to write.");
        return Ok(summary);
    }
    summary.rows_scraped = collected.events.len();
    say(&mut progress, &format!("Event rows scraped this run: {}", summary.rows_scraped));

    let fresh = DataSet::from_records(collected.events);
    merge_into(&opts.events_path, fresh, &reconcile::EVENTS, &mut summary)?;

    say(
        &mut progress,
        &format!(
            "[OK] Wrote {} unique events to {}. Added {} new unique events.",
            summary.rows_written,
            opts.events_path.display(),
            summary.rows_added
        ),
    );
    Ok(summary)
}

/// Read the archive index itself and merge it into the summary table.
pub fn update_summary(
    opts: &ArchiveOptions,
    fetcher: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    say(&mut progress, "SUMMARY SCRAPER STARTED ...");
    let mut summary = RunSummary::default();

    let records = specs::summary::fetch(fetcher, opts);
    if records.is_empty() {
        say(&mut progress, "No summary rows scraped.");
        return Ok(summary);
    }
    summary.rows_scraped = records.len();
    say(&mut progress, &format!("Summary rows scraped this run: {}", summary.rows_scraped));

    let fresh = DataSet::from_records(records);
    merge_into(&opts.summary_path, fresh, &reconcile::SUMMARY, &mut summary)?;

    say(
        &mut progress,
        &format!(
            "[OK] Wrote {} rows to {}. Added {} new rows.",
            summary.rows_written,
            opts.summary_path.display(),
            summary.rows_added
        ),
    );
    Ok(summary)
}

fn merge_into(
    path: &Path,
    fresh: DataSet,
    policy: &MergePolicy,
    summary: &mut RunSummary,
) -> Result<()> {
    let prior = load_dataset(path)?;
    let outcome = reconcile(prior, fresh, policy);
    if outcome.merged {
        save_dataset(path, &outcome.table)?;
        summary.rows_written = outcome.table.len();
        summary.rows_added = outcome.added;
        summary.written = Some(path.to_path_buf());
    }
    Ok(())
}

/* ---------------- Query ---------------- */

/// One X-class line of the query listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlareLine {
    pub ename: String,
    pub peak: String,
    pub goes_class: String,
    pub derived_position: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub total: usize,
    /// Up to [`QUERY_LIMIT`] rows whose class starts with `X`, in table order.
    /// `None` when the table has no class column at all.
    pub x_class: Option<Vec<FlareLine>>,
}

/// Read the events table back. `Ok(None)` when no table has been written yet.
pub fn query_events(path: &Path) -> Result<Option<EventQuery>> {
    if !path.exists() {
        return Ok(None);
    }
    let table = load_dataset(path)?;

    let x_class = table.column(GOES_CLASS).map(|_| {
        table
            .rows
            .iter()
            .filter(|row| table.cell(row, GOES_CLASS).starts_with('X'))
            .take(QUERY_LIMIT)
            .map(|row| FlareLine {
                ename: table.cell(row, ENAME).to_string(),
                peak: table.cell(row, PEAK).to_string(),
                goes_class: table.cell(row, GOES_CLASS).to_string(),
                derived_position: table.cell(row, DERIVED_POSITION).to_string(),
            })
            .collect()
    });

    Ok(Some(EventQuery { total: table.len(), x_class }))
}
