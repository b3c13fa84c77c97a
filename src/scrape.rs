// src/scrape.rs
use std::{
    thread,
    sync::{ mpsc, atomic::{ AtomicUsize, Ordering }},
};

use crate::{
    config::options::NetOptions,
    core::Fetch,
    model::EventRecord,
    progress::Progress,
    specs::{ events::{ self, Skip }, snapshots::SnapshotLink },
};

/// Everything pulled out of one pass over the snapshot list.
#[derive(Debug, Default)]
pub struct Collected {
    /// Events in snapshot-list order, whatever order the fetches finished in.
    pub events: Vec<EventRecord>,
    /// Snapshots that gave nothing, in snapshot-list order.
    pub skipped: Vec<(String, Skip)>,
}

/// Visit every snapshot and extract its events.
///
/// Up to `net.workers` fetches run at once (1 = one after another). Results are
/// put back in list order before returning, so the caller sees the same rows
/// in the same order however the fetches interleave.
pub fn collect_events(
    fetcher: &dyn Fetch,
    links: &[SnapshotLink],
    net: &NetOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Collected {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(links.len());
    }
    if links.is_empty() {
        return Collected::default();
    }

    type FetchResult = (usize, Result<Vec<EventRecord>, Skip>);

    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<FetchResult>();
    let workers = net.workers.min(links.len()).max(1);

    let mut results: Vec<FetchResult> = Vec::with_capacity(links.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let idx = &counter;
            scope.spawn(move || {
                loop {
                    let i = idx.fetch_add(1, Ordering::Relaxed);
                    if i >= links.len() {
                        break;
                    }
                    let result = events::fetch(fetcher, &links[i]);
                    if tx.send((i, result)).is_err() {
                        break;
                    }
                    if i + 1 < links.len() {
                        thread::sleep(net.pause_for(i)); // be polite
                    }
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        // Aggregate results as they arrive
        for (i, result) in res_rx.iter() {
            let url = links[i].url.as_str();
            match &result {
                Ok(rows) => {
                    logd!("Snapshot {url}: {} events", rows.len());
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(i + 1, url);
                    }
                }
                Err(why) => {
                    loge!("Snapshot {url}: skipped ({why:?})");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(i + 1, url);
                    }
                }
            }
            results.push((i, result));
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    // Sort
    results.sort_by_key(|(i, _)| *i);
    let mut out = Collected::default();
    for (i, result) in results {
        match result {
            Ok(mut rows) => out.events.append(&mut rows),
            Err(why) => out.skipped.push((links[i].url.clone(), why)),
        }
    }
    out
}
