// tests/events_pipeline.rs
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use flare_scrape::config::ArchiveOptions;
use flare_scrape::core::net::FixtureFetcher;
use flare_scrape::progress::{NullProgress, RecordingProgress};
use flare_scrape::runner::{query_events, update_events};
use flare_scrape::store::load_dataset;

const BASE: &str = "https://archive.test/solarsoft/latest_events_archive.html";

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("flare_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn opts(dir: &PathBuf) -> ArchiveOptions {
    let mut o = ArchiveOptions::default();
    o.base_url = BASE.to_string();
    o.events_path = dir.join("events.csv");
    o.summary_path = dir.join("summary.csv");
    o.net.workers = 3;
    o.net.request_pause = Duration::ZERO;
    o
}

fn snap_url(stamp: &str) -> String {
    let slug: String = stamp.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("https://archive.test/solarsoft/snap_{slug}/index.html")
}

/// Archive index, newest first, one linked row per snapshot.
fn index_page(stamps: &[&str]) -> String {
    let mut doc = String::from(
        "<html><body><h2>Archive</h2><table border=1>\n\
         <tr><th>Snapshot<th>Start<th>End<th>#<th>Largest<th>C<th>M<th>X<th>P</tr>\n",
    );
    for st in stamps {
        let slug: String = st.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        doc.push_str(&format!(
            "<tr><td><a href=\"snap_{slug}/index.html\">{st}</a>\
             <td>{st}<td>{st}<td>3<td>M1.0<td>2<td>1<td>0<td>0\n"
        ));
    }
    doc.push_str("</table></body></html>");
    doc
}

/// (EName, Peak, Class) triples as a snapshot's event table.
fn snapshot_page(events: &[(&str, &str, &str)]) -> String {
    let mut doc = String::from(
        "<html><body><table><tr><td>\n\
         <table cellpadding=2>\n\
         <tr><th>Event#<th>EName<th>Start<th>Stop<th>Peak<th>GOES Class<th>Derived Position\n",
    );
    for (i, (name, peak, class)) in events.iter().enumerate() {
        doc.push_str(&format!(
            "<tr><td>{i}<td><a href=\"{name}/\">{name}</a><td>2021/01/01 00:00:00\
             <td>2021/01/01 03:00:00<td>{peak}<td>{class}<td>S17W88 ( 13664 )\n"
        ));
    }
    doc.push_str("</table>\n</td></tr></table></body></html>");
    doc
}

#[test]
fn second_identical_run_is_byte_identical_and_adds_nothing() {
    let dir = tmp_dir("idempotent");
    let o = opts(&dir);
    let fetcher = FixtureFetcher::new()
        .with_page(BASE, &index_page(&["02-Jan-2021 00:00", "01-Jan-2021 00:00"]))
        .with_page(
            &snap_url("02-Jan-2021 00:00"),
            &snapshot_page(&[("gev_2", "2021/01/02 02:00:00", "X1.1"), ("gev_1", "2021/01/01 01:30:00", "C2.0")]),
        )
        .with_page(
            &snap_url("01-Jan-2021 00:00"),
            &snapshot_page(&[("gev_1", "2021/01/01 01:00:00", "C1.0")]),
        );

    let first = update_events(&o, &fetcher, Some(&mut NullProgress)).unwrap();
    assert_eq!(first.rows_added, 2);
    assert_eq!(first.rows_written, 2);
    let bytes_first = fs::read(&o.events_path).unwrap();

    let second = update_events(&o, &fetcher, None).unwrap();
    assert_eq!(second.rows_added, 0);
    assert_eq!(second.rows_written, 2);
    assert_eq!(fs::read(&o.events_path).unwrap(), bytes_first);
}

#[test]
fn later_snapshot_replaces_event_and_row_delta_is_reported() {
    let dir = tmp_dir("recency");
    let o = opts(&dir);

    let old = FixtureFetcher::new()
        .with_page(BASE, &index_page(&["01-Jan-2021 00:00"]))
        .with_page(
            &snap_url("01-Jan-2021 00:00"),
            &snapshot_page(&[("E1", "2021-01-01T01:00", "C1.0")]),
        );
    update_events(&o, &old, None).unwrap();

    let new = FixtureFetcher::new()
        .with_page(BASE, &index_page(&["02-Jan-2021 00:00"]))
        .with_page(
            &snap_url("02-Jan-2021 00:00"),
            &snapshot_page(&[("E1", "2021-01-02T02:00", "M3.0"), ("E2", "2021-01-02T05:00", "C4.0")]),
        );
    let run = update_events(&o, &new, None).unwrap();
    assert_eq!(run.rows_added, 1);
    assert_eq!(run.rows_written, 2);

    let table = load_dataset(&o.events_path).unwrap();
    assert_eq!(table.len(), 2);
    let e1 = table.rows.iter().find(|r| table.cell(r, "EName") == "E1").unwrap();
    assert_eq!(table.cell(e1, "Snapshot Time"), "02-Jan-2021 00:00");
    assert_eq!(table.cell(e1, "Peak"), "2021-01-02T02:00");
    assert_eq!(table.cell(e1, "GOES Class"), "M3.0");
    assert_eq!(table.cell(e1, "Snapshot URL"), snap_url("02-Jan-2021 00:00"));

    // Replaying the older snapshot doesn't win the key back.
    let run = update_events(&o, &old, None).unwrap();
    assert_eq!(run.rows_added, 0);
    let table = load_dataset(&o.events_path).unwrap();
    let e1 = table.rows.iter().find(|r| table.cell(r, "EName") == "E1").unwrap();
    assert_eq!(table.cell(e1, "Snapshot Time"), "02-Jan-2021 00:00");
}

#[test]
fn index_scan_stops_at_first_snapshot_before_cutoff() {
    let dir = tmp_dir("cutoff");
    let o = opts(&dir);
    let stamps = ["10-Jun-2022 12:00", "01-Mar-2021 00:00", "31-Dec-2019 23:59", "02-Feb-2023 08:00"];
    let mut fetcher = FixtureFetcher::new().with_page(BASE, &index_page(&stamps));
    for (i, st) in stamps.iter().enumerate() {
        let name = format!("gev_{i}");
        fetcher.insert(&snap_url(st), &snapshot_page(&[(name.as_str(), "2022/01/01 00:00:00", "C1.0")]));
    }

    let run = update_events(&o, &fetcher, None).unwrap();
    assert_eq!(run.snapshots_found, 2);
    let table = load_dataset(&o.events_path).unwrap();
    let mut names: Vec<&str> = table.rows.iter().map(|r| table.cell(r, "EName")).collect();
    names.sort();
    assert_eq!(names, vec!["gev_0", "gev_1"]);
}

#[test]
fn nothing_extracted_leaves_table_untouched() {
    let dir = tmp_dir("noop");
    let o = opts(&dir);
    fs::write(&o.events_path, "EName,Peak\nkept,x\n").unwrap();
    let before = fs::read(&o.events_path).unwrap();

    // Index lists snapshots but every page is missing.
    let fetcher = FixtureFetcher::new().with_page(BASE, &index_page(&["02-Jan-2021 00:00", "01-Jan-2021 00:00"]));
    let mut rec = RecordingProgress::default();
    let run = update_events(&o, &fetcher, Some(&mut rec)).unwrap();

    assert_eq!(run.rows_added, 0);
    assert_eq!(run.written, None);
    assert_eq!(run.snapshots_skipped.len(), 2);
    assert_eq!(fs::read(&o.events_path).unwrap(), before);
    assert!(rec.lines.contains(&"Snapshots skipped (404/no data/etc): 2".to_string()));
    assert!(rec.lines.contains(&format!("Example skipped URL: {}", snap_url("02-Jan-2021 00:00"))));
    assert_eq!(rec.lines.last().unwrap(), "No event rows scraped. Nothing to write.");
}

#[test]
fn unreachable_index_is_a_quiet_no_op() {
    let dir = tmp_dir("no_index");
    let o = opts(&dir);
    let mut rec = RecordingProgress::default();
    let run = update_events(&o, &FixtureFetcher::new(), Some(&mut rec)).unwrap();
    assert_eq!(run.snapshots_found, 0);
    assert!(!o.events_path.exists());
    assert_eq!(rec.lines, vec!["EVENT SCRAPER STARTED ...", "No snapshot links found."]);
}

#[test]
fn short_rows_never_reach_the_table() {
    let dir = tmp_dir("short_rows");
    let o = opts(&dir);
    let mut page = snapshot_page(&[("gev_ok", "2021/01/02 02:00:00", "C1.0")]);
    page = page.replace(
        "</table>\n</td>",
        "<tr><td>9<td>gev_short<td>a<td>b<td>c<td>C9.9\n</table>\n</td>",
    );
    let fetcher = FixtureFetcher::new()
        .with_page(BASE, &index_page(&["02-Jan-2021 00:00"]))
        .with_page(&snap_url("02-Jan-2021 00:00"), &page);

    update_events(&o, &fetcher, None).unwrap();
    let table = load_dataset(&o.events_path).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.cell(&table.rows[0], "EName"), "gev_ok");
}

#[test]
fn run_report_and_query_read_back() {
    let dir = tmp_dir("report");
    let o = opts(&dir);
    let fetcher = FixtureFetcher::new()
        .with_page(BASE, &index_page(&["02-Jan-2021 00:00", "01-Jan-2021 00:00"]))
        .with_page(
            &snap_url("02-Jan-2021 00:00"),
            &snapshot_page(&[("gev_b", "2021/01/02 02:00:00", "X2.0"), ("gev_a", "2021/01/01 09:00:00", "M1.0")]),
        );

    let mut rec = RecordingProgress::default();
    update_events(&o, &fetcher, Some(&mut rec)).unwrap();
    assert_eq!(rec.total, Some(2));
    assert_eq!(rec.done, 1);
    assert_eq!(rec.failed, 1);
    assert_eq!(
        rec.lines,
        vec![
            "EVENT SCRAPER STARTED ...".to_string(),
            "Snapshot links found: 2".to_string(),
            "Snapshots skipped (404/no data/etc): 1".to_string(),
            format!("Example skipped URL: {}", snap_url("01-Jan-2021 00:00")),
            "Event rows scraped this run: 2".to_string(),
            format!(
                "[OK] Wrote 2 unique events to {}. Added 2 new unique events.",
                o.events_path.display()
            ),
        ]
    );

    let q = query_events(&o.events_path).unwrap().unwrap();
    assert_eq!(q.total, 2);
    let x = q.x_class.unwrap();
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].ename, "gev_b");
    assert_eq!(x[0].peak, "2021/01/02 02:00:00");
    assert_eq!(x[0].derived_position, "S17W88 ( 13664 )");
}

#[test]
fn time_of_day_peaks_order_and_break_ties() {
    let dir = tmp_dir("clock_peaks");
    let o = opts(&dir);
    let stamp = "14-May-2024 16:00";

    let first = FixtureFetcher::new()
        .with_page(BASE, &index_page(&[stamp]))
        .with_page(&snap_url(stamp), &snapshot_page(&[("A", "12:20:00", "C1.0"), ("B", "15:41:00", "X1.0")]));
    update_events(&o, &first, None).unwrap();

    let table = load_dataset(&o.events_path).unwrap();
    let names: Vec<&str> = table.rows.iter().map(|r| table.cell(r, "EName")).collect();
    assert_eq!(names, vec!["B", "A"]);

    // Same snapshot republished with a later peak for A.
    let revised = FixtureFetcher::new()
        .with_page(BASE, &index_page(&[stamp]))
        .with_page(&snap_url(stamp), &snapshot_page(&[("A", "16:10:00", "M2.0")]));
    let run = update_events(&o, &revised, None).unwrap();
    assert_eq!(run.rows_added, 0);

    let table = load_dataset(&o.events_path).unwrap();
    let names: Vec<&str> = table.rows.iter().map(|r| table.cell(r, "EName")).collect();
    let peaks: Vec<&str> = table.rows.iter().map(|r| table.cell(r, "Peak")).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(peaks, vec!["16:10:00", "15:41:00"]);
}
