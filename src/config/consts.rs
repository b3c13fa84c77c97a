// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://lmsal.com/solarsoft/latest_events_archive.html";
pub const USER_AGENT: &str = "Mozilla/5.0";
pub const TIMEOUT_SECS: u64 = 30;

// Scrape
pub const MIN_YEAR: i32 = 2020;
pub const SNAPSHOT_TIME_FORMAT: &str = "%d-%b-%Y %H:%M";
pub const PROGRESS_EVERY: usize = 20;

// Local tables
pub const EVENTS_CSV_PATH: &str = "lmsal_events.csv";
pub const SUMMARY_CSV_PATH: &str = "lmsal_latest_events_archive.csv";

// Debug log
pub const LOG_FILE: &str = ".store/debug.log";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms

// Query
pub const QUERY_LIMIT: usize = 20;
