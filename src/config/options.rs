// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Everything a run needs to know about where to read and write.
/// Built once by the frontend and handed to each component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub base_url: String,
    /// Inclusive lower bound on snapshot/report years.
    pub min_year: i32,
    pub events_path: PathBuf,
    pub summary_path: PathBuf,
    pub log_file: PathBuf,
    pub net: NetOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetOptions {
    pub timeout: Duration,
    pub user_agent: String,
    /// Snapshot fetchers running at once. 1 = strictly sequential.
    pub workers: usize,
    pub request_pause: Duration,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            min_year: MIN_YEAR,
            events_path: PathBuf::from(EVENTS_CSV_PATH),
            summary_path: PathBuf::from(SUMMARY_CSV_PATH),
            log_file: PathBuf::from(LOG_FILE),
            net: NetOptions::default(),
        }
    }
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(TIMEOUT_SECS),
            user_agent: s!(USER_AGENT),
            workers: WORKERS,
            request_pause: Duration::from_millis(REQUEST_PAUSE_MS),
        }
    }
}

impl NetOptions {
    /// Pause after the `seq`-th request of a run, jittered by `seq` so the
    /// workers' requests don't line up.
    pub fn pause_for(&self, seq: usize) -> Duration {
        if self.request_pause.is_zero() {
            return Duration::ZERO;
        }
        let jitter = (seq as u64) % JITTER_MS;
        self.request_pause + Duration::from_millis(jitter)
    }
}
