// src/progress.rs
/// Lightweight progress reporting for long-running pipelines.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One snapshot was visited and yielded rows. `index` is its 1-based position
    /// in the snapshot list; calls may arrive out of order.
    fn item_done(&mut self, _index: usize, _url: &str) {}

    /// One snapshot was skipped (absent page or no usable table).
    fn item_failed(&mut self, _index: usize, _url: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects log lines; handy for tests and for frontends that render later.
#[derive(Default, Debug)]
pub struct RecordingProgress {
    pub total: Option<usize>,
    pub lines: Vec<String>,
    pub done: usize,
    pub failed: usize,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, total: usize) { self.total = Some(total); }
    fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
    fn item_done(&mut self, _index: usize, _url: &str) { self.done += 1; }
    fn item_failed(&mut self, _index: usize, _url: &str) { self.failed += 1; }
}
