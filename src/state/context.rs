//! Per-run statistics and activity log

use chrono::Local;
use std::collections::VecDeque;

/// Number of log entries kept for display
pub const LOG_CAPACITY: usize = 100;

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages classified as articles
    pub found: u64,

    /// Articles the sink accepted
    pub added: u64,

    /// Sink writes that failed
    pub errors: u64,
}

/// Bounded, append-only log of timestamped lines
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `[HH:MM:SS] message`, dropping the oldest entry when full
    pub fn push(&mut self, message: impl AsRef<str>) {
        let entry = format!("[{}] {}", Local::now().format("%H:%M:%S"), message.as_ref());
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

/// State owned by one run: counters plus the activity log
///
/// Created when a run starts, handed through each orchestrator step, and
/// returned when the run ends.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub stats: CrawlStats,
    pub log: ActivityLog,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a line in the activity log and mirrors it to tracing
    pub fn log(&mut self, message: impl AsRef<str>) {
        tracing::info!("{}", message.as_ref());
        self.log.push(message);
    }

    /// Like [`RunContext::log`] but mirrored at warn level
    pub fn warn(&mut self, message: impl AsRef<str>) {
        tracing::warn!("{}", message.as_ref());
        self.log.push(message);
    }

    pub fn record_found(&mut self) {
        self.stats.found += 1;
    }

    pub fn record_added(&mut self) {
        self.stats.added += 1;
    }

    pub fn record_error(&mut self) {
        self.stats.errors += 1;
    }
}
