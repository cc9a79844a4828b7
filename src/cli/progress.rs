/// Progress reporting while the indexing worker drains
///
/// Writes to stderr, leaving stdout clean for piped output.
use std::time::{Duration, Instant};

use crate::indexer::IndexingStatus;

const REPORT_INTERVAL: Duration = Duration::from_millis(500);

pub struct ProgressReporter {
    start_time: Instant,
    total_files: usize,
    last_report: Option<Instant>,
    quiet: bool,
}

impl ProgressReporter {
    pub fn new(total_files: usize, quiet: bool) -> Self {
        if !quiet {
            eprintln!("Indexing {} files", total_files);
        }
        Self {
            start_time: Instant::now(),
            total_files,
            last_report: None,
            quiet,
        }
    }

    /// Report a status snapshot (throttled)
    pub fn report(&mut self, status: &IndexingStatus) {
        if self.quiet || !status.is_indexing {
            return;
        }
        let now = Instant::now();
        if self
            .last_report
            .is_some_and(|last| now.duration_since(last) < REPORT_INTERVAL)
        {
            return;
        }
        self.last_report = Some(now);

        eprintln!(
            "Progress: {}/{} ({}%) - {} queued",
            status.indexed_files,
            self.total_files,
            percent(status.indexed_files, self.total_files),
            status.queue_size
        );
    }

    pub fn complete(&self, status: &IndexingStatus) {
        if self.quiet {
            return;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            status.indexed_files as f64 / elapsed
        } else {
            0.0
        };
        eprintln!(
            "Indexing complete: {} files in {:.2}s ({:.0} files/sec)",
            status.indexed_files, elapsed, rate
        );
    }
}

fn percent(processed: u64, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((processed as f64 / total as f64) * 100.0).min(100.0) as u32
}
