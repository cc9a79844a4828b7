//! Indexing status tracking
//!
//! Readers get lock-free snapshots: the phase, the processed counter and the
//! queue depth are atomics. Only the worker and the walker write them, and
//! phase transitions happen while the queue lock is held (see `IndexingQueue`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Run phase of the ingestion pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingPhase {
    /// No walk in progress and the worker has caught up
    Idle,
    /// A walk has started; items may still be entering the queue
    Draining,
}

/// Best-effort snapshot of ingestion progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingStatus {
    pub is_indexing: bool,
    /// Most recent project passed to `start`, empty before the first run
    pub project: String,
    /// Files dequeued in the current run (stored or failed)
    pub indexed_files: u64,
    pub queue_size: usize,
}

#[derive(Debug, Default)]
pub(crate) struct StatusTracker {
    draining: AtomicBool,
    indexed_files: AtomicU64,
    queue_size: AtomicUsize,
    project: RwLock<Option<PathBuf>>,
}

impl StatusTracker {
    /// New run: record the project and reset the counter
    pub(crate) fn begin_run(&self, project: &Path) {
        *self
            .project
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(project.to_path_buf());
        self.indexed_files.store(0, Ordering::SeqCst);
    }

    pub(crate) fn set_phase(&self, phase: IndexingPhase) {
        self.draining
            .store(phase == IndexingPhase::Draining, Ordering::SeqCst);
    }

    pub(crate) fn phase(&self) -> IndexingPhase {
        if self.draining.load(Ordering::SeqCst) {
            IndexingPhase::Draining
        } else {
            IndexingPhase::Idle
        }
    }

    pub(crate) fn record_processed(&self) {
        self.indexed_files.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn set_queue_size(&self, size: usize) {
        self.queue_size.store(size, Ordering::SeqCst);
    }

    pub(crate) fn snapshot(&self) -> IndexingStatus {
        let project = self
            .project
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        IndexingStatus {
            is_indexing: self.phase() == IndexingPhase::Draining,
            project,
            indexed_files: self.indexed_files.load(Ordering::SeqCst),
            queue_size: self.queue_size.load(Ordering::SeqCst),
        }
    }
}
