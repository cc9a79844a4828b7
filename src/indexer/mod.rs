//! Background Ingestion Pipeline
//!
//! Indexing a project is split in two so callers never wait on disk reads or
//! store writes:
//! 1. **Walk** - runs on the caller's thread inside [`IndexingQueue::start`],
//!    pruning deny-listed directories and enqueueing every eligible file
//! 2. **Drain** - a single background worker thread pops paths, reads them and
//!    upserts them into the [`SessionStore`]
//!
//! # Run state
//!
//! The pipeline is either `Idle` or `Draining`. It enters `Draining` when a
//! walk starts and only returns to `Idle` once, under the queue lock, the
//! queue is empty, no walk is still enumerating and the worker holds no item.
//! A momentarily empty queue during a long walk is therefore never mistaken
//! for completion.
//!
//! Concurrent `start` calls share the queue and the counters; the reported
//! project is whichever `start` ran last.

pub mod filtering;
pub mod ingest;
pub mod language;
pub mod status;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::database::SessionStore;

pub use filtering::FileFilter;
pub use language::detect_language;
pub use status::{IndexingPhase, IndexingStatus};

use status::StatusTracker;

/// How often `wait_until_idle` re-reads the status
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of one walk, returned once enumeration is complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkSummary {
    pub project: String,
    pub files_enqueued: usize,
    /// Directory entries the walk could not read
    pub entries_skipped: usize,
}

/// Worker tuning
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub poll_interval: Duration,
    pub max_file_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        let config = AppConfig::default();
        Self::from(&config)
    }
}

impl From<&AppConfig> for IngestOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.worker_poll_interval(),
            max_file_size: config.max_file_size,
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    paths: VecDeque<PathBuf>,
    walks_in_flight: usize,
    item_in_flight: bool,
    shutdown: bool,
}

impl QueueState {
    fn settled(&self) -> bool {
        self.paths.is_empty() && self.walks_in_flight == 0 && !self.item_in_flight
    }
}

/// State shared between callers and the worker thread
struct Shared {
    state: Mutex<QueueState>,
    available: Condvar,
    status: StatusTracker,
    store: SessionStore,
    options: IngestOptions,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop back to Idle if nothing is left to do. Caller holds the lock.
    fn settle_if_done(&self, state: &QueueState) {
        if state.settled() && self.status.phase() == IndexingPhase::Draining {
            self.status.set_phase(IndexingPhase::Idle);
            info!(
                "Indexing finished: {} files processed",
                self.status.snapshot().indexed_files
            );
        }
    }

    fn enqueue(&self, path: PathBuf) {
        let mut state = self.lock_state();
        state.paths.push_back(path);
        self.status.set_queue_size(state.paths.len());
        drop(state);
        self.available.notify_one();
    }
}

/// Marks a walk as finished even if enumeration bails out early
struct WalkGuard<'a> {
    shared: &'a Shared,
}

impl Drop for WalkGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock_state();
        state.walks_in_flight = state.walks_in_flight.saturating_sub(1);
        self.shared.settle_if_done(&state);
        drop(state);
        self.shared.available.notify_all();
    }
}

/// Producer/consumer ingestion pipeline with exactly one worker thread
pub struct IndexingQueue {
    shared: Arc<Shared>,
    filter: FileFilter,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl IndexingQueue {
    pub fn new(store: SessionStore, filter: FileFilter, options: IngestOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState::default()),
                available: Condvar::new(),
                status: StatusTracker::default(),
                store,
                options,
            }),
            filter,
            worker: Mutex::new(None),
        }
    }

    /// Index every eligible file under `project_root`.
    ///
    /// Records the project, resets the counter, makes sure the worker is
    /// running and walks the tree on the calling thread. Returns once
    /// enumeration is done; ingestion continues in the background.
    pub fn start(&self, project_root: &Path) -> Result<WalkSummary> {
        if !project_root.is_dir() {
            bail!("Not a directory: {}", project_root.display());
        }

        info!("Starting indexing for project: {}", project_root.display());

        {
            let mut state = self.shared.lock_state();
            state.walks_in_flight += 1;
            self.shared.status.begin_run(project_root);
            self.shared.status.set_phase(IndexingPhase::Draining);
        }
        let guard = WalkGuard {
            shared: &self.shared,
        };

        self.ensure_worker()?;

        let summary = self.walk(project_root);
        drop(guard);

        info!(
            "Enumerated {} files under {} ({} entries skipped)",
            summary.files_enqueued, summary.project, summary.entries_skipped
        );
        Ok(summary)
    }

    /// Spawn the worker unless one is already alive (idempotent)
    pub fn ensure_worker(&self) -> Result<()> {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);

        if worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Ok(());
        }

        if let Some(dead) = worker.take() {
            warn!("Indexing worker exited unexpectedly, restarting it");
            if dead.join().is_err() {
                error!("Indexing worker panicked");
            }
        }

        {
            let mut state = self.shared.lock_state();
            state.shutdown = false;
            // A worker that died mid-item never cleared its flag
            state.item_in_flight = false;
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("mcp-terminal-indexer".to_string())
            .spawn(move || run_worker(shared))
            .context("Failed to spawn indexing worker")?;

        debug!("Indexing worker started");
        *worker = Some(handle);
        Ok(())
    }

    pub fn is_worker_alive(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Best-effort progress snapshot; never blocks on the queue lock
    pub fn status(&self) -> IndexingStatus {
        self.shared.status.snapshot()
    }

    /// Poll until the pipeline is idle, calling `on_progress` with every
    /// snapshot. Fails if still draining after `timeout`.
    pub async fn watch_until_idle<F>(&self, timeout: Duration, mut on_progress: F) -> Result<IndexingStatus>
    where
        F: FnMut(&IndexingStatus),
    {
        let poll = async {
            loop {
                let status = self.status();
                on_progress(&status);
                if !status.is_indexing {
                    return status;
                }
                tokio::time::sleep(IDLE_POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| anyhow!("Indexing still running after {:?}", timeout))
    }

    pub async fn wait_until_idle(&self, timeout: Duration) -> Result<IndexingStatus> {
        self.watch_until_idle(timeout, |_| {}).await
    }

    /// Stop the worker and wait for it to exit. Items still queued stay queued.
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.lock_state();
            state.shutdown = true;
        }
        self.shared.available.notify_all();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Indexing worker panicked");
            }
            debug!("Indexing worker stopped");
        }
    }

    fn walk(&self, root: &Path) -> WalkSummary {
        let mut files_enqueued = 0;
        let mut entries_skipped = 0;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                // Prune below the root, never the root itself
                !(entry.depth() > 0
                    && entry.file_type().is_dir()
                    && self.filter.is_ignored_dir(entry.file_name()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    entries_skipped += 1;
                    continue;
                }
            };

            // Symlinked files are indexed; symlinked directories stay unfollowed
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink()
                    && std::fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file()));
            if !is_file {
                continue;
            }

            // Judge the project-relative path so the root's own ancestors don't count
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if self.filter.is_eligible(relative) {
                self.shared.enqueue(entry.into_path());
                files_enqueued += 1;
            }
        }

        WalkSummary {
            project: root.to_string_lossy().into_owned(),
            files_enqueued,
            entries_skipped,
        }
    }
}

impl Drop for IndexingQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(shared: Arc<Shared>) {
    info!("Background indexing worker started");

    loop {
        let path = {
            let mut state = shared.lock_state();
            loop {
                if state.shutdown {
                    info!("Background indexing worker stopping");
                    return;
                }

                if let Some(path) = state.paths.pop_front() {
                    state.item_in_flight = true;
                    shared.status.set_queue_size(state.paths.len());
                    break path;
                }

                shared.settle_if_done(&state);

                // Timed wait so emptiness and shutdown get re-checked
                let (guard, _) = shared
                    .available
                    .wait_timeout(state, shared.options.poll_interval)
                    .unwrap_or_else(PoisonError::into_inner);
                state = guard;
            }
        };

        index_one(&shared, &path);

        // Counts dequeued files, whether or not they were stored
        shared.status.record_processed();

        let mut state = shared.lock_state();
        state.item_in_flight = false;
        shared.settle_if_done(&state);
    }
}

fn index_one(shared: &Shared, path: &Path) {
    let result = ingest::read_indexed_file(path, shared.options.max_file_size)
        .and_then(|file| shared.store.upsert_file(&file));

    match result {
        Ok(()) => debug!("Indexed {}", path.display()),
        Err(e) => warn!("Error indexing {}: {:#}", path.display(), e),
    }
}
