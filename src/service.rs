//! Operation surface
//!
//! `TerminalContextService` owns one store handle, one ingestion queue and one
//! context assembler. Every public operation validates its input first and
//! returns [`ServiceError::InvalidInput`] before touching the queue or the
//! store. Results are serde types so any transport can hand them out as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{self, AppConfig};
use crate::context::{ContextAssembler, ContextBundle};
use crate::database::{CodeMatch, CommandMatch, ProjectHistoryEntry, SessionStore, StoreStats};
use crate::error::{Result, ServiceError};
use crate::indexer::{FileFilter, IndexingQueue, IndexingStatus, IngestOptions, WalkSummary};
use crate::utils::{best_effort, non_blank};

pub const DEFAULT_CODE_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_COMMAND_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_RECENT_PROJECTS_LIMIT: usize = 5;

/// Acknowledgement for `log_command`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogCommandAck {
    /// False when the store write failed; the failure was logged
    pub logged: bool,
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub worker_alive: bool,
    pub indexing: IndexingStatus,
    pub store: StoreStats,
}

pub struct TerminalContextService {
    store: SessionStore,
    queue: IndexingQueue,
    assembler: ContextAssembler,
}

impl TerminalContextService {
    /// Open the store under `data_dir` and wire the components from `config`
    pub fn open(config: AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let store = SessionStore::open(config.db_path(data_dir))?;
        let filter = FileFilter::from_config(&config)?;
        let queue = IndexingQueue::new(store.clone(), filter, IngestOptions::from(&config));
        let assembler = ContextAssembler::new(store.clone(), config.context.clone());

        info!("Service ready (store: {})", store.path().display());

        Ok(Self {
            store,
            queue,
            assembler,
        })
    }

    /// Open using the per-user data directory and its configuration file
    pub fn open_default() -> anyhow::Result<Self> {
        let data_dir = config::data_dir()?;
        let config = AppConfig::load_or_init(&data_dir)?;
        Self::open(config, &data_dir)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Walk `project_path` and queue its eligible files for background ingestion
    pub fn start_indexing(&self, project_path: &str) -> Result<WalkSummary> {
        let root = resolve_project_dir(project_path)?;

        let project = root.to_string_lossy();
        best_effort("refresh project access", || {
            self.store.upsert_project_access(&project)
        });

        Ok(self.queue.start(&root)?)
    }

    pub fn indexing_status(&self) -> IndexingStatus {
        self.queue.status()
    }

    /// Block (asynchronously) until the worker has drained the queue
    pub async fn wait_until_idle(&self, timeout: Duration) -> Result<IndexingStatus> {
        Ok(self.queue.wait_until_idle(timeout).await?)
    }

    pub async fn watch_until_idle<F>(&self, timeout: Duration, on_progress: F) -> Result<IndexingStatus>
    where
        F: FnMut(&IndexingStatus),
    {
        Ok(self.queue.watch_until_idle(timeout, on_progress).await?)
    }

    pub fn search_code(&self, query: &str, limit: Option<usize>) -> Result<Vec<CodeMatch>> {
        if query.is_empty() {
            return Err(ServiceError::invalid("query is required"));
        }
        let limit = limit.unwrap_or(DEFAULT_CODE_SEARCH_LIMIT);
        Ok(self.store.search_files(query, limit)?)
    }

    pub fn search_commands(&self, query: &str, limit: Option<usize>) -> Result<Vec<CommandMatch>> {
        if query.is_empty() {
            return Err(ServiceError::invalid("query is required"));
        }
        let limit = limit.unwrap_or(DEFAULT_COMMAND_SEARCH_LIMIT);
        Ok(self.store.search_commands(query, limit)?)
    }

    /// Append to the command log. A failed write is reported, never raised.
    pub fn log_command(
        &self,
        command: &str,
        output: &str,
        working_dir: &str,
        exit_code: i32,
    ) -> Result<LogCommandAck> {
        if non_blank(command).is_none() {
            return Err(ServiceError::invalid("command is required"));
        }

        let mut id = None;
        let logged = best_effort("log command", || {
            self.store
                .append_command(command, output, working_dir, exit_code)
                .map(|new_id| id = Some(new_id))
        });

        debug!("Logged command {:?} (stored: {})", command, logged);
        Ok(LogCommandAck { logged, id })
    }

    pub fn build_context(&self, query: &str, project_path: &str) -> Result<ContextBundle> {
        if query.is_empty() {
            return Err(ServiceError::invalid("query is required"));
        }
        let root = normalize_project_path(project_path)?;
        Ok(self
            .assembler
            .build_context(query, &root.to_string_lossy())?)
    }

    pub fn recent_projects(&self, limit: Option<usize>) -> Result<Vec<ProjectHistoryEntry>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_PROJECTS_LIMIT);
        Ok(self.store.recent_projects(limit)?)
    }

    pub fn health(&self) -> Result<HealthReport> {
        let store = self.store.stats()?;
        let worker_alive = self.queue.is_worker_alive();
        let indexing = self.queue.status();

        // The worker starts lazily, so a missing worker is only bad mid-run
        let status = if indexing.is_indexing && !worker_alive {
            "degraded"
        } else {
            "healthy"
        };

        Ok(HealthReport {
            status: status.to_string(),
            timestamp: Utc::now(),
            worker_alive,
            indexing,
            store,
        })
    }

    /// Stop the background worker. Also happens on drop.
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }
}

/// Absolute form of `project_path` with `.` segments and trailing separators
/// removed, so one root always maps to one project history row
fn normalize_project_path(project_path: &str) -> Result<PathBuf> {
    let trimmed = non_blank(project_path)
        .ok_or_else(|| ServiceError::invalid("project path is required"))?;

    let absolute = std::path::absolute(trimmed)
        .map_err(|e| ServiceError::invalid(format!("invalid project path {}: {}", trimmed, e)))?;

    Ok(absolute.components().collect())
}

fn resolve_project_dir(project_path: &str) -> Result<PathBuf> {
    let root = normalize_project_path(project_path)?;

    if !root.is_dir() {
        return Err(ServiceError::invalid(format!(
            "project path is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}
