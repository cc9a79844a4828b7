//! MCP Terminal's Database Module - SQLite session history
//!
//! One SQLite file holds three logical tables: indexed code files, the
//! append-only command log and the project access history. Split into
//! focused modules by table.

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

// Module declarations
mod commands;
mod files;
mod helpers;
mod migrations;
mod projects;
mod schema;
pub mod types;

// Re-export public types
pub(crate) use helpers::{millis_to_datetime, now_millis};
pub use migrations::LATEST_SCHEMA_VERSION;
pub use types::*;

/// Wait up to 5 seconds for a competing connection to release its lock
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Handle on the session database file.
///
/// The handle only carries the file path. Every operation opens its own
/// short-lived connection, so the ingestion worker and request handlers never
/// share a transaction and cannot deadlock each other. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SessionStore {
    pub(crate) db_path: PathBuf,
}

impl SessionStore {
    /// Open (or create) the database file, initialize the schema and run any
    /// pending migrations.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        info!("Initializing SQLite session store at: {}", db_path.display());

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    )
                })?;
            }
        }

        let store = Self { db_path };
        let mut conn = store.connect()?;

        // journal_mode is persisted in the file header, so setting it once is enough
        let journal: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("SQLite journal mode: {}", journal);

        Self::initialize_schema(&conn)?;
        Self::run_migrations(&mut conn)?;

        info!("Session store initialized successfully");
        Ok(store)
    }

    /// Path of the underlying SQLite file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open a fresh connection for a single logical operation
    pub(crate) fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).map_err(|e| {
            anyhow!(
                "Failed to open database {}: {}",
                self.db_path.display(),
                e
            )
        })?;

        conn.busy_timeout(BUSY_TIMEOUT)?;

        // Keep the WAL from growing unbounded while the worker streams writes
        conn.pragma_update(None, "wal_autocheckpoint", 2000)?;

        Ok(conn)
    }
}
