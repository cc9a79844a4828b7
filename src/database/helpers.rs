// Helper functions and utilities

use super::*;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Last timestamp handed out by `now_millis`
static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Current unix time in milliseconds, never going backwards within the process.
///
/// A wall clock step backwards would otherwise reorder the command log and
/// let a project's `last_access` regress.
pub(crate) fn now_millis() -> i64 {
    let wall = Utc::now().timestamp_millis();
    let previous = LAST_MILLIS.fetch_max(wall, Ordering::SeqCst);
    previous.max(wall)
}

/// Convert stored unix millis back into a UTC timestamp
pub(crate) fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

impl SessionStore {
    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connect()?;

        let total_files: i64 =
            conn.query_row("SELECT COUNT(*) FROM code_index", [], |row| row.get(0))?;

        let total_commands: i64 =
            conn.query_row("SELECT COUNT(*) FROM command_history", [], |row| row.get(0))?;

        let total_projects: i64 =
            conn.query_row("SELECT COUNT(*) FROM project_history", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT language FROM code_index
             WHERE language IS NOT NULL AND language != ''
             ORDER BY language",
        )?;

        let language_iter = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut languages = Vec::new();
        for lang_result in language_iter {
            languages.push(lang_result?);
        }

        let db_size_mb = if let Ok(metadata) = std::fs::metadata(&self.db_path) {
            metadata.len() as f64 / (1024.0 * 1024.0)
        } else {
            0.0
        };

        Ok(StoreStats {
            total_files,
            total_commands,
            total_projects,
            languages,
            db_size_mb,
        })
    }
}

/// Clamp a caller-supplied limit into an SQLite LIMIT value
pub(super) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
