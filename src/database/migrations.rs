// Schema migration system for database versioning

use super::*;
use anyhow::{anyhow, Result};
use rusqlite::params;
use tracing::{debug, info};

/// Current schema version - increment when adding migrations
pub const LATEST_SCHEMA_VERSION: i32 = 3;

impl SessionStore {
    // ============================================================
    // SCHEMA MIGRATION SYSTEM
    // ============================================================

    /// Run all pending schema migrations
    pub(super) fn run_migrations(conn: &mut Connection) -> Result<()> {
        Self::create_schema_version_table(conn)?;

        let current_version = Self::schema_version_of(conn)?;
        let target_version = LATEST_SCHEMA_VERSION;

        if current_version >= target_version {
            debug!(
                "Database schema is up-to-date at version {}",
                current_version
            );
            return Ok(());
        }

        info!(
            "Running schema migrations: version {} -> {}",
            current_version, target_version
        );

        for version in (current_version + 1)..=target_version {
            info!("Applying migration to version {}", version);

            // Each step commits together with its version record
            let tx = conn.transaction()?;
            Self::apply_migration(&tx, version)?;
            Self::record_migration(&tx, version)?;
            tx.commit()?;

            info!("Migration to version {} completed", version);
        }

        Ok(())
    }

    fn create_schema_version_table(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL,
                description TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Get the current schema version of the store
    pub fn get_schema_version(&self) -> Result<i32> {
        let conn = self.connect()?;
        Self::schema_version_of(&conn)
    }

    fn schema_version_of(conn: &Connection) -> Result<i32> {
        let table_exists: bool = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table' AND name='schema_version'",
            [],
            |row| {
                let count: i32 = row.get(0)?;
                Ok(count > 0)
            },
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: i32 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;

        Ok(version)
    }

    fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
        match version {
            1 => Self::migration_001_initial_schema(conn)?,
            2 => Self::migration_002_unique_paths(conn)?,
            3 => Self::migration_003_integer_timestamps(conn)?,
            _ => return Err(anyhow!("Unknown migration version: {}", version)),
        }
        Ok(())
    }

    fn record_migration(conn: &Connection, version: i32) -> Result<()> {
        let description = match version {
            1 => "Initial schema",
            2 => "One row per file path and project path",
            3 => "Integer unix timestamps",
            _ => "Unknown migration",
        };

        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version, applied_at, description)
             VALUES (?1, ?2, ?3)",
            params![version, chrono::Utc::now().timestamp(), description],
        )?;

        Ok(())
    }

    // ============================================================
    // INDIVIDUAL MIGRATIONS
    // ============================================================

    /// Migration 001: Initial schema (for tracking purposes)
    fn migration_001_initial_schema(_conn: &Connection) -> Result<()> {
        // No-op: tables are created by initialize_schema()
        Ok(())
    }

    /// Migration 002: collapse duplicate rows and enforce one row per path.
    ///
    /// Older files were written with `INSERT OR REPLACE` against a table with
    /// no unique key, so every re-index appended another copy of the file.
    /// The newest copy (highest id) wins.
    fn migration_002_unique_paths(conn: &Connection) -> Result<()> {
        let removed_files = conn.execute(
            "DELETE FROM code_index
             WHERE id NOT IN (SELECT MAX(id) FROM code_index GROUP BY file_path)",
            [],
        )?;
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_code_index_path ON code_index(file_path)",
            [],
        )?;

        let removed_projects = conn.execute(
            "DELETE FROM project_history
             WHERE id NOT IN (SELECT MAX(id) FROM project_history GROUP BY project_path)",
            [],
        )?;
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_project_history_path
             ON project_history(project_path)",
            [],
        )?;

        if removed_files > 0 || removed_projects > 0 {
            info!(
                "Removed {} duplicate file rows and {} duplicate project rows",
                removed_files, removed_projects
            );
        }

        Ok(())
    }

    /// Migration 003: legacy `DATETIME` text and fractional mtimes become integers
    fn migration_003_integer_timestamps(conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE command_history
             SET timestamp = COALESCE(CAST(strftime('%s', timestamp) AS INTEGER), 0) * 1000
             WHERE typeof(timestamp) = 'text'",
            [],
        )?;

        conn.execute(
            "UPDATE project_history
             SET last_access = COALESCE(CAST(strftime('%s', last_access) AS INTEGER), 0) * 1000
             WHERE typeof(last_access) = 'text'",
            [],
        )?;

        conn.execute(
            "UPDATE code_index
             SET last_modified = CAST(last_modified AS INTEGER)
             WHERE typeof(last_modified) = 'real'",
            [],
        )?;

        Ok(())
    }
}
