// Database schema initialization and table creation

use super::*;
use anyhow::Result;
use tracing::debug;

impl SessionStore {
    /// Create any missing tables.
    ///
    /// Column layout matches the files written by the Python release of the
    /// tool, so `CREATE TABLE IF NOT EXISTS` leaves a legacy file untouched and
    /// the migrations take it from there. Unique path indexes are added by
    /// migration 2, after duplicates have been collapsed.
    pub(super) fn initialize_schema(conn: &Connection) -> Result<()> {
        debug!("Creating database schema");

        Self::create_command_history_table(conn)?;
        Self::create_code_index_table(conn)?;
        Self::create_project_history_table(conn)?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Append-only log of executed commands
    pub(crate) fn create_command_history_table(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS command_history (
                id INTEGER PRIMARY KEY,
                command TEXT NOT NULL,
                output TEXT,
                working_dir TEXT,
                timestamp INTEGER NOT NULL,  -- unix millis
                exit_code INTEGER
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_command_history_timestamp
             ON command_history(timestamp)",
            [],
        )?;

        debug!("Created command_history table and indexes");
        Ok(())
    }

    /// Indexed source files, one row per path
    pub(crate) fn create_code_index_table(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS code_index (
                id INTEGER PRIMARY KEY,
                file_path TEXT NOT NULL,
                content TEXT,
                language TEXT,
                last_modified INTEGER,  -- unix seconds
                size INTEGER
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_code_index_language ON code_index(language)",
            [],
        )?;

        debug!("Created code_index table and indexes");
        Ok(())
    }

    /// Project roots and when they were last used
    pub(crate) fn create_project_history_table(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS project_history (
                id INTEGER PRIMARY KEY,
                project_path TEXT NOT NULL,
                last_access INTEGER NOT NULL  -- unix millis
            )",
            [],
        )?;

        debug!("Created project_history table");
        Ok(())
    }
}
