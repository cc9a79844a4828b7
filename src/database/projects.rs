// Project access history

use super::helpers::sql_limit;
use super::*;
use anyhow::Result;
use rusqlite::params;
use tracing::debug;

impl SessionStore {
    /// Record an access to `project_path` (idempotent).
    ///
    /// - First call inserts the row.
    /// - Later calls refresh `last_access`, which never moves backwards.
    pub fn upsert_project_access(&self, project_path: &str) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO project_history (project_path, last_access)
             VALUES (?1, ?2)
             ON CONFLICT(project_path) DO UPDATE SET
                last_access = MAX(project_history.last_access, excluded.last_access)",
            params![project_path, now_millis()],
        )?;

        debug!("Updated project access: {}", project_path);
        Ok(())
    }

    /// Most recently accessed projects first
    pub fn recent_projects(&self, limit: usize) -> Result<Vec<ProjectHistoryEntry>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT project_path, last_access
             FROM project_history
             ORDER BY last_access DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![sql_limit(limit)], |row| {
            Ok(ProjectHistoryEntry {
                project_path: row.get("project_path")?,
                last_access: millis_to_datetime(row.get("last_access")?),
            })
        })?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?);
        }

        Ok(projects)
    }
}
