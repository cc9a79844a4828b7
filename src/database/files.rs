// File operations

use super::helpers::sql_limit;
use super::*;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

impl SessionStore {
    /// Insert or replace the record for `file.path`.
    ///
    /// A re-index keeps the row id (storage order stays put) and overwrites
    /// content and metadata in place. No history is kept.
    pub fn upsert_file(&self, file: &IndexedFile) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO code_index (file_path, content, language, last_modified, size)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(file_path) DO UPDATE SET
                content = excluded.content,
                language = excluded.language,
                last_modified = excluded.last_modified,
                size = excluded.size",
            params![
                file.path,
                file.content,
                file.language,
                file.last_modified,
                i64::try_from(file.size).unwrap_or(i64::MAX)
            ],
        )?;

        debug!("Stored file: {} ({} bytes)", file.path, file.size);
        Ok(())
    }

    /// Fetch the stored snapshot for one path
    pub fn get_file(&self, path: &str) -> Result<Option<IndexedFile>> {
        let conn = self.connect()?;

        let file = conn
            .query_row(
                "SELECT file_path, content, language, last_modified, size
                 FROM code_index WHERE file_path = ?1",
                params![path],
                row_to_indexed_file,
            )
            .optional()?;

        Ok(file)
    }

    /// Case-sensitive substring search over file content.
    ///
    /// Results come back in storage order with the full content; `limit`
    /// bounds the number of rows, not the scan.
    pub fn search_files(&self, query: &str, limit: usize) -> Result<Vec<CodeMatch>> {
        let conn = self.connect()?;

        // instr() is case-sensitive, unlike LIKE
        let mut stmt = conn.prepare(
            "SELECT file_path, content, language
             FROM code_index
             WHERE instr(content, ?1) > 0
             ORDER BY id
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![query, sql_limit(limit)], |row| {
            Ok(CodeMatch {
                file_path: row.get("file_path")?,
                content: row.get::<_, Option<String>>("content")?.unwrap_or_default(),
                language: row.get::<_, Option<String>>("language")?.unwrap_or_default(),
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        debug!("Code search for {:?}: {} matches", query, results.len());
        Ok(results)
    }

    /// Number of indexed files
    pub fn file_count(&self) -> Result<i64> {
        let conn = self.connect()?;
        let count = conn.query_row("SELECT COUNT(*) FROM code_index", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_indexed_file(row: &Row) -> rusqlite::Result<IndexedFile> {
    let size: Option<i64> = row.get("size")?;

    Ok(IndexedFile {
        path: row.get("file_path")?,
        content: row.get::<_, Option<String>>("content")?.unwrap_or_default(),
        language: row.get::<_, Option<String>>("language")?.unwrap_or_default(),
        last_modified: row.get::<_, Option<i64>>("last_modified")?.unwrap_or(0),
        size: size.map(|s| s.max(0) as u64).unwrap_or(0),
    })
}
