// Command log operations

use super::helpers::sql_limit;
use super::*;
use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

impl SessionStore {
    /// Append one command to the log and return its row id.
    ///
    /// Rows are never updated or deleted afterwards.
    pub fn append_command(
        &self,
        command: &str,
        output: &str,
        working_dir: &str,
        exit_code: i32,
    ) -> Result<i64> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO command_history (command, output, working_dir, timestamp, exit_code)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![command, output, working_dir, now_millis(), exit_code],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Logged command #{}: {}", id, command);
        Ok(id)
    }

    /// Substring search over command text, newest first.
    ///
    /// An empty query matches every row, which makes this the
    /// "most recent N commands" query as well.
    pub fn search_commands(&self, query: &str, limit: usize) -> Result<Vec<CommandMatch>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT command, output
             FROM command_history
             WHERE instr(command, ?1) > 0
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![query, sql_limit(limit)], |row| {
            Ok(CommandMatch {
                command: row.get("command")?,
                output: row.get::<_, Option<String>>("output")?.unwrap_or_default(),
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        debug!("Command search for {:?}: {} matches", query, results.len());
        Ok(results)
    }

    /// Fetch one full log row by id
    pub fn get_command(&self, id: i64) -> Result<Option<CommandRecord>> {
        let conn = self.connect()?;

        let record = conn
            .query_row(
                "SELECT id, command, output, working_dir, timestamp, exit_code
                 FROM command_history WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CommandRecord {
                        id: row.get("id")?,
                        command: row.get("command")?,
                        output: row.get::<_, Option<String>>("output")?.unwrap_or_default(),
                        working_dir: row
                            .get::<_, Option<String>>("working_dir")?
                            .unwrap_or_default(),
                        timestamp: millis_to_datetime(
                            row.get::<_, Option<i64>>("timestamp")?.unwrap_or(0),
                        ),
                        exit_code: row.get::<_, Option<i32>>("exit_code")?.unwrap_or(0),
                    })
                },
            )
            .optional()?;

        Ok(record)
    }
}
