// Database type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed source file (last-read snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub path: String,
    pub content: String,
    pub language: String,
    pub last_modified: i64, // Unix timestamp (seconds)
    pub size: u64,
}

/// A code search hit. Content is the full file; callers truncate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMatch {
    pub file_path: String,
    pub content: String,
    pub language: String,
}

/// A command search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMatch {
    pub command: String,
    pub output: String,
}

/// A full command log row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: i64,
    pub command: String,
    pub output: String,
    pub working_dir: String,
    pub timestamp: DateTime<Utc>,
    pub exit_code: i32,
}

/// Project root and its last access time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHistoryEntry {
    pub project_path: String,
    pub last_access: DateTime<Utc>,
}

/// Database statistics for health reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_files: i64,
    pub total_commands: i64,
    pub total_projects: i64,
    pub languages: Vec<String>,
    pub db_size_mb: f64,
}
