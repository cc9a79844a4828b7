pub mod tempdir;

pub use tempdir::unique_temp_dir;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::database::{IndexedFile, SessionStore};
use crate::indexer::{FileFilter, IndexingQueue, IngestOptions};
use crate::config::AppConfig;

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Fresh store in its own directory; keep the `TempDir` alive for the test
pub fn open_test_store(test_name: &str) -> (tempfile::TempDir, SessionStore) {
    let temp_dir = unique_temp_dir(test_name);
    let store = SessionStore::open(temp_dir.path().join("session_history.db")).unwrap();
    (temp_dir, store)
}

/// Queue with the default filter and a short worker poll interval
pub fn test_queue(store: &SessionStore) -> IndexingQueue {
    let config = AppConfig::default();
    let options = IngestOptions {
        poll_interval: Duration::from_millis(20),
        max_file_size: config.max_file_size,
    };
    IndexingQueue::new(
        store.clone(),
        FileFilter::from_config(&config).unwrap(),
        options,
    )
}

pub fn indexed_file(path: &str, content: &str, language: &str) -> IndexedFile {
    IndexedFile {
        path: path.to_string(),
        content: content.to_string(),
        language: language.to_string(),
        last_modified: 1_700_000_000,
        size: content.len() as u64,
    }
}
