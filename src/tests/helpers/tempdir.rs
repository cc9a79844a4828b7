/// Test helper for creating unique temporary directories
///
/// Each test gets its own directory (and therefore its own SQLite file), so
/// tests can run in parallel without sharing state.
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn unique_temp_dir(test_name: &str) -> TempDir {
    let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let unique_name = format!("mcp_terminal_test_{}_{}_", test_name, counter);

    tempfile::Builder::new()
        .prefix(&unique_name)
        .tempdir()
        .expect("Failed to create unique temp directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_temp_dirs_are_different() {
        let dir1 = unique_temp_dir("test");
        let dir2 = unique_temp_dir("test");

        assert_ne!(dir1.path(), dir2.path());
        assert!(dir1.path().exists());
        assert!(dir2.path().exists());
    }

    #[test]
    fn test_temp_dir_is_removed_on_drop() {
        let path = {
            let dir = unique_temp_dir("cleanup");
            dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
