// Eligibility and pruning during the walk

use crate::indexer::FileFilter;
use crate::tests::helpers::{open_test_store, test_queue, unique_temp_dir, write_file};
use std::path::Path;
use std::time::Duration;

#[tokio::test]
async fn test_walk_enqueues_only_eligible_files() {
    let (_store_dir, store) = open_test_store("walk_eligible");
    let project = unique_temp_dir("walk_project");
    let root = project.path();

    write_file(root, "a.py", "print('a')");
    write_file(root, "a.md", "# A");
    write_file(root, "a.txt", "plain text");
    write_file(root, "node_modules/b.py", "print('b')");
    write_file(root, "src/nested/c.RS", "fn c() {}");

    let queue = test_queue(&store);
    let summary = queue.start(root).unwrap();
    assert_eq!(summary.files_enqueued, 3);

    queue.wait_until_idle(Duration::from_secs(10)).await.unwrap();

    let stored = |relative: &str| {
        let path = root.join(relative);
        store.get_file(&path.to_string_lossy()).unwrap().is_some()
    };
    assert!(stored("a.py"));
    assert!(stored("a.md"));
    assert!(stored("src/nested/c.RS"));
    assert!(!stored("a.txt"));
    assert!(!stored("node_modules/b.py"));
    assert_eq!(store.file_count().unwrap(), 3);
}

#[tokio::test]
async fn test_project_inside_ignored_directory_is_still_indexed() {
    let (_store_dir, store) = open_test_store("walk_nested_root");
    let outer = unique_temp_dir("walk_outer");
    // The project root itself lives under a deny-listed name
    let root = outer.path().join("build").join("app");
    write_file(&root, "main.go", "package main");
    write_file(&root, "dist/bundle.js", "var x;");

    let queue = test_queue(&store);
    let summary = queue.start(&root).unwrap();
    assert_eq!(summary.files_enqueued, 1);

    queue.wait_until_idle(Duration::from_secs(10)).await.unwrap();
    assert_eq!(store.file_count().unwrap(), 1);
}

#[test]
fn test_start_rejects_missing_directory() {
    let (_store_dir, store) = open_test_store("walk_missing");
    let queue = test_queue(&store);

    assert!(queue.start(Path::new("/definitely/not/here")).is_err());
    assert!(!queue.status().is_indexing);
}

#[test]
fn test_filter_rules() {
    let filter = FileFilter::new([".py", ".md"], ["node_modules", ".git"]);

    assert!(filter.is_eligible(Path::new("src/app.py")));
    assert!(filter.is_eligible(Path::new("README.MD")));
    assert!(!filter.is_eligible(Path::new("notes.txt")));
    assert!(!filter.is_eligible(Path::new("Makefile")));
    assert!(!filter.is_eligible(Path::new("web/node_modules/pkg/index.py")));
    assert!(!filter.is_eligible(Path::new(".git/hooks/pre-commit.py")));

    let with_globs = filter.with_ignore_patterns(&["**/generated/*"]).unwrap();
    assert!(!with_globs.is_eligible(Path::new("src/generated/schema.py")));
    assert!(with_globs.is_eligible(Path::new("src/schema.py")));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_files_are_indexed_but_linked_dirs_are_not_followed() {
    use std::os::unix::fs::symlink;

    let (_store_dir, store) = open_test_store("walk_symlinks");
    let project = unique_temp_dir("walk_symlink_project");
    let outside = unique_temp_dir("walk_symlink_target");
    let root = project.path();

    write_file(root, "main.py", "import util");
    let target = write_file(outside.path(), "helpers.py", "def shared_helper(): pass");
    write_file(outside.path(), "lib/deep.py", "def deep_helper(): pass");
    symlink(&target, root.join("util.py")).unwrap();
    symlink(outside.path().join("lib"), root.join("vendored")).unwrap();

    let queue = test_queue(&store);
    let summary = queue.start(root).unwrap();
    assert_eq!(summary.files_enqueued, 2);

    queue.wait_until_idle(Duration::from_secs(10)).await.unwrap();

    let hits = store.search_files("shared_helper", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].file_path, root.join("util.py").to_string_lossy());
    assert!(store.search_files("deep_helper", 10).unwrap().is_empty());
}
