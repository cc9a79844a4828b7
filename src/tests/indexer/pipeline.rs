// End-to-end ingestion and the Idle/Draining state machine

use crate::indexer::IndexingStatus;
use crate::tests::helpers::{open_test_store, test_queue, unique_temp_dir, write_file};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(20);

#[tokio::test]
async fn test_index_then_search_end_to_end() {
    let (_store_dir, store) = open_test_store("pipeline_e2e");
    let project = unique_temp_dir("pipeline_project");
    write_file(project.path(), "main.py", "def add(a,b): return a+b\n");

    let queue = test_queue(&store);
    queue.start(project.path()).unwrap();

    let status = queue.wait_until_idle(WAIT).await.unwrap();
    assert!(!status.is_indexing);
    assert_eq!(status.indexed_files, 1);
    assert_eq!(status.queue_size, 0);
    assert_eq!(status.project, project.path().to_string_lossy());

    let matches = store.search_files("def add", 10).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].file_path.ends_with("main.py"));
    assert_eq!(matches[0].language, "python");
}

#[tokio::test]
async fn test_reindex_keeps_one_row_with_new_content() {
    let (_store_dir, store) = open_test_store("pipeline_reindex");
    let project = unique_temp_dir("pipeline_reindex_project");
    let file = write_file(project.path(), "lib.rs", "fn old() {}");

    let queue = test_queue(&store);
    queue.start(project.path()).unwrap();
    queue.wait_until_idle(WAIT).await.unwrap();

    std::fs::write(&file, "fn new() {}").unwrap();
    queue.start(project.path()).unwrap();
    let status = queue.wait_until_idle(WAIT).await.unwrap();

    // Counter was reset by the second run
    assert_eq!(status.indexed_files, 1);
    assert_eq!(store.file_count().unwrap(), 1);
    let stored = store.get_file(&file.to_string_lossy()).unwrap().unwrap();
    assert_eq!(stored.content, "fn new() {}");
}

#[tokio::test]
async fn test_bad_files_are_counted_but_not_fatal() {
    let (_store_dir, store) = open_test_store("pipeline_bad_files");
    let project = unique_temp_dir("pipeline_bad_project");
    write_file(project.path(), "good.py", "x = 1");
    std::fs::write(project.path().join("blob.json"), b"{\x00\x01}").unwrap();
    std::fs::write(project.path().join("mixed.md"), b"ok\xFF\xFEtext").unwrap();

    let queue = test_queue(&store);
    queue.start(project.path()).unwrap();
    let status = queue.wait_until_idle(WAIT).await.unwrap();

    assert_eq!(status.indexed_files, 3);
    assert_eq!(store.file_count().unwrap(), 2);

    let mixed = store.search_files("oktext", 10).unwrap();
    assert_eq!(mixed.len(), 1, "invalid bytes are dropped, not replaced");
    assert!(queue.is_worker_alive());
}

#[tokio::test]
async fn test_status_counter_is_monotonic_and_idle_only_when_done() {
    let (_store_dir, store) = open_test_store("pipeline_monotonic");
    let project = unique_temp_dir("pipeline_many");
    for i in 0..60 {
        write_file(project.path(), &format!("pkg{}/mod{}.py", i % 6, i), "import sys\n");
    }

    let queue = test_queue(&store);
    let summary = queue.start(project.path()).unwrap();
    assert_eq!(summary.files_enqueued, 60);

    let mut snapshots: Vec<IndexingStatus> = Vec::new();
    let last = queue
        .watch_until_idle(WAIT, |status| snapshots.push(status.clone()))
        .await
        .unwrap();

    let counts: Vec<u64> = snapshots.iter().map(|s| s.indexed_files).collect();
    assert!(counts.windows(2).all(|w| w[0] <= w[1]), "counter went backwards: {:?}", counts);

    // Any snapshot that says idle must already account for every file
    for snapshot in &snapshots {
        if !snapshot.is_indexing {
            assert_eq!(snapshot.indexed_files, 60);
        }
    }
    assert_eq!(last.indexed_files, 60);
    assert_eq!(store.file_count().unwrap(), 60);
}

#[tokio::test]
async fn test_exactly_one_worker_across_starts() {
    let (_store_dir, store) = open_test_store("pipeline_single_worker");
    let project = unique_temp_dir("pipeline_single_project");
    write_file(project.path(), "a.py", "a");

    let queue = test_queue(&store);
    queue.ensure_worker().unwrap();
    queue.ensure_worker().unwrap();
    queue.start(project.path()).unwrap();
    queue.start(project.path()).unwrap();

    assert!(queue.is_worker_alive());
    queue.wait_until_idle(WAIT).await.unwrap();
    assert_eq!(store.file_count().unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_starts_share_the_queue() {
    let (_store_dir, store) = open_test_store("pipeline_concurrent");
    let first = unique_temp_dir("pipeline_first");
    let second = unique_temp_dir("pipeline_second");
    for i in 0..20 {
        write_file(first.path(), &format!("f{}.js", i), "const a = 1;");
        write_file(second.path(), &format!("s{}.ts", i), "const b: number = 2;");
    }

    let queue = Arc::new(test_queue(&store));
    let handles: Vec<_> = [first.path().to_path_buf(), second.path().to_path_buf()]
        .into_iter()
        .map(|root| {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.start(&root).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let status = queue.wait_until_idle(WAIT).await.unwrap();
    assert!(!status.is_indexing);
    assert_eq!(store.file_count().unwrap(), 40);

    let reported = status.project;
    assert!(
        reported == first.path().to_string_lossy() || reported == second.path().to_string_lossy()
    );
}

#[tokio::test]
async fn test_worker_is_respawned_after_shutdown() {
    let (_store_dir, store) = open_test_store("pipeline_respawn");
    let project = unique_temp_dir("pipeline_respawn_project");
    write_file(project.path(), "x.sh", "echo hi");

    let queue = test_queue(&store);
    queue.ensure_worker().unwrap();
    queue.shutdown();
    assert!(!queue.is_worker_alive());

    queue.start(project.path()).unwrap();
    assert!(queue.is_worker_alive());
    queue.wait_until_idle(WAIT).await.unwrap();
    assert_eq!(store.file_count().unwrap(), 1);
}

#[test]
fn test_fresh_queue_reports_idle() {
    let (_store_dir, store) = open_test_store("pipeline_fresh");
    let queue = test_queue(&store);

    let status = queue.status();
    assert!(!status.is_indexing);
    assert_eq!(status.project, "");
    assert_eq!(status.indexed_files, 0);
    assert_eq!(status.queue_size, 0);
}
