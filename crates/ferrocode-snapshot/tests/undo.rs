//! End-to-end undo behavior across manager restarts, retention caps, and
//! hostile record files.

use ferrocode_snapshot::{OperationKind, SnapshotConfig, SnapshotManager};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

async fn manager_at(storage: &Path, max_snapshots: usize) -> SnapshotManager {
    SnapshotManager::initialize(storage.to_path_buf(), SnapshotConfig { max_snapshots })
        .await
        .unwrap()
}

async fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.unwrap();
    }
    fs::write(path, content).await.unwrap();
}

#[tokio::test]
async fn undo_history_survives_restart() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("snapshots");
    let project = dir.path().join("project");
    let file = project.join("notes.md");
    write(&file, "draft one").await;

    {
        let manager = manager_at(&storage, 50).await;
        manager
            .create_snapshot(
                OperationKind::Write,
                "Before write: notes.md",
                &[PathBuf::from("notes.md")],
                &project,
            )
            .await;
    }

    write(&file, "draft two").await;

    // A fresh process loads the persisted record and can still undo.
    let manager = manager_at(&storage, 50).await;
    let outcome = manager.undo(1, &project).await;

    assert!(outcome.success);
    assert_eq!(outcome.files_restored, vec!["notes.md".to_string()]);
    assert_eq!(fs::read_to_string(&file).await.unwrap(), "draft one");
    assert!(manager.snapshots().await.is_empty());
}

#[tokio::test]
async fn retention_cap_drops_oldest_record_and_file() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("snapshots");
    let project = dir.path().join("project");
    fs::create_dir_all(&project).await.unwrap();

    let manager = manager_at(&storage, 3).await;

    let mut ids = Vec::new();
    for i in 0..4 {
        let path = format!("file{i}.txt");
        write(&project.join(&path), "content").await;
        let id = manager
            .create_snapshot(OperationKind::Write, "cap test", &[PathBuf::from(&path)], &project)
            .await;
        ids.push(id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let active = manager.snapshots().await;
    assert_eq!(active.len(), 3);
    assert!(!active.iter().any(|r| r.id == ids[0]));
    assert!(!storage.join(format!("{}.json", ids[0])).exists());
    assert!(storage.join(format!("{}.json", ids[3])).exists());
}

#[tokio::test]
async fn tampered_entry_is_skipped_without_aborting_batch() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("snapshots");
    let project = dir.path().join("project");
    fs::create_dir_all(&storage).await.unwrap();
    write(&project.join("safe.txt"), "mutated").await;

    // Plant a bait file outside the project; a tampered record must not be
    // able to overwrite it.
    let victim = dir.path().join("victim.txt");
    write(&victim, "untouched").await;

    let record = serde_json::json!({
        "id": "snp_01aaaaaaaaaaaaaaaaaaaaaaaa",
        "timestamp": "2026-01-01T00:00:00Z",
        "operation": "write",
        "description": "tampered",
        "files": [
            { "path": "../victim.txt", "content": "evil", "existed": true },
            { "path": "safe.txt", "content": "original", "existed": true }
        ],
        "workingDir": project.to_str().unwrap(),
    });
    fs::write(
        storage.join("snp_01aaaaaaaaaaaaaaaaaaaaaaaa.json"),
        serde_json::to_string_pretty(&record).unwrap(),
    )
    .await
    .unwrap();

    let manager = manager_at(&storage, 50).await;
    let outcome = manager.undo(1, &project).await;

    assert!(outcome.success);
    assert_eq!(outcome.files_restored, vec!["safe.txt".to_string()]);
    assert_eq!(fs::read_to_string(&victim).await.unwrap(), "untouched");
    assert_eq!(
        fs::read_to_string(project.join("safe.txt")).await.unwrap(),
        "original"
    );
    // The record is still consumed.
    assert!(manager.snapshots().await.is_empty());
}

#[tokio::test]
async fn interleaved_projects_undo_independently() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("snapshots");
    let project_a = dir.path().join("alpha");
    let project_b = dir.path().join("beta");
    let file_a = project_a.join("a.txt");
    let file_b = project_b.join("b.txt");
    write(&file_a, "a-original").await;
    write(&file_b, "b-original").await;

    let manager = manager_at(&storage, 50).await;

    manager
        .create_snapshot(OperationKind::Write, "a", &[PathBuf::from("a.txt")], &project_a)
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    manager
        .create_snapshot(OperationKind::Write, "b", &[PathBuf::from("b.txt")], &project_b)
        .await;

    write(&file_a, "a-changed").await;
    write(&file_b, "b-changed").await;

    // Undo the whole window from B: only B's record applies, A's is skipped
    // and stays active.
    let outcome = manager.undo(2, &project_b).await;
    assert!(outcome.success);
    assert_eq!(outcome.files_restored, vec!["b.txt".to_string()]);
    assert_eq!(fs::read_to_string(&file_b).await.unwrap(), "b-original");
    assert_eq!(fs::read_to_string(&file_a).await.unwrap(), "a-changed");

    let remaining = manager.snapshots().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].description, "a");

    let outcome = manager.undo(1, &project_a).await;
    assert!(outcome.success);
    assert_eq!(fs::read_to_string(&file_a).await.unwrap(), "a-original");
}

#[tokio::test]
async fn undo_restores_nested_file_with_missing_parents() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("snapshots");
    let project = dir.path().join("project");
    let nested = project.join("src/deep/mod.rs");
    write(&nested, "pub fn f() {}").await;

    let manager = manager_at(&storage, 50).await;
    manager
        .create_snapshot(
            OperationKind::Edit,
            "nested",
            &[PathBuf::from("src/deep/mod.rs")],
            &project,
        )
        .await;

    // The tool deletes the whole subtree afterwards.
    fs::remove_dir_all(project.join("src")).await.unwrap();

    let outcome = manager.undo(1, &project).await;
    assert!(outcome.success);
    assert_eq!(
        fs::read_to_string(&nested).await.unwrap(),
        "pub fn f() {}"
    );
}
