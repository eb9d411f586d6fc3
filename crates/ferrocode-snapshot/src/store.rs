//! Durable snapshot record storage.
//!
//! One JSON document per record, named `<id>.json`, under a single storage
//! directory:
//!
//! ```text
//! base_dir/
//!   snp_01hq....json
//!   snp_01hr....json
//! ```
//!
//! The store mirrors the directory in an in-memory active list ordered
//! most-recent-first. Records enter the list only through [`SnapshotStore::insert`]
//! and leave it only through consumption ([`SnapshotStore::remove`]), cap
//! eviction, or [`SnapshotStore::clear`].

use crate::{SnapshotError, SnapshotId, SnapshotRecord, SnapshotResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration for snapshot storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Maximum number of retained records. Inserting past the cap evicts
    /// the oldest persisted record.
    pub max_snapshots: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self { max_snapshots: 50 }
    }
}

/// Storage for snapshot records.
pub struct SnapshotStore {
    /// Directory holding one JSON file per record.
    base_dir: PathBuf,

    /// Configuration.
    config: SnapshotConfig,

    /// Active records, most-recent-first.
    records: Vec<SnapshotRecord>,
}

impl SnapshotStore {
    /// Open the store, creating the directory if needed and loading every
    /// persisted record.
    ///
    /// A record file that fails to parse is skipped with a warning; loading
    /// never aborts. After loading, records past the retention cap are
    /// evicted so the cap invariant holds across restarts.
    pub async fn initialize(base_dir: PathBuf, config: SnapshotConfig) -> SnapshotResult<Self> {
        fs::create_dir_all(&base_dir).await?;

        let mut store = Self {
            base_dir,
            config,
            records: Vec::new(),
        };
        store.load().await?;
        store.evict_over_cap().await;

        debug!(
            records = store.records.len(),
            dir = %store.base_dir.display(),
            "Snapshot store initialized"
        );

        Ok(store)
    }

    async fn load(&mut self) -> SnapshotResult<()> {
        let mut entries = fs::read_dir(&self.base_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match fs::read_to_string(&path).await {
                Ok(content) => match serde_json::from_str::<SnapshotRecord>(&content) {
                    Ok(record) => self.records.push(record),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unparseable snapshot record");
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot record");
                }
            }
        }

        // Ids are recency-sortable, so sorting descending by id yields
        // most-recent-first.
        self.records.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(())
    }

    /// Active records, most-recent-first.
    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Option<&SnapshotRecord> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }

    /// Number of active records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a fully assembled record: prepend to the active list, persist
    /// it, then evict the oldest record if the cap is exceeded.
    ///
    /// On a persistence failure the record stays on the active list (it is
    /// still undoable within this process); only durability is lost, and the
    /// error is returned so the caller can log it.
    pub async fn insert(&mut self, record: SnapshotRecord) -> SnapshotResult<()> {
        let id = record.id.clone();
        self.records.insert(0, record);

        let result = self.persist(&id).await;

        self.evict_over_cap().await;

        result
    }

    async fn persist(&self, id: &SnapshotId) -> SnapshotResult<()> {
        let record = self
            .records
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| SnapshotError::not_found(id.as_str()))?;

        let path = self.record_path(id.as_str());
        let content = serde_json::to_string_pretty(record)?;

        // Write atomically: temp file in the same directory, then rename.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(id = %id, path = %path.display(), "Persisted snapshot record");

        Ok(())
    }

    /// Remove a record from the active list and delete its file.
    ///
    /// Deleting is idempotent: a missing file is not an error.
    pub async fn remove(&mut self, id: &str) -> SnapshotResult<()> {
        self.records.retain(|r| r.id.as_str() != id);
        self.delete_file(id).await
    }

    async fn delete_file(&self, id: &str) -> SnapshotResult<()> {
        let path = self.record_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Evict the oldest records until the active list fits the cap.
    ///
    /// Eviction removes the persisted file as well, not just the in-memory
    /// entry.
    async fn evict_over_cap(&mut self) {
        while self.records.len() > self.config.max_snapshots {
            // Safe: len > cap >= 0, so the list is non-empty.
            if let Some(oldest) = self.records.pop() {
                debug!(id = %oldest.id, "Evicting oldest snapshot over retention cap");
                if let Err(e) = self.delete_file(oldest.id.as_str()).await {
                    warn!(id = %oldest.id, error = %e, "Failed to delete evicted snapshot file");
                }
            }
        }
    }

    /// Remove every record from memory and disk. Returns the count removed.
    pub async fn clear(&mut self) -> usize {
        let cleared = std::mem::take(&mut self.records);
        for record in &cleared {
            if let Err(e) = self.delete_file(record.id.as_str()).await {
                warn!(id = %record.id, error = %e, "Failed to delete cleared snapshot file");
            }
        }

        if !cleared.is_empty() {
            info!(count = cleared.len(), "Cleared all snapshots");
        }

        cleared.len()
    }

    /// Path of the persisted document for a record id.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileState, OperationKind};
    use tempfile::TempDir;

    fn record(desc: &str) -> SnapshotRecord {
        SnapshotRecord::new(
            OperationKind::Write,
            desc,
            "/project",
            vec![FileState::existing("a.txt", "content")],
        )
    }

    async fn setup() -> (TempDir, SnapshotStore) {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::initialize(dir.path().join("snapshots"), SnapshotConfig::default())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_initialize_creates_directory() {
        let (dir, store) = setup().await;
        assert!(dir.path().join("snapshots").is_dir());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_insert_persists_document() {
        let (_dir, mut store) = setup().await;
        let r = record("first");
        let id = r.id.clone();

        store.insert(r).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.record_path(id.as_str()).exists());
    }

    #[tokio::test]
    async fn test_records_most_recent_first() {
        let (_dir, mut store) = setup().await;
        let r1 = record("first");
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let r2 = record("second");

        store.insert(r1).await.unwrap();
        store.insert(r2).await.unwrap();

        assert_eq!(store.records()[0].description, "second");
        assert_eq!(store.records()[1].description, "first");
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest_from_disk() {
        let dir = TempDir::new().unwrap();
        let mut store = SnapshotStore::initialize(
            dir.path().join("snapshots"),
            SnapshotConfig { max_snapshots: 3 },
        )
        .await
        .unwrap();

        let mut ids = Vec::new();
        for i in 0..4 {
            let r = record(&format!("r{i}"));
            ids.push(r.id.clone());
            store.insert(r).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        assert_eq!(store.len(), 3);
        // The first (oldest) record is gone from memory and disk.
        assert!(store.get(ids[0].as_str()).is_none());
        assert!(!store.record_path(ids[0].as_str()).exists());
        assert!(store.record_path(ids[3].as_str()).exists());
    }

    #[tokio::test]
    async fn test_insert_keeps_record_active_on_persist_failure() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("snapshots");
        let mut store = SnapshotStore::initialize(base.clone(), SnapshotConfig::default())
            .await
            .unwrap();

        // Losing the storage directory makes the persist write fail.
        std::fs::remove_dir_all(&base).unwrap();

        let r = record("volatile");
        let id = r.id.clone();
        assert!(store.insert(r).await.is_err());

        // Only durability is lost; the record is still on the active list.
        assert_eq!(store.len(), 1);
        assert!(store.get(id.as_str()).is_some());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, mut store) = setup().await;
        let r = record("only");
        let id = r.id.clone();
        store.insert(r).await.unwrap();

        store.remove(id.as_str()).await.unwrap();
        assert!(store.is_empty());
        // Second remove: file already gone, still Ok.
        store.remove(id.as_str()).await.unwrap();
    }

    #[tokio::test]
    async fn test_reload_restores_order() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("snapshots");

        let mut store = SnapshotStore::initialize(base.clone(), SnapshotConfig::default())
            .await
            .unwrap();
        store.insert(record("old")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store.insert(record("new")).await.unwrap();
        drop(store);

        let reloaded = SnapshotStore::initialize(base, SnapshotConfig::default())
            .await
            .unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records()[0].description, "new");
    }

    #[tokio::test]
    async fn test_load_skips_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("snapshots");

        let mut store = SnapshotStore::initialize(base.clone(), SnapshotConfig::default())
            .await
            .unwrap();
        store.insert(record("good")).await.unwrap();
        drop(store);

        std::fs::write(base.join("snp_corrupt.json"), "{not json").unwrap();

        let reloaded = SnapshotStore::initialize(base, SnapshotConfig::default())
            .await
            .unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0].description, "good");
    }

    #[tokio::test]
    async fn test_reload_enforces_lowered_cap() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("snapshots");

        let mut store = SnapshotStore::initialize(base.clone(), SnapshotConfig::default())
            .await
            .unwrap();
        for i in 0..3 {
            store.insert(record(&format!("r{i}"))).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        drop(store);

        let reloaded = SnapshotStore::initialize(base, SnapshotConfig { max_snapshots: 2 })
            .await
            .unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records()[0].description, "r2");
        assert_eq!(reloaded.records()[1].description, "r1");
    }

    #[tokio::test]
    async fn test_clear_reports_count() {
        let (_dir, mut store) = setup().await;
        store.insert(record("a")).await.unwrap();
        store.insert(record("b")).await.unwrap();

        assert_eq!(store.clear().await, 2);
        assert!(store.is_empty());
        assert_eq!(store.clear().await, 0);
    }
}
