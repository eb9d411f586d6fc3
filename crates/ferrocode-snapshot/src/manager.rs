//! Snapshot orchestration: capture-before-mutate and multi-record undo.
//!
//! The manager owns the store behind a `tokio::sync::Mutex`. The surrounding
//! agent loop issues one tool call at a time, so capture and undo are never
//! expected to overlap; the lock serializes them if a caller breaks that
//! convention.

use crate::{
    FileState, OperationKind, SnapshotConfig, SnapshotError, SnapshotId, SnapshotRecord,
    SnapshotResult, SnapshotStore,
};
use ferrocode_sandbox::SandboxedFileAccess;
use ferrocode_util::path as path_util;
use similar::{ChangeTag, TextDiff};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Result of an undo request.
#[derive(Debug, Clone)]
pub struct UndoOutcome {
    /// Whether the undo ran. `false` only when the availability
    /// precondition failed, in which case nothing was touched.
    pub success: bool,
    /// Human-readable summary, including skipped-scope counts.
    pub message: String,
    /// Relative paths of files actually restored, in restore order.
    pub files_restored: Vec<String>,
}

impl UndoOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            files_restored: Vec::new(),
        }
    }
}

/// Orchestrates snapshot capture and undo over a [`SnapshotStore`].
///
/// One manager instance exclusively owns the storage directory and its
/// in-memory mirror for the lifetime of the process.
pub struct SnapshotManager {
    store: Mutex<SnapshotStore>,
}

impl SnapshotManager {
    /// Open the storage directory and load persisted history.
    pub async fn initialize(base_dir: PathBuf, config: SnapshotConfig) -> SnapshotResult<Self> {
        let store = SnapshotStore::initialize(base_dir, config).await?;
        Ok(Self {
            store: Mutex::new(store),
        })
    }

    /// Capture the current state of `paths` before a mutation.
    ///
    /// Capture is best-effort and never fails the caller: a path denied by
    /// the containment check is skipped, an unreadable or missing file is
    /// recorded as non-existent, and a persistence failure is logged while
    /// the record stays active in memory. The pending mutation always
    /// proceeds.
    pub async fn create_snapshot(
        &self,
        operation: OperationKind,
        description: &str,
        paths: &[PathBuf],
        working_dir: &Path,
    ) -> SnapshotId {
        let access = SandboxedFileAccess::new(working_dir);
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let resolved = match access.resolve(path) {
                Ok(p) => p,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping snapshot entry outside working directory");
                    continue;
                }
            };
            let relative = access
                .relativize(&resolved)
                .unwrap_or_else(|| resolved.clone());

            match fs::read_to_string(&resolved).await {
                Ok(content) => files.push(FileState::existing(relative, content)),
                Err(e) => {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        debug!(path = %resolved.display(), error = %e, "Treating unreadable file as absent");
                    }
                    files.push(FileState::absent(relative));
                }
            }
        }

        let record = SnapshotRecord::new(operation, description, access.working_dir(), files);
        let id = record.id.clone();
        let file_count = record.files.len();

        let mut store = self.store.lock().await;
        if let Err(e) = store.insert(record).await {
            warn!(id = %id, error = %e, "Snapshot not durably persisted; mutation proceeds");
        }

        info!(id = %id, files = file_count, operation = %operation, "Captured snapshot");

        id
    }

    /// Undo the `count` most recent operations invoked from `working_dir`.
    ///
    /// The availability precondition is strict: with no records, a zero
    /// count, or a count beyond what the store holds, the call fails before
    /// touching anything. Selected records whose working directory differs
    /// from the requested one are skipped and left active; the rest are
    /// replayed oldest-first and consumed.
    pub async fn undo(&self, count: usize, working_dir: &Path) -> UndoOutcome {
        let mut store = self.store.lock().await;

        let total = store.len();
        if total == 0 {
            return UndoOutcome::failure("No snapshots available to undo");
        }
        if count == 0 {
            return UndoOutcome::failure("Undo count must be at least 1");
        }
        if count > total {
            return UndoOutcome::failure(format!(
                "Cannot undo {count} operations: only {total} snapshot{} available",
                plural(total)
            ));
        }

        let requested_dir = path_util::normalize(working_dir);
        let selected: Vec<SnapshotRecord> = store.records()[..count].to_vec();
        let (matched, skipped): (Vec<_>, Vec<_>) = selected
            .into_iter()
            .partition(|r| path_util::normalize(&r.working_dir) == requested_dir);

        let mut files_restored = Vec::new();
        let mut claimed_paths: HashSet<PathBuf> = HashSet::new();

        // Replay oldest-of-batch first. If the same file was captured by
        // several records in the window, the oldest capture holds the true
        // "before" state, so newer records must not overwrite it.
        for record in matched.iter().rev() {
            restore_record(record, &mut claimed_paths, &mut files_restored).await;
        }

        // Consumption is unconditional once a record was selected and not
        // skipped for scope mismatch, even if some entries failed.
        for record in &matched {
            if let Err(e) = store.remove(record.id.as_str()).await {
                warn!(id = %record.id, error = %e, "Failed to delete consumed snapshot file");
            }
        }

        let message = if skipped.is_empty() {
            format!(
                "Undid {} operation{}, restored {} file{}",
                matched.len(),
                plural(matched.len()),
                files_restored.len(),
                plural(files_restored.len())
            )
        } else {
            format!(
                "Undid {} of {} operation{}; {}",
                matched.len(),
                count,
                plural(count),
                skipped_note(skipped.len())
            )
        };

        info!(
            undone = matched.len(),
            skipped = skipped.len(),
            restored = files_restored.len(),
            dir = %requested_dir.display(),
            "Undo complete"
        );

        UndoOutcome {
            success: true,
            message,
            files_restored,
        }
    }

    /// All active records, most-recent-first.
    pub async fn snapshots(&self) -> Vec<SnapshotRecord> {
        self.store.lock().await.records().to_vec()
    }

    /// Active records scoped to a specific working directory.
    pub async fn snapshots_for_directory(&self, working_dir: &Path) -> Vec<SnapshotRecord> {
        let dir = path_util::normalize(working_dir);
        self.store
            .lock()
            .await
            .records()
            .iter()
            .filter(|r| path_util::normalize(&r.working_dir) == dir)
            .cloned()
            .collect()
    }

    /// Look up a single record by id.
    pub async fn snapshot(&self, id: &str) -> Option<SnapshotRecord> {
        self.store.lock().await.get(id).cloned()
    }

    /// Remove all records. Returns the number removed.
    pub async fn clear_all(&self) -> usize {
        self.store.lock().await.clear().await
    }

    /// Unified diff between a record's captured content for `path` and the
    /// file's current on-disk state.
    pub async fn diff(&self, id: &str, path: &Path) -> SnapshotResult<String> {
        let store = self.store.lock().await;
        let record = store
            .get(id)
            .ok_or_else(|| SnapshotError::not_found(id))?;

        let entry = record
            .files
            .iter()
            .find(|f| f.path == path)
            .ok_or_else(|| SnapshotError::FileNotCaptured(path.display().to_string()))?;

        let access = SandboxedFileAccess::new(&record.working_dir);
        let resolved = access.resolve(&entry.path)?;

        let old_content = entry.content.clone().unwrap_or_default();
        let new_content = fs::read_to_string(&resolved).await.unwrap_or_default();

        Ok(generate_diff(&old_content, &new_content, &entry.path))
    }
}

/// Restore every entry of one record, skipping paths already claimed by an
/// older record in the same batch.
async fn restore_record(
    record: &SnapshotRecord,
    claimed_paths: &mut HashSet<PathBuf>,
    files_restored: &mut Vec<String>,
) {
    // Containment is re-verified against the record's own stored working
    // directory, never the caller-supplied one. A violating entry means a
    // corrupted or tampered record; it is skipped without aborting the rest.
    let access = SandboxedFileAccess::new(&record.working_dir);

    for entry in &record.files {
        let resolved = match access.resolve(&entry.path) {
            Ok(p) => p,
            Err(e) => {
                error!(
                    id = %record.id,
                    path = %entry.path.display(),
                    error = %e,
                    "Security violation: snapshot entry escapes its recorded working directory"
                );
                continue;
            }
        };

        if !claimed_paths.insert(resolved.clone()) {
            debug!(path = %resolved.display(), "Path already restored by an older record in this batch");
            continue;
        }

        let result = if entry.existed {
            restore_content(&resolved, entry.content.as_deref().unwrap_or_default()).await
        } else {
            remove_if_present(&resolved).await
        };

        match result {
            Ok(()) => {
                debug!(id = %record.id, path = %entry.path.display(), "Restored");
                files_restored.push(entry.path.display().to_string());
            }
            Err(e) => {
                warn!(
                    id = %record.id,
                    path = %resolved.display(),
                    error = %e,
                    "Failed to restore file; continuing with the rest of the batch"
                );
            }
        }
    }
}

async fn restore_content(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, content).await
}

async fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn skipped_note(n: usize) -> String {
    if n == 1 {
        "1 snapshot belongs to a different working directory and remains undoable there".to_string()
    } else {
        format!("{n} snapshots belong to a different working directory and remain undoable there")
    }
}

/// Generate a unified diff between two strings.
fn generate_diff(old: &str, new: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    output.push_str(&format!("--- a/{}\n", path.display()));
    output.push_str(&format!("+++ b/{}\n", path.display()));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };

                output.push_str(sign);
                output.push_str(change.value());
                if !change.value().ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}
