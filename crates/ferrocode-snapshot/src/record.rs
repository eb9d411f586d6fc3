//! Snapshot record data structures.

use chrono::{DateTime, Utc};
use ferrocode_util::Identifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unique identifier for a snapshot record.
///
/// Generated as `snp_<ulid>`, so identifiers sort lexicographically by
/// creation time: a larger id means a more recent record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    /// Create a new snapshot ID.
    pub fn new() -> Self {
        Self(Identifier::snapshot())
    }

    /// Create a snapshot ID from a string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The mutating operation a snapshot was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Write,
    Edit,
    MultiEdit,
    Patch,
    Other,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Write => "write",
            OperationKind::Edit => "edit",
            OperationKind::MultiEdit => "multiedit",
            OperationKind::Patch => "patch",
            OperationKind::Other => "other",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Captured state of a single file before a mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileState {
    /// Path relative to the record's working directory.
    pub path: PathBuf,

    /// Content at capture time, `None` if the file did not exist.
    pub content: Option<String>,

    /// Whether the file existed at capture time.
    pub existed: bool,
}

impl FileState {
    /// Capture of an existing file with the given content.
    pub fn existing(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
            existed: true,
        }
    }

    /// Capture of a file that was absent (or unreadable) at capture time.
    pub fn absent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: None,
            existed: false,
        }
    }
}

/// An immutable capture of one or more files' pre-mutation state, scoped to
/// a working directory.
///
/// One JSON document per record is persisted under the snapshot storage
/// directory, named by its id. The field layout is stable across releases;
/// undo history survives process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    /// Unique, recency-sortable identifier.
    pub id: SnapshotId,

    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// The operation this snapshot was taken for.
    pub operation: OperationKind,

    /// Human-readable description of the pending mutation.
    pub description: String,

    /// Captured file states, in the order the paths were given.
    pub files: Vec<FileState>,

    /// Absolute working directory the record is scoped to. Fixed at
    /// creation; undo never reinterprets a record under another directory.
    pub working_dir: PathBuf,
}

impl SnapshotRecord {
    /// Create a new record. The id and timestamp are assigned here.
    pub fn new(
        operation: OperationKind,
        description: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        files: Vec<FileState>,
    ) -> Self {
        Self {
            id: SnapshotId::new(),
            timestamp: Utc::now(),
            operation,
            description: description.into(),
            files,
            working_dir: working_dir.into(),
        }
    }

    /// Check if this record captured a specific file.
    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }
}
