//! Snapshot error types.

use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot record not found.
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// File not captured by the record.
    #[error("File not captured by snapshot: {0}")]
    FileNotCaptured(String),

    /// Path resolution was denied by the containment check.
    #[error("Access denied: {0}")]
    Access(#[from] ferrocode_sandbox::AccessError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Create a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}
