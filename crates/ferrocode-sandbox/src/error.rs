//! Error types for sandboxed file access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a path against a working directory.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The resolved path escapes the working directory.
    #[error("path '{path}' is outside the working directory '{working_dir}'")]
    OutsideWorkingDir { path: PathBuf, working_dir: PathBuf },

    /// The working directory is not an absolute path.
    #[error("working directory '{0}' is not absolute")]
    RelativeWorkingDir(PathBuf),
}

impl AccessError {
    /// Create an outside-working-directory denial.
    pub fn outside(path: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self::OutsideWorkingDir {
            path: path.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Check if this error is a containment denial.
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::OutsideWorkingDir { .. })
    }
}

/// Result type for sandboxed file access.
pub type AccessResult<T> = Result<T, AccessError>;
