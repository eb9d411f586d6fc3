//! Path utilities.
//!
//! Lexical path normalization and containment checks. Containment compares
//! whole path segments, never string prefixes, so `/work` does not contain
//! `/workbench`.

use std::path::{Path, PathBuf};

/// Get the ferrocode data directory.
///
/// This follows XDG conventions:
/// - `$XDG_DATA_HOME/ferrocode` if set
/// - `~/.local/share/ferrocode` otherwise
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("ferrocode"))
}

/// Get the per-user snapshot storage directory.
///
/// Undo history persists here between CLI invocations.
pub fn snapshots_dir() -> Option<PathBuf> {
    data_dir().map(|p| p.join("snapshots"))
}

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this is purely lexical and doesn't require the
/// path to exist. A leading `..` on an absolute path resolves to the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                result.pop();
            }
            std::path::Component::CurDir => {
                // Skip `.`
            }
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Check if a path is within a base directory.
///
/// Both paths are normalized first, then compared segment by segment.
/// Used for security checks to prevent path traversal.
pub fn is_within(path: &Path, base: &Path) -> bool {
    normalize(path).starts_with(normalize(base))
}

/// Make a path relative to a base directory.
///
/// Both paths are normalized first. Returns `None` if the path is not
/// within the base directory.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    normalize(path)
        .strip_prefix(normalize(base))
        .ok()
        .map(|p| p.to_path_buf())
}

/// Join a path onto a base, preventing path traversal.
///
/// Returns `None` if the resulting path would escape the base.
pub fn safe_join(base: &Path, path: &Path) -> Option<PathBuf> {
    let normalized = normalize(&base.join(path));

    if normalized.starts_with(normalize(base)) {
        Some(normalized)
    } else {
        None
    }
}
