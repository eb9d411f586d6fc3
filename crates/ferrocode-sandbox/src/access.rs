//! Path resolution against a working-directory boundary.

use crate::{AccessError, AccessResult};
use ferrocode_util::path as path_util;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolves user-supplied paths against a working directory and refuses
/// anything that escapes it.
///
/// The working directory is normalized once at construction; every resolved
/// path is normalized the same way before the containment check, so neither
/// `..` traversal nor segment-prefix collisions (`/work` vs `/workbench`)
/// can slip through.
#[derive(Debug, Clone)]
pub struct SandboxedFileAccess {
    working_dir: PathBuf,
}

impl SandboxedFileAccess {
    /// Create an access guard for the given working directory.
    ///
    /// The directory does not have to exist; containment is lexical.
    pub fn new(working_dir: &Path) -> Self {
        Self {
            working_dir: path_util::normalize(working_dir),
        }
    }

    /// The normalized working directory this guard is scoped to.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Resolve a user path to an absolute path inside the working directory.
    ///
    /// Relative input is joined onto the working directory; absolute input is
    /// taken as-is. Either way the normalized result must have the working
    /// directory as a whole-segment prefix, or the call fails closed with
    /// [`AccessError::OutsideWorkingDir`].
    pub fn resolve(&self, user_path: &Path) -> AccessResult<PathBuf> {
        if !self.working_dir.is_absolute() {
            return Err(AccessError::RelativeWorkingDir(self.working_dir.clone()));
        }

        // `join` replaces the base entirely when the input is absolute, so
        // one safe_join covers relative and absolute input alike.
        match path_util::safe_join(&self.working_dir, user_path) {
            Some(resolved) => Ok(resolved),
            None => {
                warn!(
                    path = %user_path.display(),
                    working_dir = %self.working_dir.display(),
                    "Denied access to path outside working directory"
                );
                Err(AccessError::outside(user_path, &self.working_dir))
            }
        }
    }

    /// Check whether an already-resolved path lies within the boundary.
    pub fn contains(&self, path: &Path) -> bool {
        path_util::is_within(path, &self.working_dir)
    }

    /// Make an absolute path relative to the working directory.
    ///
    /// Returns `None` if the path is outside the boundary.
    pub fn relativize(&self, path: &Path) -> Option<PathBuf> {
        path_util::relative_to(path, &self.working_dir)
    }
}
