//! Working-directory containment for ferrocode tools.
//!
//! Every file-touching tool resolves its target path through
//! [`SandboxedFileAccess`] before reading or writing anything, and the
//! snapshot engine re-verifies the same boundary before restoring files.
//! This is the one security boundary shared by all of them.
//!
//! Resolution is purely lexical: `.` and `..` are resolved without touching
//! the filesystem, and the result must lie within the working directory as a
//! whole-segment prefix. The check fails closed — a path outside the boundary
//! yields [`AccessError::OutsideWorkingDir`], never a panic.
//!
//! # Example
//!
//! ```
//! use ferrocode_sandbox::SandboxedFileAccess;
//! use std::path::{Path, PathBuf};
//!
//! let access = SandboxedFileAccess::new(Path::new("/home/dev/project"));
//!
//! assert_eq!(
//!     access.resolve(Path::new("src/main.rs")).unwrap(),
//!     PathBuf::from("/home/dev/project/src/main.rs"),
//! );
//!
//! assert!(access.resolve(Path::new("../escape.txt")).is_err());
//! ```

mod access;
mod error;

pub use access::SandboxedFileAccess;
pub use error::{AccessError, AccessResult};
