//! Snapshot-based undo engine for ferrocode.
//!
//! Before a tool mutates a file, the [`SnapshotManager`] captures the file's
//! current content (or its absence) into an immutable [`SnapshotRecord`]
//! scoped to the working directory the tool ran in. Records persist as one
//! JSON document each, so undo history survives between CLI invocations.
//! An undo request replays the most recent records, restoring or deleting
//! files, and never applies a record outside the working directory it was
//! created under.
//!
//! # Example
//!
//! ```no_run
//! use ferrocode_snapshot::{OperationKind, SnapshotConfig, SnapshotManager};
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = SnapshotManager::initialize(
//!     PathBuf::from("/home/dev/.local/share/ferrocode/snapshots"),
//!     SnapshotConfig::default(),
//! ).await?;
//!
//! // Capture before editing; the mutation proceeds even if capture degrades.
//! let snapshot_id = manager.create_snapshot(
//!     OperationKind::Edit,
//!     "Before edit: src/main.rs",
//!     &[PathBuf::from("src/main.rs")],
//!     Path::new("/home/dev/project"),
//! ).await;
//!
//! // ... edit the file ...
//!
//! // Roll the last operation back.
//! let outcome = manager.undo(1, Path::new("/home/dev/project")).await;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod record;
mod store;

pub use error::{SnapshotError, SnapshotResult};
pub use manager::{SnapshotManager, UndoOutcome};
pub use record::{FileState, OperationKind, SnapshotId, SnapshotRecord};
pub use store::{SnapshotConfig, SnapshotStore};
