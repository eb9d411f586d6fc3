//! Undo command handler.

use ferrocode_snapshot::SnapshotManager;
use std::path::Path;

/// Handle `ferrocode undo [COUNT]`.
pub async fn handle_undo(
    manager: &SnapshotManager,
    count: usize,
    working_dir: &Path,
) -> anyhow::Result<()> {
    let outcome = manager.undo(count, working_dir).await;

    if !outcome.success {
        anyhow::bail!("{}", outcome.message);
    }

    println!("{}", outcome.message);
    for file in &outcome.files_restored {
        println!("  restored {file}");
    }

    Ok(())
}
