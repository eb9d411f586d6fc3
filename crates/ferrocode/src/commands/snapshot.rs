//! Snapshot history command handlers.
//!
//! Handles listing, showing, diffing, and clearing snapshot records.

use clap::Subcommand;
use ferrocode_snapshot::SnapshotManager;
use std::path::{Path, PathBuf};

/// Snapshot subcommands.
#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// List snapshots for this working directory
    List {
        /// List snapshots for every working directory
        #[arg(long)]
        all: bool,
    },
    /// Show snapshot details
    Show {
        /// Snapshot ID
        id: String,
    },
    /// Diff a captured file against its current on-disk state
    Diff {
        /// Snapshot ID
        id: String,
        /// File path as captured (relative to the record's working directory)
        path: PathBuf,
    },
    /// Delete all snapshots
    Clear,
}

/// Handle snapshot commands.
pub async fn handle_snapshot(
    manager: &SnapshotManager,
    command: SnapshotCommands,
    working_dir: &Path,
) -> anyhow::Result<()> {
    match command {
        SnapshotCommands::List { all } => {
            let snapshots = if all {
                manager.snapshots().await
            } else {
                manager.snapshots_for_directory(working_dir).await
            };

            if snapshots.is_empty() {
                println!("No snapshots found.");
            } else {
                println!("Snapshots:");
                println!();
                println!("{:<32} {:<10} {:<6} {:<20} DESCRIPTION", "ID", "OPERATION", "FILES", "CREATED");
                println!("{}", "-".repeat(100));

                for record in snapshots {
                    let created = record.timestamp.format("%Y-%m-%d %H:%M:%S");
                    println!(
                        "{:<32} {:<10} {:<6} {:<20} {}",
                        record.id.as_str(),
                        record.operation.as_str(),
                        record.files.len(),
                        created,
                        record.description
                    );
                }
            }
        }
        SnapshotCommands::Show { id } => match manager.snapshot(&id).await {
            Some(record) => {
                println!("Snapshot: {}", record.id);
                println!("Operation: {}", record.operation);
                println!("Description: {}", record.description);
                println!("Directory: {}", record.working_dir.display());
                println!("Created: {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
                println!("Files:");
                for file in &record.files {
                    let state = if file.existed { "captured" } else { "did not exist" };
                    println!("  {} ({state})", file.path.display());
                }
            }
            None => {
                println!("Snapshot not found: {id}");
            }
        },
        SnapshotCommands::Diff { id, path } => {
            let diff = manager.diff(&id, &path).await?;
            print!("{diff}");
        }
        SnapshotCommands::Clear => {
            let count = manager.clear_all().await;
            println!("Deleted {count} snapshot(s)");
        }
    }

    Ok(())
}
