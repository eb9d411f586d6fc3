//! Ferrocode - AI-powered coding assistant.
//!
//! This binary exposes the snapshot history and undo commands. Mutating
//! tools capture file state through the same snapshot manager during agent
//! sessions; these commands inspect and roll back that history.

mod commands;

use clap::{Parser, Subcommand};
use commands::snapshot::SnapshotCommands;
use ferrocode_snapshot::{SnapshotConfig, SnapshotManager};
use ferrocode_util::log::{self, LogConfig, LogLevel};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ferrocode")]
#[command(author, version, about = "AI-powered coding assistant", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error); overrides --verbose
    #[arg(long)]
    log_level: Option<String>,

    /// Working directory (defaults to the current directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Snapshot storage directory (defaults to the per-user data directory)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Maximum number of retained snapshot records
    #[arg(long, default_value_t = 50)]
    max_snapshots: usize,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Undo the most recent file mutations in this working directory
    Undo {
        /// Number of operations to undo
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Inspect and manage snapshot history
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_deref() {
        Some(s) => {
            LogLevel::parse(s).ok_or_else(|| anyhow::anyhow!("Invalid log level: {s}"))?
        }
        None if cli.verbose => LogLevel::Debug,
        None => LogLevel::Info,
    };

    log::init(LogConfig {
        print: cli.verbose || cli.log_level.is_some(),
        level,
        include_location: false,
    });

    let working_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let storage_dir = cli
        .storage_dir
        .or_else(ferrocode_util::path::snapshots_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine a snapshot storage directory"))?;

    let manager = SnapshotManager::initialize(
        storage_dir,
        SnapshotConfig {
            max_snapshots: cli.max_snapshots,
        },
    )
    .await?;

    match cli.command {
        Commands::Undo { count } => commands::undo::handle_undo(&manager, count, &working_dir).await,
        Commands::Snapshot { command } => {
            commands::snapshot::handle_snapshot(&manager, command, &working_dir).await
        }
    }
}
