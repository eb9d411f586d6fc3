//! Tool implementations for ferrocode.
//!
//! This crate provides the file tools that AI agents use to interact with
//! the working tree. Every tool resolves its target path through
//! [`ferrocode_sandbox::SandboxedFileAccess`] before touching the
//! filesystem, and every mutating tool snapshots the pre-mutation state
//! through the [`SnapshotManager`] so the change can be undone.

pub mod error;

// Tool implementations
pub mod edit;
pub mod read;
pub mod write;

pub use error::{ToolError, ToolResult};

use async_trait::async_trait;
use ferrocode_snapshot::SnapshotManager;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Context provided to tools during execution.
pub struct ToolContext {
    /// Session ID.
    pub session_id: String,
    /// Message ID.
    pub message_id: String,
    /// Cancellation token.
    pub abort: CancellationToken,
    /// Project root directory; the containment boundary for all file access.
    pub root_dir: PathBuf,
    /// Current working directory.
    pub cwd: PathBuf,
    /// Snapshot manager for undo capture.
    pub snapshot: Option<Arc<SnapshotManager>>,
}

impl ToolContext {
    /// Whether undo capture is enabled for this context.
    pub fn snapshots_enabled(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Result of tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Title/summary of the operation.
    pub title: String,
    /// Output text.
    pub output: String,
    /// Tool-specific metadata.
    pub metadata: Value,
}

impl ToolOutput {
    /// Create a new tool output.
    pub fn new(title: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            output: output.into(),
            metadata: Value::Null,
        }
    }

    /// Add metadata to the output.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// The main trait for tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool ID.
    fn id(&self) -> &str;

    /// Get the tool description (for the AI).
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput>;
}

/// A boxed tool for dynamic dispatch.
pub type BoxedTool = Arc<dyn Tool>;
