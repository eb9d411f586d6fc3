//! Write tool - write file contents.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use ferrocode_sandbox::SandboxedFileAccess;
use ferrocode_snapshot::OperationKind;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Write file contents.
pub struct WriteTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteArgs {
    file_path: String,
    content: String,
}

#[async_trait]
impl Tool for WriteTool {
    fn id(&self) -> &str {
        "write"
    }

    fn description(&self) -> &str {
        r#"Writes a file to the local filesystem.

Usage:
- This tool will overwrite the existing file if there is one at the provided path.
- ALWAYS prefer editing existing files in the codebase. NEVER write new files unless explicitly required."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath", "content"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The absolute path to the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: WriteArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        let access = SandboxedFileAccess::new(&ctx.root_dir);
        let file_path = access.resolve(&PathBuf::from(&args.file_path))?;

        // Capture pre-mutation state; a missing file is captured as
        // non-existent so undo removes it again.
        if let Some(ref snapshot) = ctx.snapshot {
            snapshot
                .create_snapshot(
                    OperationKind::Write,
                    &format!("Before write: {}", file_path.display()),
                    &[file_path.clone()],
                    &ctx.root_dir,
                )
                .await;
        }

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&file_path, &args.content).await?;

        debug!(path = %file_path.display(), bytes = args.content.len(), "Wrote file");

        // Generate preview (first 10 lines)
        let preview: String = args.content.lines().take(10).collect::<Vec<_>>().join("\n");

        Ok(ToolOutput::new(
            format!("Wrote {}", file_path.display()),
            format!("Successfully wrote {} bytes", args.content.len()),
        )
        .with_metadata(json!({
            "bytes": args.content.len(),
            "path": file_path.display().to_string(),
            "preview": preview
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrocode_snapshot::{SnapshotConfig, SnapshotManager};
    use std::sync::Arc;
    use ferrocode_util::Identifier;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    fn test_context(root: PathBuf) -> ToolContext {
        ToolContext {
            session_id: Identifier::session(),
            message_id: Identifier::message(),
            abort: CancellationToken::new(),
            root_dir: root.clone(),
            cwd: root,
            snapshot: None,
        }
    }

    #[tokio::test]
    async fn test_write_file() {
        let dir = tempdir().unwrap();
        let canonical_dir = dir.path().canonicalize().unwrap();
        let file_path = canonical_dir.join("test.txt");
        let ctx = test_context(canonical_dir);

        let tool = WriteTool;
        let result = tool
            .execute(
                json!({
                    "filePath": file_path.display().to_string(),
                    "content": "Hello, world!"
                }),
                &ctx,
            )
            .await
            .unwrap();

        assert!(result.output.contains("13 bytes"));
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "Hello, world!");
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = tempdir().unwrap();
        let canonical_dir = dir.path().canonicalize().unwrap();
        let file_path = canonical_dir.join("nested/dir/test.txt");
        let ctx = test_context(canonical_dir);

        let tool = WriteTool;
        tool.execute(
            json!({
                "filePath": file_path.display().to_string(),
                "content": "Hello!"
            }),
            &ctx,
        )
        .await
        .unwrap();

        assert!(file_path.exists());
    }

    #[tokio::test]
    async fn test_write_outside_root_denied() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path().to_path_buf());

        let tool = WriteTool;
        let result = tool
            .execute(
                json!({
                    "filePath": "/tmp/outside/file.txt",
                    "content": "Should fail"
                }),
                &ctx,
            )
            .await;

        assert!(matches!(result, Err(ToolError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_write_path_traversal_denied() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path().to_path_buf());

        let evil_path = dir.path().join("subdir/../../etc/passwd");
        let tool = WriteTool;
        let result = tool
            .execute(
                json!({
                    "filePath": evil_path.display().to_string(),
                    "content": "Should fail"
                }),
                &ctx,
            )
            .await;

        assert!(matches!(result, Err(ToolError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_write_then_undo_roundtrip() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap().join("project");
        std::fs::create_dir_all(&root).unwrap();
        let file_path = root.join("a.txt");
        std::fs::write(&file_path, "hello").unwrap();

        let manager = Arc::new(
            SnapshotManager::initialize(dir.path().join("snapshots"), SnapshotConfig::default())
                .await
                .unwrap(),
        );
        let mut ctx = test_context(root.clone());
        ctx.snapshot = Some(manager.clone());

        let tool = WriteTool;
        tool.execute(
            json!({
                "filePath": file_path.display().to_string(),
                "content": "world"
            }),
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "world");

        let outcome = manager.undo(1, &root).await;
        assert!(outcome.success);
        assert_eq!(outcome.files_restored, vec!["a.txt".to_string()]);
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_undo_removes_file_created_by_write() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap().join("project");
        std::fs::create_dir_all(&root).unwrap();
        let file_path = root.join("brand-new.txt");

        let manager = Arc::new(
            SnapshotManager::initialize(dir.path().join("snapshots"), SnapshotConfig::default())
                .await
                .unwrap(),
        );
        let mut ctx = test_context(root.clone());
        ctx.snapshot = Some(manager.clone());

        let tool = WriteTool;
        tool.execute(
            json!({
                "filePath": file_path.display().to_string(),
                "content": "fresh"
            }),
            &ctx,
        )
        .await
        .unwrap();
        assert!(file_path.exists());

        let outcome = manager.undo(1, &root).await;
        assert!(outcome.success);
        assert!(!file_path.exists());
    }
}
