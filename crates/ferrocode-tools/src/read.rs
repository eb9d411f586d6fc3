//! Read tool - read file contents.
//!
//! Read-only, but still routed through the same containment boundary as the
//! mutating tools.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use ferrocode_sandbox::SandboxedFileAccess;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::fs;

const DEFAULT_LIMIT: usize = 2000;

/// Read file contents.
pub struct ReadTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadArgs {
    file_path: String,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for ReadTool {
    fn id(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        r#"Reads a file from the local filesystem.

Usage:
- By default reads up to 2000 lines from the beginning of the file.
- Optionally specify a line offset and limit for long files."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The absolute path to the file to read"
                },
                "offset": {
                    "type": "integer",
                    "description": "Line number to start reading from (0-based)"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of lines to read"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: ReadArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        let access = SandboxedFileAccess::new(&ctx.root_dir);
        let file_path = access.resolve(&PathBuf::from(&args.file_path))?;

        let content = match fs::read_to_string(&file_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::file_not_found(file_path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let limit = args.limit.unwrap_or(DEFAULT_LIMIT);
        let total_lines = content.lines().count();
        let selected: String = content
            .lines()
            .skip(args.offset)
            .take(limit)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ToolOutput::new(
            format!("Read {}", file_path.display()),
            selected,
        )
        .with_metadata(json!({
            "path": file_path.display().to_string(),
            "totalLines": total_lines,
            "offset": args.offset
        })))
    }
}
