//! Edit tool - perform exact string replacements in files.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use ferrocode_sandbox::SandboxedFileAccess;
use ferrocode_snapshot::OperationKind;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Edit tool for string replacement.
pub struct EditTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditArgs {
    file_path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: bool,
}

#[async_trait]
impl Tool for EditTool {
    fn id(&self) -> &str {
        "edit"
    }

    fn description(&self) -> &str {
        r#"Performs exact string replacements in files.

Usage:
- The edit will FAIL if `oldString` is not found in the file.
- The edit will FAIL if `oldString` is found multiple times (unless replaceAll is true).
- Use `replaceAll` for replacing all occurrences.
- Preserve exact indentation from the original file."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath", "oldString", "newString"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The absolute path to the file to modify"
                },
                "oldString": {
                    "type": "string",
                    "description": "The text to replace"
                },
                "newString": {
                    "type": "string",
                    "description": "The text to replace it with"
                },
                "replaceAll": {
                    "type": "boolean",
                    "description": "Replace all occurrences (default false)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: EditArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        if args.old_string == args.new_string {
            return Err(ToolError::validation(
                "oldString and newString must be different",
            ));
        }

        let access = SandboxedFileAccess::new(&ctx.root_dir);
        let file_path = access.resolve(&PathBuf::from(&args.file_path))?;

        let content = fs::read_to_string(&file_path)
            .await
            .map_err(|e| ToolError::execution_failed(format!("Failed to read file: {e}")))?;

        let occurrences = content.matches(&args.old_string).count();
        if occurrences == 0 {
            return Err(ToolError::validation(format!(
                "oldString not found in {}",
                file_path.display()
            )));
        }
        if occurrences > 1 && !args.replace_all {
            return Err(ToolError::validation(format!(
                "oldString found {occurrences} times in {}; pass replaceAll to replace every occurrence",
                file_path.display()
            )));
        }

        // Capture pre-mutation state.
        if let Some(ref snapshot) = ctx.snapshot {
            snapshot
                .create_snapshot(
                    OperationKind::Edit,
                    &format!("Before edit: {}", file_path.display()),
                    &[file_path.clone()],
                    &ctx.root_dir,
                )
                .await;
        }

        let new_content = if args.replace_all {
            content.replace(&args.old_string, &args.new_string)
        } else {
            content.replacen(&args.old_string, &args.new_string, 1)
        };

        fs::write(&file_path, &new_content).await?;

        let replaced = if args.replace_all { occurrences } else { 1 };
        debug!(path = %file_path.display(), replaced, "Edited file");

        Ok(ToolOutput::new(
            format!("Edited {}", file_path.display()),
            format!("Replaced {replaced} occurrence(s)"),
        )
        .with_metadata(json!({
            "path": file_path.display().to_string(),
            "replacements": replaced
        })))
    }
}
