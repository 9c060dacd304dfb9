//! Write-file tool: writes content to a file, creating parent directories as needed.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;

use super::{parse_input, Tool};
use crate::error::ToolError;
use crate::sandbox::{Access, WorkingRoot};

/// Tool that writes string content to a file within the working root.
///
/// Parent directories are created automatically and existing files are
/// overwritten, never appended to. Paths escaping the root are rejected
/// before anything is created.
pub struct WriteFileTool {
    /// Paths are resolved relative to this.
    root: WorkingRoot,
}

impl WriteFileTool {
    pub fn new(root: WorkingRoot) -> Self {
        Self { root }
    }
}

#[derive(Deserialize)]
struct WriteFileInput {
    file_path: String,
    content: String,
}

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Writes content to a specified file, constrained to the working directory."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to write, relative to the working directory."
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file."
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let input: WriteFileInput = parse_input(self.name(), input)?;
        let path = self.root.resolve(&input.file_path, Access::Write)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &input.content)?;

        Ok(format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            input.file_path,
            input.content.chars().count()
        ))
    }
}
