//! Directory listing tool: one line per immediate entry with size and kind.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Write;
use std::fs;

use super::{parse_input, Tool};
use crate::error::ToolError;
use crate::sandbox::{Access, WorkingRoot};

pub struct ListDirTool {
    root: WorkingRoot,
}

impl ListDirTool {
    pub fn new(root: WorkingRoot) -> Self {
        Self { root }
    }
}

#[derive(Deserialize)]
struct ListDirInput {
    directory: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListDirTool {
    fn name(&self) -> &str {
        "get_files_info"
    }

    fn description(&self) -> &str {
        "Lists files in the specified directory along with their sizes, constrained to the working directory."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself."
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let input: ListDirInput = parse_input(self.name(), input)?;
        let directory = input
            .directory
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ".".to_string());

        let target = self.root.resolve(&directory, Access::List)?;
        if !target.is_dir() {
            return Err(ToolError::NotADirectory(directory));
        }

        let mut entries = fs::read_dir(&target)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.file_name());

        if entries.is_empty() {
            return Ok(format!("Directory \"{directory}\" is empty."));
        }

        let mut out = String::new();
        for entry in entries {
            let path = entry.path();
            // Follow symlinks for size and kind; fall back to the link itself if dangling.
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => fs::symlink_metadata(&path)?,
            };
            let _ = writeln!(
                out,
                "- {}: file_size={} bytes, is_dir={}",
                entry.file_name().to_string_lossy(),
                metadata.len(),
                metadata.is_dir()
            );
        }
        Ok(out)
    }
}
