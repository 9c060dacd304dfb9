//! Script tool: runs a script under the configured interpreter.

use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use super::{parse_input, Tool};
use crate::error::ToolError;
use crate::sandbox::{Access, WorkingRoot};

/// Tool that executes a script file in a child process.
///
/// The child runs with the working root as its current directory, a null
/// stdin, and captured stdout/stderr. It is killed if it outlives the
/// timeout.
pub struct RunScriptTool {
    root: WorkingRoot,
    interpreter: String,
    extension: String,
    timeout: Duration,
    description: String,
}

impl RunScriptTool {
    pub fn new(root: WorkingRoot, interpreter: String, extension: String, timeout: Duration) -> Self {
        let description = format!(
            "Executes a .{extension} script with {interpreter} (with optional arguments) in the working directory."
        );
        Self {
            root,
            interpreter,
            extension,
            timeout,
            description,
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.extension.as_str())
    }
}

#[derive(Deserialize)]
struct RunScriptInput {
    file_path: String,
    #[serde(default)]
    args: Option<Vec<String>>,
}

/// Assembles the labeled report for a finished process.
fn format_output(stdout: &str, stderr: &str, code: Option<i32>) -> String {
    let mut parts = Vec::new();
    if !stdout.is_empty() {
        parts.push(format!("STDOUT:\n{stdout}"));
    }
    if !stderr.is_empty() {
        parts.push(format!("STDERR:\n{stderr}"));
    }
    match code {
        Some(0) => {}
        Some(code) => parts.push(format!("Process exited with code {code}")),
        None => parts.push("Process terminated by a signal".to_string()),
    }
    if parts.is_empty() {
        "No output produced.".to_string()
    } else {
        parts.join("\n")
    }
}

#[async_trait::async_trait]
impl Tool for RunScriptTool {
    fn name(&self) -> &str {
        "run_python_file"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": format!(
                        "The .{} file to execute, relative to the working directory.",
                        self.extension
                    )
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of optional arguments for the file to be executed."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let input: RunScriptInput = parse_input(self.name(), input)?;
        let path = self.root.resolve(&input.file_path, Access::Execute)?;

        if !path.exists() {
            return Err(ToolError::NotFound(input.file_path));
        }
        if !self.has_extension(&path) {
            return Err(ToolError::WrongFileType {
                path: input.file_path,
                extension: self.extension.clone(),
            });
        }

        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.arg(&path)
            .args(input.args.unwrap_or_default())
            .current_dir(self.root.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| ToolError::ExecutionFailure(e.to_string()))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ToolError::ExecutionFailure(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| ToolError::ExecutionFailure(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(format_output(&stdout, &stderr, output.status.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stdout_only() {
        assert_eq!(format_output("hello", "", Some(0)), "STDOUT:\nhello");
    }

    #[test]
    fn test_format_all_parts() {
        assert_eq!(
            format_output("out\n", "err\n", Some(2)),
            "STDOUT:\nout\n\nSTDERR:\nerr\n\nProcess exited with code 2"
        );
    }

    #[test]
    fn test_format_nothing() {
        assert_eq!(format_output("", "", Some(0)), "No output produced.");
    }

    #[test]
    fn test_catalogue_names_configured_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let tool = RunScriptTool::new(
            WorkingRoot::new(dir.path()).unwrap(),
            "sh".into(),
            "sh".into(),
            Duration::from_secs(1),
        );
        assert_eq!(
            tool.description(),
            "Executes a .sh script with sh (with optional arguments) in the working directory."
        );
        assert_eq!(
            tool.schema()["properties"]["file_path"]["description"],
            "The .sh file to execute, relative to the working directory."
        );
        assert!(!tool.description().contains("Python"));
    }
}
