pub mod dispatch;
pub mod list_dir;
pub mod read_file;
pub mod run_script;
pub mod write_file;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ToolError;
use crate::sandbox::WorkingRoot;

use list_dir::ListDirTool;
use read_file::ReadFileTool;
use run_script::RunScriptTool;
use write_file::WriteFileTool;

pub use dispatch::ToolExecutor;

/// The result of executing a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            content,
            is_error: true,
        }
    }
}

impl From<Result<String, ToolError>> for ToolResult {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(e) => Self::error(format!("Error: {e}")),
        }
    }
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Limits and interpreter settings shared by the built-in tools.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Character cap for file reads.
    pub read_max_chars: usize,
    /// Program that runs scripts.
    pub interpreter: String,
    /// Extension (without the dot) a script must carry.
    pub extension: String,
    /// Wall-clock limit for one script run.
    pub timeout: Duration,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            read_max_chars: crate::constants::READ_FILE_MAX_CHARS,
            interpreter: crate::constants::SCRIPT_INTERPRETER.to_string(),
            extension: crate::constants::SCRIPT_EXTENSION.to_string(),
            timeout: Duration::from_secs(crate::constants::SCRIPT_TIMEOUT_SECS),
        }
    }
}

/// Every tool implements this trait.
///
/// The working root is injected at construction; the model never supplies it.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description for the LLM's tool catalogue.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value) -> Result<String, ToolError>;
}

/// Deserializes model-supplied arguments into a tool's input struct.
///
/// Some providers send `null` for a call with no arguments; that is read as
/// an empty object so optional-only tools still work.
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    let input = if input.is_null() {
        Value::Object(Default::default())
    } else {
        input
    };
    serde_json::from_value(input).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Holds all registered tools and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(Arc::from(tool));
    }

    /// Produce definitions for the LLM (sent in the API request).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    /// Look up a tool by name and execute it.
    ///
    /// Unknown names fail with [`ToolError::UnknownTool`] before any tool runs.
    pub async fn execute(&self, name: &str, input: Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(input).await
    }

    /// How many tools are registered.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Create a registry with the four sandboxed file-system tools.
    pub fn with_builtins(root: WorkingRoot, settings: ToolSettings) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ListDirTool::new(root.clone())));
        registry.register(Box::new(ReadFileTool::new(
            root.clone(),
            settings.read_max_chars,
        )));
        registry.register(Box::new(RunScriptTool::new(
            root.clone(),
            settings.interpreter,
            settings.extension,
            settings.timeout,
        )));
        registry.register(Box::new(WriteFileTool::new(root)));
        registry
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
