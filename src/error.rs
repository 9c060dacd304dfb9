//! Error taxonomy for tool execution and the agent loop.
//!
//! [`ToolError`] values never escape the dispatcher: they are rendered into
//! `Error: ...` strings and handed back to the model as ordinary tool
//! results. [`AgentError`] is reserved for conditions that end the run.

use std::io::Error as IoError;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Failure of a single tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The target resolved outside the working root.
    #[error("Cannot {action} \"{path}\" as it is outside the permitted working directory")]
    PathEscape { action: &'static str, path: String },

    /// A listing target that is missing or is not a directory.
    #[error("\"{0}\" is not a directory")]
    NotADirectory(String),

    /// A read target that is missing or is not a regular file.
    #[error("File not found or is an irregular file: \"{0}\"")]
    NotAFile(String),

    /// A script target that does not exist.
    #[error("File \"{0}\" not found.")]
    NotFound(String),

    /// A script target without the expected extension.
    #[error("\"{path}\" is not a .{extension} file.")]
    WrongFileType { path: String, extension: String },

    /// The interpreter could not be spawned, waited on, or timed out.
    #[error("executing script: {0}")]
    ExecutionFailure(String),

    /// The model asked for a tool that is not in the catalogue.
    #[error("Unknown function: {0}")]
    UnknownTool(String),

    /// The model's arguments did not match the tool's schema.
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: SerdeJsonError,
    },

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Unrecoverable failure of the agent loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The dispatcher did not produce a response for a requested call.
    #[error("missing tool response for function call: {name} (id {id:?})")]
    MissingToolResponse { name: String, id: String },
}
