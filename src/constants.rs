//! Centralized constants for corral.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "corral";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "corral.toml";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default LLM model identifier for Gemini.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-001";

/// Default LLM model identifier for Anthropic.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-6";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default LLM model identifier for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "arcee-ai/trinity-large-preview:free";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Default system instruction sent with every round trip.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. \
You can perform the following operations:

- List files and directories
- Read file contents
- Execute .{extension} scripts with optional arguments (run by {interpreter})
- Write or overwrite files

Start by running main.{extension} to learn what the project does before trying anything else.

All paths you provide must be relative to the working directory. The working \
directory is injected automatically, so never include it in your function calls.
Do not ask the user for more information. Work with what you were given and \
be proactive with function calls.";

// --- Agent loop ---

/// Ceiling on model round trips in a single run.
pub const MAX_MODEL_CALLS: usize = 20;

/// Working directory used when neither the CLI nor config names one.
pub const DEFAULT_WORKING_DIR: &str = ".";

// --- Tool limits ---

/// Maximum number of characters the file reader returns.
pub const READ_FILE_MAX_CHARS: usize = 10_000;

/// Wall-clock limit for a script run, in seconds.
pub const SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Interpreter used to run scripts.
pub const SCRIPT_INTERPRETER: &str = "python3";

/// File extension (without the dot) a script must carry.
pub const SCRIPT_EXTENSION: &str = "py";
