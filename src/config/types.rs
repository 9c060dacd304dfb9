//! Struct definitions for corral configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for corral, deserialized from `config.toml` or a
/// project's `corral.toml`.
///
/// Every field is optional so corral runs with built-in defaults when no
/// config file exists. Accessors in `resolve.rs` apply those defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Model identifier (e.g. `"gemini-2.0-flash-001"`).
    #[serde(default)]
    pub model: Option<String>,
    /// Default provider name (e.g., "gemini", "anthropic").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// System instruction sent on every round trip.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Directory all tools are confined to.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Ceiling on model round trips per run.
    #[serde(default)]
    pub max_calls: Option<usize>,
    /// Tool limits.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Limits for the built-in tools.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ToolsConfig {
    /// Character cap for file reads.
    pub read_max_chars: Option<usize>,
    /// Script runner settings.
    #[serde(default)]
    pub script: ScriptConfig,
}

/// How scripts are executed.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScriptConfig {
    /// Interpreter program, looked up on `PATH`.
    pub interpreter: Option<String>,
    /// Required file extension, without the dot.
    pub extension: Option<String>,
    /// Wall-clock limit in seconds.
    pub timeout_secs: Option<u64>,
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the Google Gemini provider.
    pub gemini: Option<ProviderEntry>,
    /// Configuration for the OpenAI API provider.
    pub openai: Option<ProviderEntry>,
    /// Configuration for the Anthropic API provider.
    pub anthropic: Option<ProviderEntry>,
    /// Configuration for the local Ollama provider.
    pub ollama: Option<ProviderEntry>,
    /// Configuration for the OpenRouter API provider.
    pub openrouter: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API (useful for proxies or self-hosted instances).
    pub base_url: Option<String>,
}
