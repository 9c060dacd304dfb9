//! Environment variable substitution, API key resolution, and defaulted
//! accessors.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{Config, ProviderEntry};
use crate::constants::{
    DEFAULT_SYSTEM_PROMPT, DEFAULT_WORKING_DIR, MAX_MODEL_CALLS, READ_FILE_MAX_CHARS,
    SCRIPT_EXTENSION, SCRIPT_INTERPRETER, SCRIPT_TIMEOUT_SECS,
};
use crate::tools::ToolSettings;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        for field in [
            &mut self.model,
            &mut self.default_provider,
            &mut self.system_prompt,
            &mut self.tools.script.interpreter,
        ] {
            if let Some(value) = field.as_mut() {
                *value = Self::resolve_str(value);
            }
        }
        Self::resolve_provider_entry(&mut self.provider.gemini);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.ollama);
        Self::resolve_provider_entry(&mut self.provider.openrouter);
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    /// Resolve API key for a provider: env var first, then config value.
    ///
    /// Empty values count as missing.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // GEMINI_API_KEY, ANTHROPIC_API_KEY, etc.
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        let entry = match provider {
            "gemini" => &self.provider.gemini,
            "openai" => &self.provider.openai,
            "anthropic" => &self.provider.anthropic,
            "ollama" => &self.provider.ollama,
            "openrouter" => &self.provider.openrouter,
            _ => &None,
        };
        entry
            .as_ref()
            .and_then(|e| e.api_key.clone())
            .filter(|key| !key.is_empty())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Get the configured model name, if any.
    pub fn model_name(&self) -> Option<String> {
        self.model.clone()
    }

    /// System instruction for the model.
    ///
    /// The built-in prompt names the configured script interpreter and
    /// extension; a prompt from config is used verbatim.
    pub fn system_prompt(&self) -> String {
        match &self.system_prompt {
            Some(prompt) => prompt.clone(),
            None => {
                let settings = self.tool_settings();
                DEFAULT_SYSTEM_PROMPT
                    .replace("{extension}", &settings.extension)
                    .replace("{interpreter}", &settings.interpreter)
            }
        }
    }

    /// Directory the tools are confined to.
    pub fn working_dir(&self) -> PathBuf {
        self.working_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKING_DIR))
    }

    /// Ceiling on model round trips.
    pub fn max_calls(&self) -> usize {
        self.max_calls.unwrap_or(MAX_MODEL_CALLS)
    }

    /// Limits and interpreter settings for the built-in tools.
    pub fn tool_settings(&self) -> ToolSettings {
        let script = &self.tools.script;
        ToolSettings {
            read_max_chars: self.tools.read_max_chars.unwrap_or(READ_FILE_MAX_CHARS),
            interpreter: script
                .interpreter
                .clone()
                .unwrap_or_else(|| SCRIPT_INTERPRETER.to_string()),
            extension: script
                .extension
                .as_deref()
                .unwrap_or(SCRIPT_EXTENSION)
                .trim_start_matches('.')
                .to_string(),
            timeout: Duration::from_secs(script.timeout_secs.unwrap_or(SCRIPT_TIMEOUT_SECS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScriptConfig, ToolsConfig};

    #[test]
    fn test_resolve_str_substitutes_env() {
        std::env::set_var("CORRAL_TEST_SUBST", "value");
        assert_eq!(
            Config::resolve_str("a-{env:CORRAL_TEST_SUBST}-b"),
            "a-value-b"
        );
        assert_eq!(Config::resolve_str("{env:CORRAL_TEST_UNSET_XYZ}"), "");
        assert_eq!(Config::resolve_str("{env:unterminated"), "{env:unterminated");
    }

    #[test]
    fn test_api_key_from_config_entry() {
        let mut config = Config::default();
        config.provider.openrouter = Some(ProviderEntry {
            api_key: Some("sk-test".into()),
            base_url: None,
        });
        // Assumes OPENROUTER_API_KEY is not set in the test environment.
        if std::env::var("OPENROUTER_API_KEY").is_err() {
            assert_eq!(config.resolve_api_key("openrouter").as_deref(), Some("sk-test"));
        }
        assert_eq!(config.resolve_api_key("mystery"), None);
    }

    #[test]
    fn test_empty_config_key_counts_as_missing() {
        let mut config = Config::default();
        config.provider.anthropic = Some(ProviderEntry {
            api_key: Some(String::new()),
            base_url: None,
        });
        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            assert_eq!(config.resolve_api_key("anthropic"), None);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_calls(), 20);
        assert_eq!(config.working_dir(), PathBuf::from("."));
        assert!(config.system_prompt().contains("Execute .py scripts"));
        assert!(config.system_prompt().contains("run by python3"));
        assert!(!config.system_prompt().contains('{'));

        let settings = config.tool_settings();
        assert_eq!(settings.read_max_chars, 10_000);
        assert_eq!(settings.interpreter, "python3");
        assert_eq!(settings.extension, "py");
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_tool_settings_from_config() {
        let config = Config {
            tools: ToolsConfig {
                read_max_chars: Some(50),
                script: ScriptConfig {
                    interpreter: Some("bash".into()),
                    extension: Some(".sh".into()),
                    timeout_secs: Some(3),
                },
            },
            ..Config::default()
        };
        let settings = config.tool_settings();
        assert_eq!(settings.read_max_chars, 50);
        assert_eq!(settings.interpreter, "bash");
        assert_eq!(settings.extension, "sh");
        assert_eq!(settings.timeout, Duration::from_secs(3));

        let prompt = config.system_prompt();
        assert!(prompt.contains("Execute .sh scripts with optional arguments (run by bash)"));
        assert!(prompt.contains("running main.sh"));
        assert!(!prompt.contains("Python"));
    }

    #[test]
    fn test_configured_system_prompt_is_verbatim() {
        let config = Config {
            system_prompt: Some("Answer in {extension} haiku.".into()),
            ..Config::default()
        };
        assert_eq!(config.system_prompt(), "Answer in {extension} haiku.");
    }
}
