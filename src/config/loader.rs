//! File loading and merging for corral configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{Config, ProviderConfig, ScriptConfig, ToolsConfig};

impl Config {
    /// Loads the global config from `~/.config/corral/config.toml`.
    ///
    /// Returns `None` when the file does not exist.
    pub(super) fn load_global() -> Result<Option<Self>> {
        Self::load_file(&Self::config_path()?)
    }

    /// Look for corral.toml in `start`, then walk up to the git root.
    pub(super) fn load_project(start: &Path) -> Result<Option<Self>> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load_file(&candidate);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Parses one TOML config file, or returns `None` if it is absent.
    pub(super) fn load_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(Some(config))
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: project.model.or(global.model),
            default_provider: project.default_provider.or(global.default_provider),
            system_prompt: project.system_prompt.or(global.system_prompt),
            working_dir: project.working_dir.or(global.working_dir),
            max_calls: project.max_calls.or(global.max_calls),
            tools: ToolsConfig {
                read_max_chars: project.tools.read_max_chars.or(global.tools.read_max_chars),
                script: ScriptConfig {
                    interpreter: project
                        .tools
                        .script
                        .interpreter
                        .or(global.tools.script.interpreter),
                    extension: project
                        .tools
                        .script
                        .extension
                        .or(global.tools.script.extension),
                    timeout_secs: project
                        .tools
                        .script
                        .timeout_secs
                        .or(global.tools.script.timeout_secs),
                },
            },
            provider: ProviderConfig {
                gemini: project.provider.gemini.or(global.provider.gemini),
                openai: project.provider.openai.or(global.provider.openai),
                anthropic: project.provider.anthropic.or(global.provider.anthropic),
                ollama: project.provider.ollama.or(global.provider.ollama),
                openrouter: project.provider.openrouter.or(global.provider.openrouter),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_file(&dir.path().join("nope.toml"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parses_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"model = "gemini-2.5-pro"
working_dir = "./calculator"
max_calls = 5

[tools]
read_max_chars = 2000

[tools.script]
interpreter = "python3.12"
timeout_secs = 10

[provider.gemini]
api_key = "{env:GEMINI_API_KEY}"
"#,
        )
        .unwrap();

        let config = Config::load_file(&path).unwrap().unwrap();
        assert_eq!(config.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.max_calls, Some(5));
        assert_eq!(config.tools.read_max_chars, Some(2000));
        assert_eq!(config.tools.script.interpreter.as_deref(), Some("python3.12"));
        assert_eq!(config.tools.script.extension, None);
        assert!(config.provider.gemini.is_some());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_calls = \"many\"").unwrap();
        assert!(Config::load_file(&path).is_err());
    }

    #[test]
    fn test_project_config_found_in_parent_until_git_root() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("repo");
        let nested = repo.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        fs::write(repo.join("corral.toml"), "max_calls = 3").unwrap();

        let config = Config::load_project(&nested).unwrap().unwrap();
        assert_eq!(config.max_calls, Some(3));
    }

    #[test]
    fn test_project_search_stops_at_git_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("corral.toml"), "max_calls = 3").unwrap();
        let repo = dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(Config::load_project(&repo).unwrap().is_none());
    }

    #[test]
    fn test_merge_prefers_project() {
        let global = Config {
            model: Some("global-model".into()),
            max_calls: Some(20),
            tools: ToolsConfig {
                read_max_chars: Some(100),
                script: ScriptConfig {
                    interpreter: Some("python3".into()),
                    ..ScriptConfig::default()
                },
            },
            ..Config::default()
        };
        let project = Config {
            max_calls: Some(4),
            tools: ToolsConfig {
                script: ScriptConfig {
                    timeout_secs: Some(5),
                    ..ScriptConfig::default()
                },
                ..ToolsConfig::default()
            },
            ..Config::default()
        };

        let merged = Config::merge(global, project);
        assert_eq!(merged.model.as_deref(), Some("global-model"));
        assert_eq!(merged.max_calls, Some(4));
        assert_eq!(merged.tools.read_max_chars, Some(100));
        assert_eq!(merged.tools.script.interpreter.as_deref(), Some("python3"));
        assert_eq!(merged.tools.script.timeout_secs, Some(5));
    }
}
