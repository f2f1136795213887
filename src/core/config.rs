//! Configuration management for Oscillate.
//!
//! Handles loading configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::ProviderKind;

/// Local config file name, looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".oscillate.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion provider settings
    pub ai: AiConfig,

    /// Refinement loop settings
    pub refine: RefineSettings,
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider backend (openai, ollama)
    pub provider: ProviderKind,

    /// Model to request
    pub model: String,

    /// Override endpoint, e.g. a credential-holding proxy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key; OPENAI_API_KEY is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Refinement loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineSettings {
    /// Number of generate/select rounds
    pub rounds: usize,

    /// Pause between rounds, in seconds
    pub pause_secs: u64,
}

impl RefineSettings {
    /// Pause between rounds.
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.oscillate.toml` in current directory
    /// 2. `~/.config/oscillate/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        match Self::locate() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Path of the config file that [`Config::load`] would read, if any exists.
    pub fn locate() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::config_dir().map(|d| d.join("config.toml")).filter(|p| p.exists())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("oscillate"))
    }

    /// Copy of this config with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.ai.api_key.is_some() {
            config.ai.api_key = Some("********".to_string());
        }
        config
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-3.5-turbo".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

impl Default for RefineSettings {
    fn default() -> Self {
        Self { rounds: 10, pause_secs: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ai.provider, ProviderKind::OpenAI);
        assert_eq!(config.ai.model, "gpt-3.5-turbo");
        assert_eq!(config.refine.rounds, 10);
        assert_eq!(config.refine.pause(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[ai]"));
        assert!(toml_str.contains("[refine]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [ai]
            provider = "ollama"
            model = "llama3.2"
            base_url = "http://localhost:11434"

            [refine]
            rounds = 3
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai.provider, ProviderKind::Ollama);
        assert_eq!(config.ai.model, "llama3.2");
        assert_eq!(config.ai.base_url.as_deref(), Some("http://localhost:11434"));
        assert_eq!(config.refine.rounds, 3);
        assert_eq!(config.refine.pause_secs, 5);
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let mut config = Config::default();
        config.ai.api_key = Some("sk-secret".to_string());

        let shown = toml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("********"));
    }
}
