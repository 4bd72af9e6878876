//! Engine configuration.
//!
//! Loaded from an optional YAML file (an explicit path, or
//! `~/.task-chat/config.yaml` when present), then overridden by environment
//! variables. Everything has a working default; a missing config file is
//! not an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oracle: OracleConfig,
}

/// Settings for the external classification oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Whether to consult the oracle at all. Enabled automatically when an
    /// API key arrives via the environment.
    pub enabled: bool,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 500,
            temperature: 0.1,
        }
    }
}

impl Config {
    /// Load configuration: file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)
                .with_context(|| format!("failed to load config from {}", p.display()))?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)
                    .with_context(|| format!("failed to load config from {}", p.display()))?,
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".task-chat").join("config.yaml"))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("TASK_CHAT_ORACLE_URL") {
            self.oracle.api_url = url;
        }
        if let Ok(model) = std::env::var("TASK_CHAT_ORACLE_MODEL") {
            self.oracle.model = model;
        }
        let key = std::env::var("TASK_CHAT_ORACLE_KEY")
            .or_else(|_| std::env::var("GROQ_API_KEY"))
            .ok();
        if let Some(key) = key {
            self.oracle.api_key = key;
            self.oracle.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_have_oracle_disabled() {
        let config = Config::default();
        assert!(!config.oracle.enabled);
        assert!(config.oracle.api_key.is_empty());
    }

    #[test]
    fn loads_partial_yaml_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "oracle:\n  enabled: true\n  model: test-model").expect("write");

        let config = Config::from_file(file.path()).expect("load");
        assert!(config.oracle.enabled);
        assert_eq!(config.oracle.model, "test-model");
        // Untouched fields keep their defaults.
        assert_eq!(config.oracle.max_tokens, 500);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Config::from_file(Path::new("/nonexistent/config.yaml")).is_err());
    }
}
