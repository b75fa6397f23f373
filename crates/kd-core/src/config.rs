//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. kissan-dost.toml config file
//! 3. Defaults
//!
//! `${VAR_NAME}` strings inside the config file are expanded from the
//! environment before parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::i18n::Language;

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL (optional, for custom endpoints)
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    // Flash for speed/latency
    "gemini-2.5-flash".to_string()
}

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "data/kissan-dost.db".to_string()
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Interface language at startup
    #[serde(default)]
    pub language: Language,

    /// Start without network access (symptom checker replaces the crop doctor)
    #[serde(default)]
    pub offline: bool,
}

/// Main configuration for kissan-dost
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Application configuration
    #[serde(default)]
    pub app: AppConfig,
}

impl Config {
    /// Expand `${VAR_NAME}` references from the environment.
    ///
    /// Unknown variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded_content = Self::expand_env_vars(&toml_content);

        let toml_config: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        let mut cfg = Self::from_toml_config(toml_config)?;

        // Environment variables win over file values
        cfg.apply_env_overrides();
        cfg.validate()?;

        Ok(cfg)
    }

    /// Load configuration from the default locations
    ///
    /// Tries `./kissan-dost.toml` first, then falls back to environment
    /// variables only.
    pub fn load() -> crate::Result<Self> {
        if Path::new("kissan-dost.toml").exists() {
            return Self::from_toml_file("kissan-dost.toml");
        }

        Self::from_env()
    }

    /// Build a Config from the parsed TOML structure
    fn from_toml_config(toml: TomlConfig) -> crate::Result<Self> {
        let llm = toml.llm.unwrap_or_default();
        let llm_config = LlmConfig {
            api_key: llm.api_key.unwrap_or_default(),
            model: llm.model.unwrap_or_else(default_model),
            base_url: llm.base_url,
        };

        let storage = toml.storage.unwrap_or_default();
        let storage_config = StorageConfig {
            db_path: storage.db_path.unwrap_or_else(default_db_path),
        };

        let app = toml.app.unwrap_or_default();
        let language = match app.language {
            Some(tag) => Language::parse(&tag)
                .ok_or_else(|| Error::Config(format!("Unknown language tag: {}", tag)))?,
            None => Language::default(),
        };
        let app_config = AppConfig {
            language,
            offline: app.offline.unwrap_or(false),
        };

        Ok(Config {
            llm: llm_config,
            storage: storage_config,
            app: app_config,
        })
    }

    /// Override settings from environment variables
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = api_key;
        } else if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }

        if let Ok(model) = std::env::var("LLM_MODEL") {
            if !model.is_empty() {
                self.llm.model = model;
            }
        }

        // Only use LLM_BASE_URL if explicitly set and non-empty (respect TOML config)
        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            if !base_url.is_empty() {
                self.llm.base_url = Some(base_url);
            }
        }

        if let Ok(path) = std::env::var("DB_PATH") {
            self.storage.db_path = path;
        }

        if let Ok(tag) = std::env::var("KD_LANGUAGE") {
            if let Some(lang) = Language::parse(&tag) {
                self.app.language = lang;
            }
        }

        if let Ok(offline) = std::env::var("KD_OFFLINE") {
            self.app.offline = offline.to_lowercase() != "false" && offline != "0";
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Config::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// An API key is required unless running offline
    fn validate(&self) -> crate::Result<()> {
        if self.llm.api_key.is_empty() && !self.app.offline {
            return Err(Error::Config(
                "GEMINI_API_KEY or LLM_API_KEY not set (or set KD_OFFLINE=1)".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective API base URL
    pub fn base_url(&self) -> &str {
        self.llm.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

use crate::Error;

// ============================================================================
// TOML structures (file parsing only)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    llm: Option<TomlLlmConfig>,
    storage: Option<TomlStorageConfig>,
    app: Option<TomlAppConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLlmConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlStorageConfig {
    #[serde(default)]
    db_path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlAppConfig {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    offline: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.api_key.is_empty());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.db_path, "data/kissan-dost.db");
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.language, Language::English);
        assert!(!config.offline);
    }

    #[test]
    fn test_base_url_fallback() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);

        let mut config = Config::default();
        config.llm.base_url = Some("https://example.com/v1".to_string());
        assert_eq!(config.base_url(), "https://example.com/v1");
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe {
            std::env::set_var("KD_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${KD_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        // Unknown variables expand to nothing
        let result = Config::expand_env_vars("prefix_${KD_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("KD_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        let result = Config::expand_env_vars("no_vars_here");
        assert_eq!(result, "no_vars_here");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[llm]
api_key = "test_key"
model = "gemini-2.5-pro"
base_url = "https://api.example.com"

[storage]
db_path = "/path/to/db"

[app]
language = "ur"
offline = true
"#;

        let toml_config: TomlConfig = toml::from_str(toml_content).unwrap();
        let config = Config::from_toml_config(toml_config).unwrap();

        assert_eq!(config.llm.api_key, "test_key");
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(
            config.llm.base_url,
            Some("https://api.example.com".to_string())
        );
        assert_eq!(config.storage.db_path, "/path/to/db");
        assert_eq!(config.app.language, Language::Urdu);
        assert!(config.app.offline);
    }

    #[test]
    fn test_bad_language_tag_rejected() {
        let toml_config: TomlConfig = toml::from_str("[app]\nlanguage = \"xx\"\n").unwrap();
        assert!(Config::from_toml_config(toml_config).is_err());
    }

    #[test]
    fn test_validate_requires_key_when_online() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.app.offline = true;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.llm.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }
}
