use crate::errors::{JarvisError, JarvisResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_MEMORY_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

/// Configuration for the J.A.R.V.I.S suite.
///
/// Every field is optional so that a config file, the environment and
/// command-line flags can each supply a partial view and be layered with
/// [`JarvisConfig::merge`]. Use the accessor methods to read effective values.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct JarvisConfig {
    /// Key for the primary response generator
    pub api_key: Option<String>,
    /// Key for the summarizer, falls back to `api_key`
    pub memory_api_key: Option<String>,
    /// Key for the intent classifier, falls back to `api_key`
    pub classifier_api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_name: Option<String>,
    pub classifier_model: Option<String>,
    pub memory_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Summarize after every N appended messages
    pub summarize_every: Option<usize>,
    /// Number of trailing transcript entries handed to the summarizer
    pub summary_window: Option<usize>,
    pub search_url: Option<String>,
    pub memory_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl JarvisConfig {
    /// Loads configuration from a file if it exists, otherwise returns an empty config
    pub fn load_from_file(path: &Path) -> JarvisResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| JarvisError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| JarvisError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> JarvisResult<()> {
        let content = toml::to_string(self)
            .map_err(|e| JarvisError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                JarvisError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| JarvisError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reads overrides from the process environment.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("GROQ_API_KEY_1"),
            memory_api_key: non_empty("GROQ_API_KEY_2"),
            classifier_api_key: non_empty("GROQ_API_KEY_3"),
            base_url: non_empty("JARVIS_BASE_URL"),
            model_name: non_empty("JARVIS_MODEL"),
            classifier_model: non_empty("JARVIS_CLASSIFIER_MODEL"),
            memory_model: non_empty("JARVIS_MEMORY_MODEL"),
            temperature: non_empty("JARVIS_TEMPERATURE").and_then(|v| v.parse().ok()),
            max_tokens: non_empty("JARVIS_MAX_TOKENS").and_then(|v| v.parse().ok()),
            summarize_every: non_empty("JARVIS_SUMMARIZE_EVERY").and_then(|v| v.parse().ok()),
            summary_window: non_empty("JARVIS_SUMMARY_WINDOW").and_then(|v| v.parse().ok()),
            search_url: non_empty("JARVIS_SEARCH_URL"),
            memory_path: non_empty("JARVIS_MEMORY_PATH").map(PathBuf::from),
            log_level: non_empty("JARVIS_LOG_LEVEL"),
            request_timeout_secs: non_empty("JARVIS_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            memory_api_key: other
                .memory_api_key
                .clone()
                .or_else(|| self.memory_api_key.clone()),
            classifier_api_key: other
                .classifier_api_key
                .clone()
                .or_else(|| self.classifier_api_key.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            classifier_model: other
                .classifier_model
                .clone()
                .or_else(|| self.classifier_model.clone()),
            memory_model: other
                .memory_model
                .clone()
                .or_else(|| self.memory_model.clone()),
            temperature: other.temperature.or(self.temperature),
            max_tokens: other.max_tokens.or(self.max_tokens),
            summarize_every: other.summarize_every.or(self.summarize_every),
            summary_window: other.summary_window.or(self.summary_window),
            search_url: other.search_url.clone().or_else(|| self.search_url.clone()),
            memory_path: other
                .memory_path
                .clone()
                .or_else(|| self.memory_path.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }

    /// Loads the layered configuration: defaults file, then environment.
    pub fn load(path: Option<&Path>) -> JarvisResult<Self> {
        let file_config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_from_file(&get_default_config_file("jarvis")?)?,
        };
        Ok(file_config.merge(&Self::from_env()))
    }

    pub fn primary_api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn memory_api_key(&self) -> Option<&str> {
        self.memory_api_key.as_deref().or(self.primary_api_key())
    }

    pub fn classifier_api_key(&self) -> Option<&str> {
        self.classifier_api_key.as_deref().or(self.primary_api_key())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn classifier_model(&self) -> &str {
        self.classifier_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn memory_model(&self) -> &str {
        self.memory_model.as_deref().unwrap_or(DEFAULT_MEMORY_MODEL)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(0.7)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(1024)
    }

    pub fn summarize_every(&self) -> usize {
        self.summarize_every.filter(|n| *n > 0).unwrap_or(5)
    }

    pub fn summary_window(&self) -> usize {
        self.summary_window.filter(|n| *n > 0).unwrap_or(10)
    }

    pub fn search_url(&self) -> &str {
        self.search_url.as_deref().unwrap_or(DEFAULT_SEARCH_URL)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(60)
    }

    /// Path of the JSON file backing the memory store
    pub fn memory_path(&self) -> JarvisResult<PathBuf> {
        match &self.memory_path {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = dirs::data_local_dir().ok_or_else(|| {
                    JarvisError::Config("Could not determine data directory".to_string())
                })?;
                Ok(data_dir.join("jarvis").join("memory.json"))
            }
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> JarvisResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        JarvisError::Config("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> JarvisResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
