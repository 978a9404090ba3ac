//! Configuration loading and validation for Cocorabot.
//!
//! Loads configuration from `~/.cocorabot/config.toml` with environment
//! variable overrides. All settings are read once at process start; nothing
//! is reloaded at runtime.
//!
//! Environment overrides (highest priority):
//! - `COCORABOT_API_KEY` / `GEMINI_API_KEY` — completion API credential
//! - `COCORABOT_MODEL` — model name
//! - `COCORABOT_PORT` — gateway listen port
//! - `COCORABOT_KNOWLEDGE_PATH` — knowledge document file or directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.cocorabot/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion API credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to request completions from
    #[serde(default = "default_model")]
    pub model: String,

    /// Gateway (HTTP server) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knowledge store configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Completion client configuration
    #[serde(default)]
    pub completion: CompletionConfig,
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            gateway: GatewayConfig::default(),
            knowledge: KnowledgeConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("gateway", &self.gateway)
            .field("knowledge", &self.knowledge)
            .field("completion", &self.completion)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    30011
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeConfig {
    /// Path to the knowledge document: a structured `.json` file or a
    /// directory of text documents. Unset means the store stays empty and
    /// every question is answered from general knowledge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Maximum completion attempts when rate-limited (first try included)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between retries; doubles each attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// How many trailing history turns accompany the composed prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    500
}
fn default_history_window() -> usize {
    2
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            history_window: default_history_window(),
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from the default path (`~/.cocorabot/config.toml`)
    /// with environment overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply environment
    /// overrides.
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path. A missing file yields
    /// the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("COCORABOT_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("COCORABOT_MODEL") {
            self.model = model;
        }

        if let Ok(port) = std::env::var("COCORABOT_PORT") {
            match port.parse() {
                Ok(p) => self.gateway.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring unparseable COCORABOT_PORT"),
            }
        }

        if let Ok(path) = std::env::var("COCORABOT_KNOWLEDGE_PATH") {
            self.knowledge.path = Some(PathBuf::from(path));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".cocorabot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.completion.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "completion.max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}
