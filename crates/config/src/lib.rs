//! Configuration loading, validation, and management for Adjutant.
//!
//! Loads configuration from `~/.adjutant/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.adjutant/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API key. Usually supplied via environment instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Model id assigned to each tier.
    #[serde(default)]
    pub tiers: TierModels,

    /// Daily budget configuration.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Storage configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Which concrete model serves each tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierModels {
    #[serde(default = "default_cheap_model")]
    pub cheap: String,

    #[serde(default = "default_mid_model")]
    pub mid: String,

    #[serde(default = "default_premium_model")]
    pub premium: String,
}

impl Default for TierModels {
    fn default() -> Self {
        Self {
            cheap: default_cheap_model(),
            mid: default_mid_model(),
            premium: default_premium_model(),
        }
    }
}

/// Daily spend budget, expressed in weighted tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_daily_limit")]
    pub daily_token_limit: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            daily_token_limit: default_daily_limit(),
        }
    }
}

/// Where the SQLite database lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_cheap_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_mid_model() -> String {
    "anthropic/claude-3.5-haiku".into()
}
fn default_premium_model() -> String {
    "anthropic/claude-sonnet-4".into()
}
fn default_daily_limit() -> u64 {
    500_000
}
fn default_db_path() -> PathBuf {
    config_dir().join("adjutant.db")
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
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("tiers", &self.tiers)
            .field("budget", &self.budget)
            .field("store", &self.store)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
            tiers: TierModels::default(),
            budget: BudgetConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl AppConfig {
    /// Load from the default location with environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("ADJUTANT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(url) = std::env::var("ADJUTANT_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(path) = std::env::var("ADJUTANT_DB_PATH") {
            config.store.db_path = PathBuf::from(path);
        }

        if let Ok(limit) = std::env::var("ADJUTANT_DAILY_LIMIT") {
            config.budget.daily_token_limit =
                limit.parse().map_err(|_| ConfigError::Invalid {
                    message: format!("ADJUTANT_DAILY_LIMIT is not a number: {limit}"),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path. Missing file means defaults.
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

        config.validate()?;
        Ok(config)
    }

    /// Check settings for consistency. Called on every load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget.daily_token_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "budget.daily_token_limit must be greater than zero".into(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "request_timeout_secs must be greater than zero".into(),
            });
        }

        for (tier, model) in [
            ("cheap", &self.tiers.cheap),
            ("mid", &self.tiers.mid),
            ("premium", &self.tiers.premium),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("tiers.{tier} must name a model"),
                });
            }
        }

        Ok(())
    }
}

/// The Adjutant config directory (`~/.adjutant`).
pub fn config_dir() -> PathBuf {
    home_dir().join(".adjutant")
}

#[cfg(windows)]
fn home_dir() -> PathBuf {
    std::env::var("USERPROFILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(not(windows))]
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
