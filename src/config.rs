use serde::Deserialize;
use std::env;
use std::fs;
use anyhow::{Context, Result};

use crate::error::MondayError;

pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    pub limits: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            api_version: None,
            timeout_ms: default_timeout_ms(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// Token from the config file, falling back to `MONDAY_API_TOKEN`.
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(env::var("MONDAY_API_TOKEN").ok())
    }

    /// Token from the config file, falling back to `fallback`. Empty values
    /// count as missing.
    pub fn resolve_token_with(&self, fallback: Option<String>) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| fallback.filter(|t| !t.is_empty()))
    }
}

/// What the limiter does when the rolling minute window is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowMode {
    /// Suspend the caller until the oldest request leaves the window.
    Block,
    /// Fail immediately with a rate-limit error.
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_minute_limit")]
    pub minute_limit: u32,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
    #[serde(default = "default_max_array_size")]
    pub max_array_size: usize,
    pub mode: OverflowMode,
}

impl RateLimitConfig {
    /// Default limits with an explicit overflow mode.
    pub fn new(mode: OverflowMode) -> Self {
        Self {
            minute_limit: default_minute_limit(),
            daily_limit: default_daily_limit(),
            retry_delay: default_retry_delay(),
            cleanup_interval: default_cleanup_interval(),
            max_array_size: default_max_array_size(),
            mode,
        }
    }

    pub fn blocking() -> Self {
        Self::new(OverflowMode::Block)
    }

    pub fn non_blocking() -> Self {
        Self::new(OverflowMode::Reject)
    }

    pub fn validate(&self) -> Result<(), MondayError> {
        if self.minute_limit == 0 {
            return Err(MondayError::Config("minute_limit must be greater than zero".into()));
        }
        if self.daily_limit == 0 {
            return Err(MondayError::Config("daily_limit must be greater than zero".into()));
        }
        if self.max_array_size == 0 {
            return Err(MondayError::Config("max_array_size must be greater than zero".into()));
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_minute_limit() -> u32 {
    100
}

fn default_daily_limit() -> u32 {
    1000
}

fn default_retry_delay() -> u64 {
    60
}

fn default_cleanup_interval() -> u64 {
    300
}

fn default_max_array_size() -> usize {
    10_000
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .with_context(|| "Failed to parse configuration")?;

    config
        .limits
        .validate()
        .with_context(|| "Invalid [limits] section")?;

    Ok(config)
}

pub fn load_config() -> Result<Config> {
    let config_path = env::var("MONDAY_CONFIG").unwrap_or_else(|_| "monday.toml".to_string());

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;

    parse_config(&config_content)
}
