use serde::Deserialize;

use crate::utils::constants::{DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_TOKEN_SAFETY_MARGIN_SECS};

/// ================================
/// Client-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    /// applied to the token exchange and to the API call separately
    pub request_timeout_ms: Option<u64>,
    pub token_cache: Option<TokenCacheConfig>,
    pub logging: Option<LoggingConfig>,
}

impl SettingsConfig {
    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    }
}

/// ================================
/// Token cache
/// ================================
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TokenCacheConfig {
    #[serde(default)]
    pub enabled: bool,
    /// token is refreshed this many seconds before it expires
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            safety_margin_seconds: DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
        }
    }
}

fn default_safety_margin_seconds() -> u64 {
    DEFAULT_TOKEN_SAFETY_MARGIN_SECS
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}
