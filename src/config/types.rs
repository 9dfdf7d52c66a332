// Configuration type definitions

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_DELAY_MS: u64 = 2000;
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// How rapid input is collapsed into suggestion requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuggestMode {
    /// Restart the delay on every keystroke; fetch once typing pauses
    #[default]
    Debounce,
    /// Fetch at most once per delay window, using the newest input
    Throttle,
}

impl FromStr for SuggestMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debounce" => Ok(SuggestMode::Debounce),
            "throttle" => Ok(SuggestMode::Throttle),
            other => Err(ConfigError::Invalid(format!(
                "unknown suggestion mode '{}' (expected debounce or throttle)",
                other
            ))),
        }
    }
}

/// Suggestion controller section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub mode: SuggestMode,
}

impl SuggestionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            delay_ms: DEFAULT_DELAY_MS,
            mode: SuggestMode::Debounce,
        }
    }
}

/// Backend API section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Reject values that parse but cannot drive a controller or client
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suggestions.delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "suggestions.delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_ms must be greater than zero".to_string(),
            ));
        }
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must start with http:// or https:// (got '{}')",
                self.api.base_url
            )));
        }
        Ok(())
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
