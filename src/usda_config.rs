//! # USDA Configuration Module
//!
//! This module defines configuration structures for the FoodData Central client,
//! including search parameters, match thresholds and recovery settings.

use std::env;

// Constants for USDA configuration
pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_MIN_SCORE: f64 = 30.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const PREFERRED_DATA_TYPES: [&str; 3] = ["Survey (FNDDS)", "Foundation", "SR Legacy"];

/// Recovery configuration for failed requests
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 250,  // 250ms
            max_retry_delay_ms: 4000,  // 4 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration structure for FoodData Central access
#[derive(Debug, Clone)]
pub struct UsdaConfig {
    /// API key; `None` means the service is treated as unavailable
    pub api_key: Option<String>,
    /// Base URL of the FoodData Central API
    pub base_url: String,
    /// Number of search hits requested per query
    pub page_size: u32,
    /// Data categories the search is restricted to
    pub data_types: Vec<String>,
    /// Minimum candidate score accepted as a match
    pub min_score: f64,
    /// Transport timeout for a single request in seconds
    pub request_timeout_secs: u64,
    /// Retry and circuit breaker configuration
    pub recovery: RecoveryConfig,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            data_types: PREFERRED_DATA_TYPES.iter().map(|t| t.to_string()).collect(),
            min_score: DEFAULT_MIN_SCORE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl UsdaConfig {
    /// Build a configuration from the process environment
    ///
    /// Loads a `.env` file when present, then reads `USDA_API_KEY`,
    /// `USDA_BASE_URL`, `USDA_PAGE_SIZE` and `USDA_MIN_SCORE`. Unset or
    /// unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::default();
        config.api_key = env::var("USDA_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Ok(base_url) = env::var("USDA_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }
        if let Some(page_size) = env::var("USDA_PAGE_SIZE").ok().and_then(|v| v.parse().ok()) {
            config.page_size = page_size;
        }
        if let Some(min_score) = env::var("USDA_MIN_SCORE").ok().and_then(|v| v.parse().ok()) {
            config.min_score = min_score;
        }

        config
    }

    /// Configuration pointing at a custom endpoint, used by tests and proxies
    pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            api_key: api_key.map(|k| k.to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UsdaConfig::default();
        assert_eq!(config.base_url, "https://api.nal.usda.gov/fdc/v1");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.min_score, 30.0);
        assert_eq!(config.data_types, vec!["Survey (FNDDS)", "Foundation", "SR Legacy"]);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_recovery_defaults_are_reasonable() {
        let recovery = RecoveryConfig::default();
        assert!(recovery.max_retries <= 5);
        assert!(recovery.base_retry_delay_ms <= recovery.max_retry_delay_ms);
        assert!(recovery.circuit_breaker_threshold > 0);
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = UsdaConfig::with_base_url(Some("key"), "http://127.0.0.1:1234/");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.api_key.as_deref(), Some("key"));
    }
}
