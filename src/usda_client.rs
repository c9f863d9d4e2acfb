//! # USDA FoodData Central Client
//!
//! Search and detail requests against the FoodData Central REST API, with
//! retries and circuit breaker protection.
//!
//! The [`FoodDatabase`] trait is the seam the reconciliation pipeline talks
//! to; [`UsdaClient`] is its production implementation.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::candidate_scorer::{rank_candidates, SearchTerms};
use crate::circuit_breaker::CircuitBreaker;
use crate::food_model::{FoodCandidate, FoodDetail, SearchResponse};
use crate::usda_config::UsdaConfig;
use crate::usda_errors::UsdaError;

/// Source of candidate foods and their nutrient records
#[async_trait]
pub trait FoodDatabase: Send + Sync {
    /// Search by ingredient name, returning candidates ranked best first
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodCandidate>, UsdaError>;

    /// Fetch the nutrient record of one food
    async fn food_details(&self, fdc_id: u64) -> Result<FoodDetail, UsdaError>;
}

/// HTTP client for FoodData Central
#[derive(Debug)]
pub struct UsdaClient {
    http: Client,
    config: UsdaConfig,
    circuit_breaker: CircuitBreaker,
}

impl UsdaClient {
    /// Build a client from configuration
    ///
    /// A missing API key is accepted here; every request then fails with
    /// [`UsdaError::ConfigurationMissing`].
    pub fn new(config: UsdaConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build USDA HTTP client: {}", e))?;

        if !config.has_api_key() {
            warn!("USDA API key is not configured, nutrition lookups are disabled");
        }

        let circuit_breaker = CircuitBreaker::new(config.recovery.clone());
        Ok(Self {
            http,
            config,
            circuit_breaker,
        })
    }

    pub fn config(&self) -> &UsdaConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, UsdaError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(UsdaError::ConfigurationMissing)
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let recovery = &self.config.recovery;
        let exponential = recovery
            .base_retry_delay_ms
            .saturating_mul(1u64 << attempt.min(16));
        let capped = exponential.min(recovery.max_retry_delay_ms);
        let jitter = rand::thread_rng().gen_range(0..=recovery.base_retry_delay_ms / 2);
        Duration::from_millis(capped + jitter)
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UsdaError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UsdaError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UsdaError::Decode(e.to_string()))
    }

    /// GET `url` and decode the JSON body, retrying transient failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UsdaError> {
        if self.circuit_breaker.is_open() {
            warn!(url = %url, "Circuit breaker open, skipping USDA request");
            return Err(UsdaError::CircuitOpen);
        }

        let mut attempt = 0;
        loop {
            match self.send_once(url, query).await {
                Ok(body) => {
                    self.circuit_breaker.record_success();
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < self.config.recovery.max_retries => {
                    let delay = self.retry_delay(attempt);
                    attempt += 1;
                    warn!(
                        url = %url,
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "USDA request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    // Only upstream health problems count toward opening the circuit
                    if e.is_retryable() {
                        self.circuit_breaker.record_failure();
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl FoodDatabase for UsdaClient {
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodCandidate>, UsdaError> {
        let api_key = self.api_key()?;

        let terms = SearchTerms::from_query(query);
        if terms.is_empty() {
            debug!(query = %query, "Query is empty after normalization, skipping search");
            return Ok(Vec::new());
        }

        let url = format!("{}/foods/search", self.config.base_url);
        let params = [
            ("api_key", api_key.to_string()),
            ("query", terms.api_query()),
            ("dataType", self.config.data_types.join(",")),
            ("pageSize", self.config.page_size.to_string()),
        ];

        let response: SearchResponse = self.get_json(&url, &params).await?;
        info!(
            query = %terms.phrase,
            hits = response.foods.len(),
            total_hits = ?response.total_hits,
            "USDA search completed"
        );

        Ok(rank_candidates(&terms, response.foods))
    }

    async fn food_details(&self, fdc_id: u64) -> Result<FoodDetail, UsdaError> {
        let api_key = self.api_key()?;

        let url = format!("{}/food/{}", self.config.base_url, fdc_id);
        let params = [("api_key", api_key.to_string())];

        let detail: FoodDetail = self.get_json(&url, &params).await?;
        debug!(
            fdc_id,
            description = ?detail.description,
            nutrients = detail.food_nutrients.len(),
            "USDA food details received"
        );
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usda_config::RecoveryConfig;

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let client = UsdaClient::new(UsdaConfig::with_base_url(None, "http://127.0.0.1:9")).unwrap();

        assert_eq!(
            client.search_foods("apple").await,
            Err(UsdaError::ConfigurationMissing)
        );
        assert_eq!(
            client.food_details(1).await.unwrap_err(),
            UsdaError::ConfigurationMissing
        );
        // Configuration errors do not count against the circuit breaker
        assert_eq!(client.circuit_breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_query_returns_no_candidates() {
        let client =
            UsdaClient::new(UsdaConfig::with_base_url(Some("key"), "http://127.0.0.1:9")).unwrap();
        assert_eq!(client.search_foods(" and, with ").await, Ok(Vec::new()));
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let mut config = UsdaConfig::default();
        config.recovery = RecoveryConfig {
            base_retry_delay_ms: 100,
            max_retry_delay_ms: 300,
            ..Default::default()
        };
        let client = UsdaClient::new(config).unwrap();

        for attempt in 0..10 {
            let delay = client.retry_delay(attempt).as_millis() as u64;
            assert!(delay >= 100.min(300));
            assert!(delay <= 300 + 50);
        }
    }
}
