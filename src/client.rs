use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::attraction::{RawAttraction, ResponseEnvelope};

// Client for the upstream tourism content service: two read-only JSON
// endpoints (category listing and attraction search), authenticated with a
// per-request API key header.

pub const DEFAULT_BASE_URL: &str = "https://api.stb.gov.sg";
pub const DEFAULT_MEDIA_BASE_URL: &str = "https://tih.stb.gov.sg/bin/GetMediaByUuid";

const TYPES_PATH: &str = "/content/common/v2/types";
const SEARCH_PATH: &str = "/content/attractions/v2/search";

// The fixed category group this application browses.
const CATEGORY_GROUP: &str = "attractions";

// Error types for the content API boundary. Field-level absence inside a
// record is NOT an error; the wire structs default those fields away.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("API error: {status_code} - {message}")]
    ResponseStatus {
        status_code: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::ResponseStatus { is_retryable, .. } => *is_retryable,
            ApiError::Decode(_) => false,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization error: {0}")]
    Init(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub media_base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout_ms: 10_000,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

// Exponential backoff with jitter to avoid thundering-herd retries.
pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
    let base_backoff_ms = (config.initial_backoff_ms as f64
        * config.backoff_multiplier.powf(retry_attempt as f64))
    .min(config.max_backoff_ms as f64);

    let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
    let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

    Duration::from_millis(backoff_ms as u64)
}

/// Search requests the service understands: a free-text keyword or an
/// explicit uuid list, with an optional result-count limit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub search_type: SearchType,
    pub values: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Keyword,
    Uuids,
}

impl SearchType {
    fn as_param(self) -> &'static str {
        match self {
            SearchType::Keyword => "keyword",
            SearchType::Uuids => "uuids",
        }
    }
}

impl SearchQuery {
    pub fn keyword(value: impl Into<String>) -> Self {
        Self {
            search_type: SearchType::Keyword,
            values: value.into(),
            limit: None,
        }
    }

    pub fn uuids(ids: &[&str]) -> Self {
        Self {
            search_type: SearchType::Uuids,
            values: ids.join(","),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("searchType", self.search_type.as_param().to_string()),
            ("searchValues", self.values.clone()),
        ];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// The content-service boundary the orchestrator is written against. Tests
/// drive the browser through a mock implementation of this trait.
#[async_trait]
pub trait ContentApi: Send + Sync + 'static {
    // Ordered category names for the fixed category group.
    async fn fetch_categories(&self) -> Result<Vec<String>, ApiError>;

    // Attraction records matching the query, in service order.
    async fn search_attractions(&self, query: &SearchQuery)
        -> Result<Vec<RawAttraction>, ApiError>;
}

#[derive(Debug, Default)]
struct StatCounters {
    requests_sent: AtomicUsize,
    requests_succeeded: AtomicUsize,
    requests_failed: AtomicUsize,
    requests_retried: AtomicUsize,
}

/// Snapshot of the client's request counters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub requests_retried: usize,
}

/// reqwest-backed client for the tourism content service, with bounded
/// retry on retryable failures.
pub struct TihClient {
    http: reqwest::Client,
    config: ClientConfig,
    counters: StatCounters,
}

impl TihClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::Config("API key must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| ClientError::Init(err.to_string()))?;

        Ok(Self {
            http,
            config,
            counters: StatCounters::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Expands a projected image reference against this client's media
    /// endpoint.
    pub fn media_url(&self, image: &crate::projection::ImageRef) -> Option<String> {
        image.display_url(&self.config.media_base_url)
    }

    pub fn stats(&self) -> ClientStats {
        ClientStats {
            requests_sent: self.counters.requests_sent.load(Ordering::SeqCst),
            requests_succeeded: self.counters.requests_succeeded.load(Ordering::SeqCst),
            requests_failed: self.counters.requests_failed.load(Ordering::SeqCst),
            requests_retried: self.counters.requests_retried.load(Ordering::SeqCst),
        }
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut attempt = 0u32;
        loop {
            self.counters.requests_sent.fetch_add(1, Ordering::SeqCst);
            match self.get_once(&url, params).await {
                Ok(data) => {
                    self.counters
                        .requests_succeeded
                        .fetch_add(1, Ordering::SeqCst);
                    return Ok(data);
                }
                Err(err) if err.is_retryable() && attempt < self.config.retry.max_retries => {
                    attempt += 1;
                    self.counters.requests_retried.fetch_add(1, Ordering::SeqCst);
                    let backoff = calculate_backoff(attempt, &self.config.retry);
                    tracing::debug!(
                        url = %url,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "retrying request"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => {
                    self.counters.requests_failed.fetch_add(1, Ordering::SeqCst);
                    return Err(err);
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .header("X-API-Key", &self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::ResponseStatus {
                status_code: status.as_u16(),
                message,
                is_retryable: status.as_u16() == 429 || status.is_server_error(),
            });
        }

        let envelope: ResponseEnvelope<T> = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ContentApi for TihClient {
    async fn fetch_categories(&self) -> Result<Vec<String>, ApiError> {
        self.get_data(TYPES_PATH, &[("category", CATEGORY_GROUP.to_string())])
            .await
    }

    async fn search_attractions(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RawAttraction>, ApiError> {
        self.get_data(SEARCH_PATH, &query.query_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            jitter_factor: 0.0,
            ..RetryConfig::default()
        }
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let config = no_jitter(5);
        assert_eq!(calculate_backoff(0, &config), Duration::from_millis(100));
        assert_eq!(calculate_backoff(1, &config), Duration::from_millis(200));
        assert_eq!(calculate_backoff(2, &config), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = no_jitter(20);
        assert_eq!(calculate_backoff(10, &config), Duration::from_millis(10000));
    }

    #[test]
    fn test_backoff_jitter_stays_in_range() {
        let config = RetryConfig::default();
        for attempt in 0..5 {
            let backoff = calculate_backoff(attempt, &config);
            let base = (config.initial_backoff_ms as f64
                * config.backoff_multiplier.powf(attempt as f64))
            .min(config.max_backoff_ms as f64);
            let low = base * (1.0 - config.jitter_factor / 2.0);
            let high = base * (1.0 + config.jitter_factor / 2.0);
            let ms = backoff.as_millis() as f64;
            assert!(ms >= low.floor() && ms <= high.ceil(), "{} not in range", ms);
        }
    }

    #[test]
    fn test_retryability_classification() {
        assert!(ApiError::Network("reset".to_string()).is_retryable());
        assert!(ApiError::Timeout("deadline".to_string()).is_retryable());
        assert!(!ApiError::Decode("bad json".to_string()).is_retryable());
        assert!(ApiError::ResponseStatus {
            status_code: 503,
            message: String::new(),
            is_retryable: true,
        }
        .is_retryable());
        assert!(!ApiError::ResponseStatus {
            status_code: 404,
            message: String::new(),
            is_retryable: false,
        }
        .is_retryable());
    }

    #[test]
    fn test_keyword_query_params() {
        let query = SearchQuery::keyword("beach").with_limit(4);
        assert_eq!(
            query.query_params(),
            vec![
                ("searchType", "keyword".to_string()),
                ("searchValues", "beach".to_string()),
                ("limit", "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_uuid_query_joins_values() {
        let query = SearchQuery::uuids(&["a", "b"]);
        assert_eq!(query.search_type, SearchType::Uuids);
        assert_eq!(query.values, "a,b");
        assert_eq!(query.limit, None);
        assert_eq!(
            query.query_params(),
            vec![
                ("searchType", "uuids".to_string()),
                ("searchValues", "a,b".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = TihClient::new(ClientConfig::new(""));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_client_starts_with_zeroed_stats() {
        let client = TihClient::new(ClientConfig::new("test-key")).unwrap();
        assert_eq!(client.stats(), ClientStats::default());
    }

    #[test]
    fn test_media_url_uses_configured_base() {
        let client = TihClient::new(ClientConfig::new("test-key")).unwrap();
        let media = crate::projection::ImageRef::MediaId("abc".to_string());
        assert_eq!(
            client.media_url(&media),
            Some(format!("{}?uuid=abc&mediaType=image", DEFAULT_MEDIA_BASE_URL))
        );
    }
}
