use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::NewsConfig;
use crate::error::{AppError, NewsError};

/// Client for the upstream news API. One instance per process; the inner
/// reqwest client pools connections and enforces the per-request timeout.
pub struct NewsClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl NewsClient {
    pub fn new(config: &NewsConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("newsdesk-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid news base_url: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Fetches articles for one topic, newest first, starting at `from_date`
    /// (YYYY-MM-DD). Article objects are passed through exactly as the
    /// upstream sent them. A 2xx body without an `articles` array is an
    /// empty list; a non-2xx status or unparseable body is an error.
    pub async fn fetch_articles(&self, topic: &str, from_date: &str) -> Result<Vec<Value>, AppError> {
        let mut url = self
            .base_url
            .join("/v2/everything")
            .map_err(|e| AppError::InternalError(format!("Invalid news URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("q", topic)
            .append_pair("from", from_date)
            .append_pair("sortBy", "publishedAt")
            .append_pair("apiKey", &self.api_key);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::NewsError(NewsError::FetchFailed(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::NewsError(NewsError::FetchFailed(format!(
                "upstream returned {}",
                status
            ))));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::NewsError(NewsError::FetchFailed(e.to_string())))?;

        let articles = body
            .get("articles")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(articles)
    }
}
