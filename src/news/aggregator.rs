use chrono::{Duration, Utc};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::error::{AppError, NewsError};
use crate::news::client::NewsClient;

pub struct NewsAggregator {
    client: Arc<NewsClient>,
}

impl NewsAggregator {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }

    /// One merged article list for many topics. All fetches run
    /// concurrently and the call resolves once every one has settled; a
    /// failed topic contributes an empty list and never disturbs its
    /// siblings. Merging is concatenation in input order, nothing more.
    pub async fn fetch_news_for_topics(&self, topics: &[String]) -> Result<Vec<Value>, AppError> {
        if !self.client.has_api_key() {
            return Err(AppError::NewsError(NewsError::ApiKeyMissing));
        }

        // One window shared by the whole batch
        let from_date = window_start();

        let fetches = topics
            .iter()
            .map(|topic| self.fetch_or_empty(topic, &from_date));
        let per_topic = join_all(fetches).await;

        Ok(per_topic.into_iter().flatten().collect())
    }

    /// Single-topic variant: here a fetch failure fails the whole call.
    pub async fn fetch_single_topic(&self, topic: &str) -> Result<Vec<Value>, AppError> {
        if !self.client.has_api_key() {
            return Err(AppError::NewsError(NewsError::ApiKeyMissing));
        }

        self.client.fetch_articles(topic, &window_start()).await
    }

    async fn fetch_or_empty(&self, topic: &str, from_date: &str) -> Vec<Value> {
        match self.client.fetch_articles(topic, from_date).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Error fetching news for query \"{}\": {}", topic, e);
                Vec::new()
            }
        }
    }
}

/// Start of the article window: seven days back, date only.
fn window_start() -> String {
    (Utc::now() - Duration::days(7)).format("%Y-%m-%d").to_string()
}
