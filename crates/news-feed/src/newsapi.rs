use crate::{sample_from_articles, RawArticle};
use analysis_core::{NewsSource, NewsSourceId, SentimentSample};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use sentiment_analysis::SentimentLexicon;
use serde::Deserialize;
use std::sync::Arc;

const BASE_URL: &str = "https://newsapi.org";

/// REST news API client (`/v2/everything`): last seven days of
/// English-language articles for the ticker, sorted by relevancy.
pub struct NewsApiClient {
    api_key: String,
    client: Client,
    base_url: String,
    lexicon: Arc<SentimentLexicon>,
}

impl NewsApiClient {
    pub fn new(api_key: String, lexicon: Arc<SentimentLexicon>) -> Self {
        Self {
            api_key,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: BASE_URL.to_string(),
            lexicon,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn try_fetch(&self, ticker: &str) -> Result<Vec<RawArticle>, String> {
        let now = Utc::now();
        let from = (now - Duration::days(7)).format("%Y-%m-%d").to_string();
        let to = now.format("%Y-%m-%d").to_string();
        let url = format!("{}/v2/everything", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", ticker),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("pageSize", "20"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body: EverythingResponse = response.json().await.map_err(|e| e.to_string())?;

        Ok(body
            .articles
            .into_iter()
            .map(|a| RawArticle {
                title: a.title,
                description: a.description,
            })
            .collect())
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn id(&self) -> NewsSourceId {
        NewsSourceId::NewsApi
    }

    async fn fetch(&self, ticker: &str) -> SentimentSample {
        match self.try_fetch(ticker).await {
            Ok(articles) => {
                if articles.is_empty() {
                    tracing::info!("No recent NewsAPI articles for {}", ticker);
                } else {
                    tracing::info!("Fetched {} NewsAPI articles for {}", articles.len(), ticker);
                }
                sample_from_articles(self.id(), &articles, &self.lexicon)
            }
            Err(e) => {
                tracing::warn!("NewsAPI fetch failed for {}: {}", ticker, e);
                SentimentSample::empty(self.id())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    title: Option<String>,
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_decodes_with_missing_fields() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                { "title": "AAPL beats earnings", "description": "strong quarter" },
                { "title": null, "description": "profit growth" }
            ]
        }"#;
        let body: EverythingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.articles.len(), 2);
        assert_eq!(body.articles[0].title.as_deref(), Some("AAPL beats earnings"));
        assert!(body.articles[1].title.is_none());
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_empty_sample() {
        let client = NewsApiClient::new(
            "test-key".to_string(),
            Arc::new(SentimentLexicon::new()),
        )
        .with_base_url("http://127.0.0.1:1".to_string());

        let sample = client.fetch("AAPL").await;
        assert_eq!(sample, SentimentSample::empty(NewsSourceId::NewsApi));
    }
}
