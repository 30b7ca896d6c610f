use crate::{sample_from_articles, RawArticle};
use analysis_core::{NewsSource, NewsSourceId, SentimentSample};
use async_trait::async_trait;
use reqwest::Client;
use sentiment_analysis::SentimentLexicon;
use serde::Deserialize;
use std::sync::Arc;

const BASE_URL: &str = "https://gnews.io";

/// Region-specific news API. The orchestrator only routes `.NS`
/// (Indian exchange) tickers here, mirroring the upstream coverage.
pub struct GNewsClient {
    api_key: String,
    client: Client,
    base_url: String,
    lexicon: Arc<SentimentLexicon>,
}

impl GNewsClient {
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
        // Query on the company part of the symbol; ".NS" is an exchange
        // suffix, not a search term.
        let query = ticker.trim_end_matches(".NS");
        let url = format!("{}/api/v4/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("country", "in"),
                ("max", "10"),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let body: SearchResponse = response.json().await.map_err(|e| e.to_string())?;

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
impl NewsSource for GNewsClient {
    fn id(&self) -> NewsSourceId {
        NewsSourceId::GNews
    }

    fn covers(&self, ticker: &str) -> bool {
        ticker.ends_with(".NS")
    }

    async fn fetch(&self, ticker: &str) -> SentimentSample {
        match self.try_fetch(ticker).await {
            Ok(articles) => {
                tracing::info!("Fetched {} GNews articles for {}", articles.len(), ticker);
                sample_from_articles(self.id(), &articles, &self.lexicon)
            }
            Err(e) => {
                tracing::warn!("GNews fetch failed for {}: {}", ticker, e);
                SentimentSample::empty(self.id())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_covers_nse_tickers() {
        let client = GNewsClient::new("k".to_string(), Arc::new(SentimentLexicon::new()));
        assert!(client.covers("RELIANCE.NS"));
        assert!(!client.covers("AAPL"));
        assert!(!client.covers("GOOG"));
    }

    #[test]
    fn search_response_decodes() {
        let json = r#"{
            "totalArticles": 1,
            "articles": [
                { "title": "Reliance posts record profit", "description": "robust growth" }
            ]
        }"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.articles.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_empty_sample() {
        let client = GNewsClient::new("k".to_string(), Arc::new(SentimentLexicon::new()))
            .with_base_url("http://127.0.0.1:1".to_string());
        let sample = client.fetch("RELIANCE.NS").await;
        assert_eq!(sample, SentimentSample::empty(NewsSourceId::GNews));
    }
}
