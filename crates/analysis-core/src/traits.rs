use crate::{AnalysisError, MarketData, NewsSourceId, SentimentSample};
use async_trait::async_trait;

/// Trait for market-data providers (price history, current price,
/// fundamentals).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<MarketData, AnalysisError>;
}

/// Trait for news sentiment sources.
///
/// `fetch` is total: transport errors, missing credentials, and empty
/// result sets all normalize to `SentimentSample::empty` at this
/// boundary. Nothing downstream of a news source handles errors.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn id(&self) -> NewsSourceId;

    /// Whether this source applies to the given ticker at all
    /// (e.g. a region-specific provider only covers `.NS` listings).
    fn covers(&self, _ticker: &str) -> bool {
        true
    }

    async fn fetch(&self, ticker: &str) -> SentimentSample;
}
