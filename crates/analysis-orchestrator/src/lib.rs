//! Per-ticker analysis pipeline: market data and news fetches fan out
//! concurrently, sentiment is aggregated, and the recommendation and
//! event-signal stages run on whatever survived. Each run is
//! independent; nothing is cached or shared across requests.

use analysis_core::{
    AggregateSentiment, AnalysisError, AnalyzerConfig, Capabilities, EventAnalysis,
    IndicatorSnapshot, MarketDataProvider, NewsSource, StockReport,
};
use chrono::Utc;
use futures_util::future::join_all;
use market_data::YahooFinanceClient;
use news_feed::{GNewsClient, GoogleNewsRssClient, NewsApiClient};
use recommendation::RecommendationEngine;
use sentiment_analysis::{aggregate, assess_impact, derive_signal, extract_events, SentimentLexicon};
use std::sync::Arc;
use technical_analysis::IndicatorEngine;

/// Social media sentiment is not wired to a live source; the pipeline
/// feeds the enhanced analysis a mildly positive placeholder.
const SOCIAL_SENTIMENT_PLACEHOLDER: f64 = 0.1;

/// How many de-duplicated headlines the report surfaces for display.
const HEADLINE_SAMPLE_SIZE: usize = 5;

pub struct StockAnalyzer {
    market_data: Arc<dyn MarketDataProvider>,
    news_sources: Vec<Arc<dyn NewsSource>>,
    indicator_engine: IndicatorEngine,
    recommendation_engine: RecommendationEngine,
    lexicon: Arc<SentimentLexicon>,
    capabilities: Capabilities,
}

impl StockAnalyzer {
    /// Wire up live clients from resolved configuration. Sources whose
    /// credentials are absent are simply not constructed; the
    /// capability flags record what is active.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let lexicon = Arc::new(SentimentLexicon::new());
        let capabilities = config.capabilities();

        let mut news_sources: Vec<Arc<dyn NewsSource>> = Vec::new();
        if let Some(key) = &config.news_api_key {
            news_sources.push(Arc::new(NewsApiClient::new(key.clone(), lexicon.clone())));
        }
        if let Some(key) = &config.gnews_api_key {
            news_sources.push(Arc::new(GNewsClient::new(key.clone(), lexicon.clone())));
        }
        news_sources.push(Arc::new(GoogleNewsRssClient::new(lexicon.clone())));

        Self {
            market_data: Arc::new(YahooFinanceClient::new(config.market_data_rate_limit)),
            news_sources,
            indicator_engine: IndicatorEngine::new(),
            recommendation_engine: RecommendationEngine::new(),
            lexicon,
            capabilities,
        }
    }

    /// Explicit wiring, used by tests and by callers that bring their
    /// own providers.
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        news_sources: Vec<Arc<dyn NewsSource>>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            market_data,
            news_sources,
            indicator_engine: IndicatorEngine::new(),
            recommendation_engine: RecommendationEngine::new(),
            lexicon: Arc::new(SentimentLexicon::new()),
            capabilities,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Run the full pipeline for one ticker. Market data is the only
    /// fatal dependency; every other stage degrades by omission.
    pub async fn analyze(&self, ticker: &str) -> Result<StockReport, AnalysisError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::InvalidTicker(
                "ticker symbol is empty".to_string(),
            ));
        }

        tracing::info!("Starting analysis for {}", ticker);

        let applicable: Vec<&Arc<dyn NewsSource>> = self
            .news_sources
            .iter()
            .filter(|s| s.covers(&ticker))
            .collect();

        let news_futures = applicable.iter().map(|source| source.fetch(&ticker));
        let (market_result, samples) =
            tokio::join!(self.market_data.fetch(&ticker), join_all(news_futures));

        let market = market_result?;

        for (source, sample) in applicable.iter().zip(&samples) {
            match sample.score {
                Some(score) => tracing::info!(
                    "{}: {} scored {:.2} over {} title(s)",
                    ticker,
                    source.id().name(),
                    score,
                    sample.titles.len()
                ),
                None => tracing::info!("{}: {} returned no data", ticker, source.id().name()),
            }
        }

        let indicators = if self.capabilities.indicators {
            Some(self.indicator_engine.snapshot(&market.history))
        } else {
            None
        };

        let sentiment = aggregate(&samples);
        let headline_sample: Vec<String> = sentiment
            .titles
            .iter()
            .take(HEADLINE_SAMPLE_SIZE)
            .cloned()
            .collect();

        let basic = self
            .recommendation_engine
            .analyze_stock(&market.history, sentiment.overall_score);

        let empty_snapshot = IndicatorSnapshot::default();
        let (enhanced, alerts) = self.recommendation_engine.enhanced_analysis(
            &ticker,
            &market.history,
            indicators.as_ref().unwrap_or(&empty_snapshot),
            market.fundamentals.as_ref(),
            sentiment.overall_score,
            SOCIAL_SENTIMENT_PLACEHOLDER,
            &sentiment.titles,
        );

        let event_analysis = self.analyze_events(&ticker, &sentiment);

        tracing::info!(
            "Analysis for {} complete: {} / {} (confidence {}%)",
            ticker,
            basic.signal.label(),
            enhanced.signal.label(),
            enhanced.confidence
        );

        Ok(StockReport {
            ticker,
            generated_at: Utc::now(),
            current_price: market.current_price,
            indicators,
            sentiment,
            headline_sample,
            basic,
            enhanced,
            alerts,
            event_analysis,
        })
    }

    /// Event-impact analysis over the freshest headline; when no live
    /// news came back, a canned snippet keeps the stage exercised, and
    /// the report says so.
    fn analyze_events(&self, ticker: &str, sentiment: &AggregateSentiment) -> EventAnalysis {
        let (snippet, from_sample_snippet) = match sentiment.titles.first() {
            Some(title) => (title.clone(), false),
            None => (sample_snippet(ticker), true),
        };

        let events = extract_events(&snippet);
        let event_sentiment = self.lexicon.score_text(&snippet);
        let (impact, alerts) = assess_impact(&events, event_sentiment);
        let signal = derive_signal(&impact);

        tracing::debug!(
            "Event analysis for {}: {} event(s), short-term {}",
            ticker,
            impact.events.len(),
            impact.short_term.label()
        );

        EventAnalysis {
            snippet,
            from_sample_snippet,
            sentiment: event_sentiment,
            impact,
            signal,
            alerts,
        }
    }
}

fn sample_snippet(ticker: &str) -> String {
    format!(
        "{} reported mixed quarterly results. While revenue saw a slight increase, \
         net profit declined due to rising operational costs. The company announced \
         a new strategic partnership aimed at expanding into new markets and is \
         also exploring cost-cutting measures.",
        ticker
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Bar, MarketData, NewsSourceId, SentimentSample};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeMarketData {
        fail: bool,
    }

    #[async_trait]
    impl MarketDataProvider for FakeMarketData {
        async fn fetch(&self, ticker: &str) -> Result<MarketData, AnalysisError> {
            if self.fail {
                return Err(AnalysisError::DataUnavailable(format!(
                    "no data for {}",
                    ticker
                )));
            }
            let history: Vec<Bar> = (0..60)
                .map(|i| Bar {
                    timestamp: Utc::now() - chrono::Duration::days(60 - i),
                    open: 100.0 + i as f64,
                    high: 101.0 + i as f64,
                    low: 99.0 + i as f64,
                    close: 100.0 + i as f64,
                    volume: 1_000_000.0,
                })
                .collect();
            let current_price = history.last().map(|b| b.close);
            Ok(MarketData {
                history,
                current_price,
                fundamentals: None,
            })
        }
    }

    struct FakeNewsSource {
        id: NewsSourceId,
        sample: SentimentSample,
        nse_only: bool,
        fetched: AtomicBool,
    }

    impl FakeNewsSource {
        fn returning(id: NewsSourceId, sample: SentimentSample) -> Self {
            Self {
                id,
                sample,
                nse_only: false,
                fetched: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl NewsSource for FakeNewsSource {
        fn id(&self) -> NewsSourceId {
            self.id
        }

        fn covers(&self, ticker: &str) -> bool {
            !self.nse_only || ticker.ends_with(".NS")
        }

        async fn fetch(&self, _ticker: &str) -> SentimentSample {
            self.fetched.store(true, Ordering::SeqCst);
            self.sample.clone()
        }
    }

    fn all_capabilities() -> Capabilities {
        Capabilities {
            news_api: true,
            gnews: true,
            rss: true,
            indicators: true,
        }
    }

    #[tokio::test]
    async fn end_to_end_with_one_live_and_one_dead_source() {
        let live = Arc::new(FakeNewsSource::returning(
            NewsSourceId::NewsApi,
            SentimentSample::scored(
                NewsSourceId::NewsApi,
                0.6,
                vec!["AAPL beats earnings".to_string()],
            ),
        ));
        // Simulates a source with a missing API key
        let dead = Arc::new(FakeNewsSource::returning(
            NewsSourceId::GoogleNewsRss,
            SentimentSample::empty(NewsSourceId::GoogleNewsRss),
        ));

        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: false }),
            vec![live.clone(), dead.clone()],
            all_capabilities(),
        );

        let report = analyzer.analyze("aapl").await.unwrap();

        assert_eq!(report.ticker, "AAPL");
        assert_eq!(report.sentiment.overall_score, Some(0.6));
        assert_eq!(report.sentiment.titles, vec!["AAPL beats earnings"]);
        assert_eq!(report.headline_sample, vec!["AAPL beats earnings"]);
        assert!(report.current_price.is_some());

        // The recommendation stage saw the aggregated sentiment
        assert!(report.basic.reason.contains("news sentiment 0.60"));

        // Event analysis ran on the live headline, not the canned snippet
        assert!(!report.event_analysis.from_sample_snippet);
        assert_eq!(report.event_analysis.snippet, "AAPL beats earnings");

        assert!(live.fetched.load(Ordering::SeqCst));
        assert!(dead.fetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn market_data_failure_is_fatal() {
        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: true }),
            vec![],
            all_capabilities(),
        );
        let err = analyzer.analyze("AAPL").await.unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_ticker_is_rejected() {
        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: false }),
            vec![],
            all_capabilities(),
        );
        let err = analyzer.analyze("   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidTicker(_)));
    }

    #[tokio::test]
    async fn region_specific_source_is_skipped_for_us_tickers() {
        let nse_source = Arc::new(FakeNewsSource {
            id: NewsSourceId::GNews,
            sample: SentimentSample::scored(NewsSourceId::GNews, 0.9, vec!["x".to_string()]),
            nse_only: true,
            fetched: AtomicBool::new(false),
        });

        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: false }),
            vec![nse_source.clone()],
            all_capabilities(),
        );

        let report = analyzer.analyze("AAPL").await.unwrap();
        assert!(!nse_source.fetched.load(Ordering::SeqCst));
        assert_eq!(report.sentiment.overall_score, None);
        // No live headline: the event stage fell back to the sample snippet
        assert!(report.event_analysis.from_sample_snippet);
        assert!(report
            .event_analysis
            .impact
            .events
            .contains(&analysis_core::FinancialEvent::Partnership));
    }

    #[tokio::test]
    async fn indicators_respect_capability_flag() {
        let caps = Capabilities {
            indicators: false,
            ..all_capabilities()
        };
        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: false }),
            vec![],
            caps,
        );
        let report = analyzer.analyze("AAPL").await.unwrap();
        assert!(report.indicators.is_none());

        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: false }),
            vec![],
            all_capabilities(),
        );
        let report = analyzer.analyze("AAPL").await.unwrap();
        let snap = report.indicators.unwrap();
        assert!(snap.get("SMA_20").is_some());
        assert_eq!(snap.get("SMA_200"), None);
    }

    #[tokio::test]
    async fn all_sources_dead_still_produces_a_report() {
        let dead_a = Arc::new(FakeNewsSource::returning(
            NewsSourceId::NewsApi,
            SentimentSample::empty(NewsSourceId::NewsApi),
        ));
        let dead_b = Arc::new(FakeNewsSource::returning(
            NewsSourceId::GoogleNewsRss,
            SentimentSample::empty(NewsSourceId::GoogleNewsRss),
        ));

        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarketData { fail: false }),
            vec![dead_a, dead_b],
            all_capabilities(),
        );

        let report = analyzer.analyze("GOOG").await.unwrap();
        assert_eq!(report.sentiment.overall_score, None);
        assert!(report.sentiment.titles.is_empty());
        assert!(report
            .alerts
            .iter()
            .any(|a| a.contains("No news sentiment")));
        // Recommendation still produced
        assert_ne!(report.enhanced.reason, "");
    }
}
