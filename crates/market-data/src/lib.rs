use analysis_core::{
    AnalysisError, Bar, Fundamentals, MarketData, MarketDataProvider,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Sliding-window rate limiter: at most `max_requests` per `window`.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            // A zero limit would never admit a request; floor at one.
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            let wait_until = ts.front().unwrap().checked_add(self.window).unwrap();
            let sleep_dur = wait_until.duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for quote API slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Market-data client over the Yahoo chart/quote endpoints: one year of
/// daily bars, the regular-market price, and a fundamentals snapshot.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl YahooFinanceClient {
    pub fn new(rate_limit_per_minute: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("marketlens/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: BASE_URL.to_string(),
            rate_limiter: RateLimiter::new(rate_limit_per_minute, Duration::from_secs(60)),
        }
    }

    /// Point the client at a different host (test servers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn get_chart(&self, ticker: &str) -> Result<ChartResult, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        self.rate_limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .query(&[("range", "1y"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::DataUnavailable(format!(
                "chart HTTP {} for {}",
                response.status(),
                ticker
            )));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        chart
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| {
                AnalysisError::DataUnavailable(format!("no chart data for {}", ticker))
            })
    }

    async fn get_quote(&self, ticker: &str) -> Result<Option<QuoteResult>, AnalysisError> {
        let url = format!("{}/v7/finance/quote", self.base_url);

        self.rate_limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .query(&[("symbols", ticker)])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            // Fundamentals are optional; missing quote access degrades to None
            tracing::warn!("Quote HTTP {} for {}", response.status(), ticker);
            return Ok(None);
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(quote
            .quote_response
            .and_then(|qr| qr.result.into_iter().next()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch(&self, ticker: &str) -> Result<MarketData, AnalysisError> {
        let chart = self.get_chart(ticker).await?;
        let history = bars_from_chart(&chart);

        if history.is_empty() {
            return Err(AnalysisError::DataUnavailable(format!(
                "empty price history for {}",
                ticker
            )));
        }

        // Fundamentals and live quote are best-effort
        let quote = match self.get_quote(ticker).await {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!("Quote fetch failed for {}: {}", ticker, e);
                None
            }
        };

        let current_price = quote
            .as_ref()
            .and_then(|q| q.regular_market_price)
            .or(chart.meta.regular_market_price)
            .or_else(|| history.last().map(|b| b.close));

        let fundamentals = quote.map(|q| fundamentals_from_quote(ticker, q));

        tracing::info!(
            "Fetched {} bars for {} (price: {:?})",
            history.len(),
            ticker,
            current_price
        );

        Ok(MarketData {
            history,
            current_price,
            fundamentals,
        })
    }
}

/// Assemble bars from the chart response's parallel arrays, dropping
/// rows where any OHLC field is null.
fn bars_from_chart(chart: &ChartResult) -> Vec<Bar> {
    let timestamps = match &chart.timestamp {
        Some(ts) => ts,
        None => return Vec::new(),
    };
    let quote = match chart.indicators.quote.first() {
        Some(q) => q,
        None => return Vec::new(),
    };

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let open = *quote.open.get(i)?;
            let high = *quote.high.get(i)?;
            let low = *quote.low.get(i)?;
            let close = *quote.close.get(i)?;
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);

            Some(Bar {
                timestamp: DateTime::<Utc>::from_timestamp(ts, 0)?,
                open: open?,
                high: high?,
                low: low?,
                close: close?,
                volume,
            })
        })
        .collect()
}

fn fundamentals_from_quote(ticker: &str, quote: QuoteResult) -> Fundamentals {
    Fundamentals {
        symbol: ticker.to_string(),
        market_cap: quote.market_cap,
        trailing_pe: quote.trailing_pe,
        forward_pe: quote.forward_pe,
        eps: quote.eps_trailing_twelve_months,
        dividend_yield: quote.trailing_annual_dividend_yield,
        fifty_two_week_high: quote.fifty_two_week_high,
        fifty_two_week_low: quote.fifty_two_week_low,
        sector: None,
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: Option<QuoteEnvelope>,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(default)]
    result: Vec<QuoteResult>,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<f64>,
    #[serde(rename = "epsTrailingTwelveMonths")]
    eps_trailing_twelve_months: Option<f64>,
    #[serde(rename = "trailingAnnualDividendYield")]
    trailing_annual_dividend_yield: Option<f64>,
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<f64>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "regularMarketPrice": 189.7 },
                "timestamp": [1714521600, 1714608000, 1714694400],
                "indicators": {
                    "quote": [{
                        "open":   [187.1, 188.0, null],
                        "high":   [189.0, 190.2, 191.0],
                        "low":    [186.5, 187.2, 188.4],
                        "close":  [188.4, 189.9, 190.1],
                        "volume": [51000000, null, 49000000]
                    }]
                }
            }]
        }
    }"#;

    #[test]
    fn chart_rows_with_null_ohlc_are_dropped() {
        let response: ChartResponse = serde_json::from_str(CHART_JSON).unwrap();
        let result = response.chart.result.unwrap().remove(0);
        let bars = bars_from_chart(&result);

        // Third row has a null open and is skipped
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 188.4);
        // Null volume defaults to zero rather than dropping the bar
        assert_eq!(bars[1].volume, 0.0);
        assert_eq!(result.meta.regular_market_price, Some(189.7));
    }

    #[test]
    fn chart_without_timestamps_yields_no_bars() {
        let json = r#"{"chart":{"result":[{
            "meta": {},
            "indicators": { "quote": [] }
        }]}}"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let result = response.chart.result.unwrap().remove(0);
        assert!(bars_from_chart(&result).is_empty());
    }

    #[test]
    fn quote_decodes_camel_case_fields() {
        let json = r#"{"quoteResponse":{"result":[{
            "regularMarketPrice": 190.5,
            "marketCap": 2900000000000.0,
            "trailingPE": 29.4,
            "epsTrailingTwelveMonths": 6.43,
            "fiftyTwoWeekHigh": 199.6,
            "fiftyTwoWeekLow": 164.1
        }]}}"#;
        let response: QuoteResponse = serde_json::from_str(json).unwrap();
        let quote = response
            .quote_response
            .unwrap()
            .result
            .into_iter()
            .next()
            .unwrap();

        let fundamentals = fundamentals_from_quote("AAPL", quote);
        assert_eq!(fundamentals.symbol, "AAPL");
        assert_eq!(fundamentals.trailing_pe, Some(29.4));
        assert_eq!(fundamentals.eps, Some(6.43));
        assert_eq!(fundamentals.dividend_yield, None);
    }

    #[tokio::test]
    async fn zero_rate_limit_is_floored_to_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(60));
        tokio::time::timeout(Duration::from_millis(100), limiter.acquire())
            .await
            .expect("first acquisition should be admitted");

        // The client constructor takes the same path
        let client = YahooFinanceClient::new(0);
        assert_eq!(client.rate_limiter.max_requests, 1);
    }

    #[tokio::test]
    async fn rate_limiter_allows_burst_within_window() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        // Three immediate acquisitions must not block
        tokio::time::timeout(Duration::from_millis(100), async {
            limiter.acquire().await;
            limiter.acquire().await;
            limiter.acquire().await;
        })
        .await
        .expect("burst within limit should not wait");
    }
}
