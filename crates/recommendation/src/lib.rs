//! Rule-based recommendation engine. Scores accumulate additively in
//! [-100, 100] and map to a signal through `TradeSignal::from_score`;
//! the weights live in the constants below so the cutoff table stays
//! in one place.

use analysis_core::{Bar, Fundamentals, IndicatorSnapshot, Recommendation, TradeSignal};
use technical_analysis::last_sma;

const TREND_WEIGHT: i32 = 30;
const RSI_WEIGHT: i32 = 15;
const MACD_WEIGHT: i32 = 15;
const SENTIMENT_WEIGHT: f64 = 25.0;
const VALUATION_WEIGHT: i32 = 15;

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

/// Weight of news vs social sentiment when both are combined.
const NEWS_SENTIMENT_SHARE: f64 = 0.7;

pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Basic analysis: price-vs-moving-average trend plus a news
    /// sentiment tilt. Total; short history degrades to a low-confidence
    /// HOLD rather than an error.
    pub fn analyze_stock(&self, bars: &[Bar], news_sentiment: Option<f64>) -> Recommendation {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let price = match closes.last() {
            Some(&p) => p,
            None => {
                return Recommendation {
                    signal: TradeSignal::Hold,
                    confidence: 20,
                    reason: "No price history available".to_string(),
                }
            }
        };

        let mut score: i32 = 0;
        let mut parts: Vec<String> = Vec::new();

        match (last_sma(&closes, 20), last_sma(&closes, 50)) {
            (Some(sma20), Some(sma50)) => {
                if price > sma20 && sma20 > sma50 {
                    score += 40;
                    parts.push("price above rising moving averages (uptrend)".to_string());
                } else if price < sma20 && sma20 < sma50 {
                    score -= 40;
                    parts.push("price below falling moving averages (downtrend)".to_string());
                } else if price > sma20 {
                    score += 20;
                    parts.push("price above 20-day average".to_string());
                } else {
                    score -= 20;
                    parts.push("price below 20-day average".to_string());
                }
            }
            (Some(sma20), None) => {
                score += if price > sma20 { 20 } else { -20 };
                parts.push("trend read from 20-day average only (short history)".to_string());
            }
            _ => {
                parts.push("not enough history for trend analysis".to_string());
            }
        }

        match news_sentiment {
            Some(s) => {
                score += (s * SENTIMENT_WEIGHT).round() as i32;
                parts.push(format!("news sentiment {:.2}", s));
            }
            None => parts.push("no news sentiment available".to_string()),
        }

        let confidence = basic_confidence(score, news_sentiment.is_some(), closes.len());

        Recommendation {
            signal: TradeSignal::from_score(score),
            confidence,
            reason: parts.join("; "),
        }
    }

    /// Enhanced analysis: trend, RSI/MACD posture, valuation, and
    /// combined news + social sentiment, with alerts for conditions
    /// worth flagging. Every input is optional; missing pieces reduce
    /// confidence instead of failing.
    #[allow(clippy::too_many_arguments)]
    pub fn enhanced_analysis(
        &self,
        ticker: &str,
        bars: &[Bar],
        indicators: &IndicatorSnapshot,
        fundamentals: Option<&Fundamentals>,
        news_sentiment: Option<f64>,
        social_sentiment: f64,
        news_titles: &[String],
    ) -> (Recommendation, Vec<String>) {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let price = closes.last().copied();

        let mut score: i32 = 0;
        let mut parts: Vec<String> = Vec::new();
        let mut alerts: Vec<String> = Vec::new();
        let mut components: u8 = 0;

        // Trend vs moving averages
        if let (Some(price), Some(sma20)) = (price, indicators.get("SMA_20")) {
            components += 1;
            let above = price > sma20;
            match indicators.get("SMA_50") {
                Some(sma50) if above && sma20 > sma50 => {
                    score += TREND_WEIGHT;
                    parts.push("established uptrend".to_string());
                }
                Some(sma50) if !above && sma20 < sma50 => {
                    score -= TREND_WEIGHT;
                    parts.push("established downtrend".to_string());
                }
                _ => {
                    score += if above { TREND_WEIGHT / 2 } else { -TREND_WEIGHT / 2 };
                    parts.push(if above {
                        "price above 20-day average".to_string()
                    } else {
                        "price below 20-day average".to_string()
                    });
                }
            }
        }

        // RSI posture: extremes are contrarian signals
        if let Some(rsi) = indicators.get("RSI_14") {
            components += 1;
            if rsi >= RSI_OVERBOUGHT {
                score -= RSI_WEIGHT;
                parts.push(format!("RSI {:.0} overbought", rsi));
                alerts.push(format!("{} looks overbought (RSI {:.0})", ticker, rsi));
            } else if rsi <= RSI_OVERSOLD {
                score += RSI_WEIGHT;
                parts.push(format!("RSI {:.0} oversold", rsi));
                alerts.push(format!("{} looks oversold (RSI {:.0})", ticker, rsi));
            } else {
                parts.push(format!("RSI {:.0} neutral", rsi));
            }
        }

        // MACD posture
        if let Some(hist) = indicators.get("MACD_hist") {
            components += 1;
            if hist > 0.0 {
                score += MACD_WEIGHT;
                parts.push("MACD momentum positive".to_string());
            } else if hist < 0.0 {
                score -= MACD_WEIGHT;
                parts.push("MACD momentum negative".to_string());
            }
        }

        // Combined sentiment: news carries most of the weight, the
        // social figure is a coarse placeholder input
        match news_sentiment {
            Some(news) => {
                components += 1;
                let combined =
                    news * NEWS_SENTIMENT_SHARE + social_sentiment * (1.0 - NEWS_SENTIMENT_SHARE);
                score += (combined * SENTIMENT_WEIGHT).round() as i32;
                parts.push(format!(
                    "combined sentiment {:.2} from {} headline(s)",
                    combined,
                    news_titles.len()
                ));
                if news <= -0.5 {
                    alerts.push("Strongly negative news coverage".to_string());
                }
            }
            None => {
                alerts.push("No news sentiment available; recommendation is price-only".to_string());
            }
        }

        // Valuation and 52-week range
        if let Some(f) = fundamentals {
            if let Some(pe) = f.trailing_pe {
                components += 1;
                if pe > 40.0 {
                    score -= VALUATION_WEIGHT;
                    parts.push(format!("rich valuation (PE {:.1})", pe));
                    alerts.push(format!("{} trades at an elevated PE of {:.1}", ticker, pe));
                } else if pe > 0.0 && pe < 15.0 {
                    score += VALUATION_WEIGHT - 5;
                    parts.push(format!("modest valuation (PE {:.1})", pe));
                }
            }
            if let (Some(price), Some(high)) = (price, f.fifty_two_week_high) {
                if price >= high * 0.95 {
                    alerts.push(format!("{} is within 5% of its 52-week high", ticker));
                }
            }
            if let (Some(price), Some(low)) = (price, f.fifty_two_week_low) {
                if price <= low * 1.05 {
                    alerts.push(format!("{} is within 5% of its 52-week low", ticker));
                }
            }
        }

        let score = score.clamp(-100, 100);
        let confidence = enhanced_confidence(components);

        tracing::debug!(
            "Enhanced analysis for {}: score {} from {} components",
            ticker,
            score,
            components
        );

        let reason = if parts.is_empty() {
            "Insufficient data for a substantive view".to_string()
        } else {
            parts.join("; ")
        };

        (
            Recommendation {
                signal: TradeSignal::from_score(score),
                confidence,
                reason,
            },
            alerts,
        )
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn basic_confidence(score: i32, has_sentiment: bool, history_len: usize) -> u8 {
    let mut confidence: i32 = 50 + score.abs() / 2;
    if !has_sentiment {
        confidence -= 10;
    }
    if history_len < 50 {
        confidence -= 15;
    }
    confidence.clamp(20, 90) as u8
}

fn enhanced_confidence(components: u8) -> u8 {
    (40 + u32::from(components) * 10).min(95) as u8
}
