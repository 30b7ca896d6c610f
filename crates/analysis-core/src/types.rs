use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Company fundamentals snapshot. Every field is optional because the
/// upstream quote endpoints omit fields freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: String,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub eps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub sector: Option<String>,
}

/// Everything the market-data provider returns for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub history: Vec<Bar>,
    pub current_price: Option<f64>,
    pub fundamentals: Option<Fundamentals>,
}

/// Identifies a configured news provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsSourceId {
    NewsApi,
    GNews,
    GoogleNewsRss,
}

impl NewsSourceId {
    pub fn name(&self) -> &'static str {
        match self {
            NewsSourceId::NewsApi => "NewsAPI",
            NewsSourceId::GNews => "GNews",
            NewsSourceId::GoogleNewsRss => "Google News RSS",
        }
    }
}

/// One news source's contribution to sentiment aggregation.
///
/// Pairing invariant: a fetch that failed or found nothing yields
/// `score: None` together with empty `titles`. A sample never carries
/// titles without a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    pub source: NewsSourceId,
    pub score: Option<f64>,
    pub titles: Vec<String>,
}

impl SentimentSample {
    /// The "no data" sentinel for a source whose fetch failed or came
    /// back empty.
    pub fn empty(source: NewsSourceId) -> Self {
        Self {
            source,
            score: None,
            titles: Vec::new(),
        }
    }

    pub fn scored(source: NewsSourceId, score: f64, titles: Vec<String>) -> Self {
        Self {
            source,
            score: Some(score),
            titles,
        }
    }
}

/// Combined sentiment across all contributing sources.
///
/// `overall_score` is `None` exactly when no sample carried a score.
/// `titles` are de-duplicated, in first-seen order, untruncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSentiment {
    pub overall_score: Option<f64>,
    pub titles: Vec<String>,
}

impl AggregateSentiment {
    pub fn empty() -> Self {
        Self {
            overall_score: None,
            titles: Vec::new(),
        }
    }
}

/// Named financial event recognized in news text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialEvent {
    Earnings,
    Guidance,
    MergerAcquisition,
    Partnership,
    Restructuring,
    Legal,
    Regulatory,
    ProductLaunch,
    CapitalReturn,
    ManagementChange,
}

impl FinancialEvent {
    pub fn label(&self) -> &'static str {
        match self {
            FinancialEvent::Earnings => "earnings",
            FinancialEvent::Guidance => "guidance",
            FinancialEvent::MergerAcquisition => "merger/acquisition",
            FinancialEvent::Partnership => "partnership",
            FinancialEvent::Restructuring => "restructuring",
            FinancialEvent::Legal => "legal",
            FinancialEvent::Regulatory => "regulatory",
            FinancialEvent::ProductLaunch => "product launch",
            FinancialEvent::CapitalReturn => "dividend/buyback",
            FinancialEvent::ManagementChange => "management change",
        }
    }
}

/// Qualitative price-effect tag for a news event. `Unknown` is the
/// designated sentinel for anything the assessor cannot classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    StronglyNegative,
    Negative,
    Neutral,
    Positive,
    StronglyPositive,
    Unknown,
}

impl ImpactLevel {
    pub const ALL: [ImpactLevel; 6] = [
        ImpactLevel::StronglyNegative,
        ImpactLevel::Negative,
        ImpactLevel::Neutral,
        ImpactLevel::Positive,
        ImpactLevel::StronglyPositive,
        ImpactLevel::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ImpactLevel::StronglyNegative => "strongly negative",
            ImpactLevel::Negative => "negative",
            ImpactLevel::Neutral => "neutral",
            ImpactLevel::Positive => "positive",
            ImpactLevel::StronglyPositive => "strongly positive",
            ImpactLevel::Unknown => "unknown",
        }
    }
}

/// Assessed impact of a set of events on the stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventImpact {
    pub events: Vec<FinancialEvent>,
    pub short_term: ImpactLevel,
    pub long_term: Option<ImpactLevel>,
}

/// Discrete trade recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl TradeSignal {
    pub fn label(&self) -> &'static str {
        match self {
            TradeSignal::StrongBuy => "STRONG BUY",
            TradeSignal::Buy => "BUY",
            TradeSignal::Hold => "HOLD",
            TradeSignal::Sell => "SELL",
            TradeSignal::StrongSell => "STRONG SELL",
        }
    }

    /// Map an additive rule score in [-100, 100] to a signal.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 60 => TradeSignal::StrongBuy,
            s if s >= 20 => TradeSignal::Buy,
            s if s > -20 => TradeSignal::Hold,
            s if s > -60 => TradeSignal::Sell,
            _ => TradeSignal::StrongSell,
        }
    }
}

/// Output of the rule-based recommendation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub signal: TradeSignal,
    /// 0-100
    pub confidence: u8,
    pub reason: String,
}

/// One indicator's last value, `None` when history was too short for
/// its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    pub name: String,
    pub value: Option<f64>,
}

/// Ordered collection of last indicator values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub values: Vec<IndicatorValue>,
}

impl IndicatorSnapshot {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.name == name)
            .and_then(|v| v.value)
    }

    pub fn push(&mut self, name: &str, value: Option<f64>) {
        self.values.push(IndicatorValue {
            name: name.to_string(),
            value,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Event-impact analysis of one news snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAnalysis {
    pub snippet: String,
    /// True when no live headline was available and a canned sample
    /// snippet was analyzed instead.
    pub from_sample_snippet: bool,
    pub sentiment: f64,
    pub impact: EventImpact,
    pub signal: TradeSignal,
    pub alerts: Vec<String>,
}

/// Full per-ticker analysis report assembled by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReport {
    pub ticker: String,
    pub generated_at: DateTime<Utc>,
    pub current_price: Option<f64>,
    /// `None` when the indicator capability is disabled.
    pub indicators: Option<IndicatorSnapshot>,
    pub sentiment: AggregateSentiment,
    /// First 5 de-duplicated headlines, for display.
    pub headline_sample: Vec<String>,
    pub basic: Recommendation,
    pub enhanced: Recommendation,
    pub alerts: Vec<String>,
    pub event_analysis: EventAnalysis,
}
