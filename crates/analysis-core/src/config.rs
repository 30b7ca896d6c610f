use serde::{Deserialize, Serialize};

/// Credentials and feature toggles resolved once at startup.
///
/// Clients are constructed explicitly from this config and passed down;
/// nothing in the pipeline reads the environment after construction.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub news_api_key: Option<String>,
    pub gnews_api_key: Option<String>,
    /// Toggles the technical-indicator stage.
    pub indicators_enabled: bool,
    /// Requests per minute against the market-data API.
    pub market_data_rate_limit: usize,
}

impl AnalyzerConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            news_api_key: non_empty("NEWS_API_KEY"),
            gnews_api_key: non_empty("GNEWS_API_KEY"),
            indicators_enabled: std::env::var("INDICATORS_ENABLED")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            market_data_rate_limit: std::env::var("MARKET_DATA_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v| v > 0)
                .unwrap_or(60),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            news_api: self.news_api_key.is_some(),
            gnews: self.gnews_api_key.is_some(),
            rss: true,
            indicators: self.indicators_enabled,
        }
    }
}

/// Which optional stages are available, checked explicitly by every
/// consumer instead of probing at call time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Capabilities {
    pub news_api: bool,
    pub gnews: bool,
    pub rss: bool,
    pub indicators: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_follow_configured_keys() {
        let config = AnalyzerConfig {
            news_api_key: Some("k".to_string()),
            gnews_api_key: None,
            indicators_enabled: true,
            market_data_rate_limit: 60,
        };
        let caps = config.capabilities();
        assert!(caps.news_api);
        assert!(!caps.gnews);
        assert!(caps.rss);
        assert!(caps.indicators);
    }

    #[test]
    fn zero_rate_limit_falls_back_to_default() {
        std::env::set_var("MARKET_DATA_RATE_LIMIT", "0");
        let config = AnalyzerConfig::from_env();
        assert_eq!(config.market_data_rate_limit, 60);
        std::env::remove_var("MARKET_DATA_RATE_LIMIT");
    }
}
