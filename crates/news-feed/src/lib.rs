//! News provider clients. Every client is constructed explicitly with
//! its credentials and a shared sentiment lexicon; there is no global
//! client state.
//!
//! All fetchers uphold one contract: transport errors, missing API
//! keys, decode failures, and empty result sets normalize to
//! [`SentimentSample::empty`] at this boundary. Nothing downstream
//! handles news errors.

use analysis_core::{NewsSourceId, SentimentSample};
use sentiment_analysis::SentimentLexicon;

pub mod gnews;
pub mod newsapi;
pub mod rss;

pub use gnews::GNewsClient;
pub use newsapi::NewsApiClient;
pub use rss::GoogleNewsRssClient;

/// A fetched article before scoring.
#[derive(Debug, Clone)]
pub(crate) struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Score a batch of articles into one sample: per-article score over
/// title + description, sample score = mean, titles collected in fetch
/// order from the scored articles only. An empty or unscorable batch
/// degrades to the empty sample.
pub(crate) fn sample_from_articles(
    source: NewsSourceId,
    articles: &[RawArticle],
    lexicon: &SentimentLexicon,
) -> SentimentSample {
    let scorable: Vec<&RawArticle> = articles
        .iter()
        .filter(|a| a.title.is_some() || a.description.is_some())
        .collect();

    if scorable.is_empty() {
        return SentimentSample::empty(source);
    }

    let mut scores = Vec::with_capacity(scorable.len());
    let mut titles = Vec::with_capacity(scorable.len());
    for article in &scorable {
        let text = format!(
            "{} {}",
            article.title.as_deref().unwrap_or(""),
            article.description.as_deref().unwrap_or("")
        );
        scores.push(lexicon.score_text(&text));
        titles.push(
            article
                .title
                .clone()
                .unwrap_or_else(|| "No Title".to_string()),
        );
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    SentimentSample::scored(source, mean, titles)
}
