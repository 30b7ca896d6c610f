use crate::{sample_from_articles, RawArticle};
use analysis_core::{NewsSource, NewsSourceId, SentimentSample};
use async_trait::async_trait;
use reqwest::Client;
use sentiment_analysis::SentimentLexicon;
use std::sync::Arc;

const BASE_FEED_URL: &str = "https://news.google.com/rss/search";
const MAX_ITEMS: usize = 20;

/// Google News RSS source. Keyless; the feed URL is templated per
/// ticker. The pack carries no XML crate, so item titles are extracted
/// with a minimal `<item><title>` scan that handles CDATA and the five
/// predefined XML entities.
pub struct GoogleNewsRssClient {
    client: Client,
    base_url: String,
    lexicon: Arc<SentimentLexicon>,
}

impl GoogleNewsRssClient {
    pub fn new(lexicon: Arc<SentimentLexicon>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: BASE_FEED_URL.to_string(),
            lexicon,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn try_fetch(&self, ticker: &str) -> Result<Vec<RawArticle>, String> {
        let query = format!("{} stock", ticker);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query.as_str()), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let xml = response.text().await.map_err(|e| e.to_string())?;

        Ok(extract_item_titles(&xml)
            .into_iter()
            .take(MAX_ITEMS)
            .map(|title| RawArticle {
                title: Some(title),
                description: None,
            })
            .collect())
    }
}

#[async_trait]
impl NewsSource for GoogleNewsRssClient {
    fn id(&self) -> NewsSourceId {
        NewsSourceId::GoogleNewsRss
    }

    async fn fetch(&self, ticker: &str) -> SentimentSample {
        match self.try_fetch(ticker).await {
            Ok(articles) => {
                tracing::info!("Fetched {} RSS items for {}", articles.len(), ticker);
                sample_from_articles(self.id(), &articles, &self.lexicon)
            }
            Err(e) => {
                tracing::warn!("RSS fetch failed for {}: {}", ticker, e);
                SentimentSample::empty(self.id())
            }
        }
    }
}

/// Pull the `<title>` of every `<item>` out of an RSS document. The
/// channel-level title is outside any `<item>` and is not collected.
fn extract_item_titles(xml: &str) -> Vec<String> {
    let mut titles = Vec::new();
    let mut rest = xml;

    while let Some(item_start) = rest.find("<item>") {
        let after_item = &rest[item_start + "<item>".len()..];
        let item_end = match after_item.find("</item>") {
            Some(end) => end,
            None => break,
        };
        let item = &after_item[..item_end];

        if let Some(title) = first_tag_text(item, "title") {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                titles.push(unescape_entities(trimmed));
            }
        }

        rest = &after_item[item_end + "</item>".len()..];
    }

    titles
}

fn first_tag_text(fragment: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = fragment.find(&open)? + open.len();
    let end = fragment[start..].find(&close)? + start;
    let mut text = &fragment[start..end];

    if let Some(cdata) = text.strip_prefix("<![CDATA[") {
        text = cdata.strip_suffix("]]>").unwrap_or(cdata);
    }

    Some(text.to_string())
}

fn unescape_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}
