//! Category feed fetcher.
//!
//! Downloads a category's RSS/Atom feed over HTTP and maps it into
//! [`FeedEntry`] values, with timeouts and a size limit.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::{DigestError, Result};
use crate::feed::types::{FeedEntry, AUTHOR_SEPARATOR};
use crate::feed::FeedSource;

/// User agent string for feed fetching.
const USER_AGENT: &str = concat!("arxiv-digest/", env!("CARGO_PKG_VERSION"));

/// Title used for entries that have none.
const UNTITLED: &str = "Untitled";

/// Feed source backed by HTTP.
pub struct FeedFetcher {
    client: Client,
    base_url: String,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// Create a new fetcher from the feed configuration.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        validate_url(&config.base_url)?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DigestError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    /// URL of the feed for a category.
    pub fn feed_url(&self, category: &str) -> String {
        feed_url(&self.base_url, category)
    }
}

#[async_trait]
impl FeedSource for FeedFetcher {
    async fn fetch_entries(&self, category: &str) -> Result<Vec<FeedEntry>> {
        let url = self.feed_url(category);
        debug!(category, url = %url, "Fetching feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DigestError::fetch(category, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DigestError::fetch(
                category,
                format!("HTTP error: {}", response.status()),
            ));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(DigestError::fetch(
                    category,
                    format!(
                        "feed too large: {} bytes (max {} bytes)",
                        content_length, self.max_feed_size
                    ),
                ));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DigestError::fetch(category, format!("failed to read response: {}", e)))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(DigestError::fetch(
                category,
                format!(
                    "feed too large: {} bytes (max {} bytes)",
                    bytes.len(),
                    self.max_feed_size
                ),
            ));
        }

        let entries = parse_entries(&bytes)
            .map_err(|e| DigestError::fetch(category, format!("failed to parse feed: {}", e)))?;
        debug!(category, count = entries.len(), "Feed parsed");
        Ok(entries)
    }
}

/// Join a base URL and a category name.
pub fn feed_url(base_url: &str, category: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, category)
    } else {
        format!("{}/{}", base_url, category)
    }
}

/// Check that a feed base URL is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| DigestError::Validation(format!("invalid feed URL {}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(DigestError::Validation(format!(
                "unsupported feed URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(DigestError::Validation(format!(
            "feed URL has no host: {}",
            url
        )));
    }

    Ok(())
}

/// Parse feed bytes into entries, preserving feed order.
pub fn parse_entries(bytes: &[u8]) -> std::result::Result<Vec<FeedEntry>, parser::ParseFeedError> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_else(|| entry.id.clone());
            let summary = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body));
            let authors: Vec<String> = entry
                .authors
                .into_iter()
                .map(|p| p.name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            let author = if authors.is_empty() {
                None
            } else {
                Some(authors.join(AUTHOR_SEPARATOR))
            };

            FeedEntry {
                title,
                summary,
                authors,
                author,
                link,
            }
        })
        .collect();

    Ok(entries)
}
