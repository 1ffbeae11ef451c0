//! Feed source for arxiv-digest.
//!
//! This module turns a category name into the ordered list of entries
//! its feed currently carries.

pub mod fetcher;
pub mod types;

use async_trait::async_trait;

use crate::Result;

pub use fetcher::{feed_url, parse_entries, validate_url, FeedFetcher};
pub use types::{EntryKey, FeedEntry, AUTHOR_SEPARATOR};

/// Supplies the entries of a category feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the current entries of `category`, in feed order.
    ///
    /// Transport and parse failures are returned as `DigestError::Fetch`.
    async fn fetch_entries(&self, category: &str) -> Result<Vec<FeedEntry>>;
}
