//! arxiv-digest - daily arXiv digests by buzzword and favourite author
//!
//! Fetches the RSS feed of each configured arXiv category, keeps the
//! entries that mention a buzzword or are written by a favourite author,
//! and delivers the result through Telegram or email.

pub mod channel;
pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod logging;
pub mod render;
pub mod runner;

pub use channel::{Channel, ChannelKind, DeliveryReport};
pub use config::{Config, Criteria};
pub use digest::{assemble, match_by_author, match_by_keyword, Digest, MatchResult};
pub use error::{DigestError, Result};
pub use feed::{FeedEntry, FeedFetcher, FeedSource};
pub use render::{HtmlRenderer, MessageRenderer, RenderedUnit, Renderer, TextFormat};
pub use runner::{RunSummary, Runner};
