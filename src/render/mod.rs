//! Rendering of digests into channel-specific units.
//!
//! Renderers are pure: they turn a [`Digest`] into an ordered list of
//! [`RenderedUnit`]s and never filter or touch the network.

pub mod html;
pub mod message;

use crate::digest::Digest;

pub use html::HtmlRenderer;
pub use message::MessageRenderer;

/// Greeting sent once per run, before the first category.
pub const GREETING: &str = "Good morning you!";

/// Introduction preceding favourite-author entries.
pub const AUTHOR_INTRO: &str = "I found a paper by one of your favourite authors!";

/// Text when no favourite author published in `category`.
pub fn no_author_matches(category: &str) -> String {
    format!("No new articles from your favourite authors in section {category} today.")
}

/// Text when no buzzword matched in `category`.
pub fn no_keyword_matches(category: &str) -> String {
    format!(
        "I scraped the arXiv RSS but found nothing of interest for you in the section {category}. Sorry."
    )
}

/// Announcement preceding `count` buzzword entries.
pub fn keyword_count(count: usize, category: &str) -> String {
    format!(
        "You are going to be happy. I found {count} article(s) of potential interest in the section {category}."
    )
}

/// Markup of a unit's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// One message (chat) or one HTML fragment (email).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    /// Text to deliver.
    pub text: String,
    /// Markup of `text` and `fallback`.
    pub format: TextFormat,
    /// Shorter alternative to try when delivering `text` fails.
    pub fallback: Option<String>,
}

impl RenderedUnit {
    /// Plain-text unit.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            fallback: None,
        }
    }

    /// HTML unit.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            fallback: None,
        }
    }

    /// Attach a degraded alternative.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Turns a digest into deliverable units for one channel.
pub trait Renderer: Send + Sync {
    /// Render `digest` into units, in delivery order.
    fn render(&self, digest: &Digest) -> Vec<RenderedUnit>;
}
