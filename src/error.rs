//! Error types for arxiv-digest.

use thiserror::Error;

/// Common error type for arxiv-digest.
#[derive(Error, Debug)]
pub enum DigestError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (unreadable or malformed file).
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Feed for a category could not be fetched or parsed.
    ///
    /// Aborts processing of that category only.
    #[error("failed to fetch feed for {category}: {reason}")]
    Fetch { category: String, reason: String },

    /// A feed entry lacks a field needed for matching or rendering.
    #[error("entry \"{title}\" has no {field}")]
    MissingField { field: &'static str, title: String },

    /// A channel client failed to deliver a message.
    #[error("delivery error: {0}")]
    Delivery(String),
}

impl DigestError {
    /// Build a fetch error for the given category.
    pub fn fetch(category: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DigestError::Fetch {
            category: category.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for arxiv-digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
