//! Feed entry types.

/// Separator used when joining author names into the author field.
pub const AUTHOR_SEPARATOR: &str = ", ";

/// A single article from a category feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Article title.
    pub title: String,
    /// Abstract / summary, raw as delivered by the feed.
    pub summary: Option<String>,
    /// Credited authors in feed order. Only the first one is displayed.
    pub authors: Vec<String>,
    /// All credited authors as one string; used for author matching.
    pub author: Option<String>,
    /// Link to the article.
    pub link: String,
}

impl FeedEntry {
    /// Create an entry with only a title and link.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            authors: Vec::new(),
            author: None,
            link: link.into(),
        }
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the author list. The author field becomes the joined names.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self.author = if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(AUTHOR_SEPARATOR))
        };
        self
    }

    /// Override the author field independently of the author list.
    pub fn with_author_field(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    /// First credited author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Identity used for deduplication.
    pub fn key(&self) -> EntryKey {
        EntryKey {
            title: self.title.clone(),
            link: self.link.clone(),
        }
    }
}

/// Dedup identity of a feed entry: `(title, link)`.
///
/// Summary and author text are left out so that cosmetic differences
/// between two copies of the same article do not defeat deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub title: String,
    pub link: String,
}
