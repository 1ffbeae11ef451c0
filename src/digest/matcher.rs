//! Entry filtering by buzzword and by favourite author.
//!
//! All matching is case-insensitive substring search. Results keep feed
//! order and hold each entry at most once.

use std::collections::HashSet;

use tracing::warn;

use crate::error::DigestError;
use crate::feed::{EntryKey, FeedEntry};

/// Summary marker of a resubmission notice (compared lowercased).
pub const REPLACE_MARKER: &str = "announce type: replace";

/// Ordered, deduplicated list of matching entries.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    entries: Vec<FeedEntry>,
    seen: HashSet<EntryKey>,
}

impl MatchResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless one with the same key is already present.
    ///
    /// Returns `true` if the entry was added.
    pub fn push(&mut self, entry: FeedEntry) -> bool {
        if !self.seen.insert(entry.key()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, FeedEntry> {
        self.entries.iter()
    }

    /// Consume into the entry list.
    pub fn into_entries(self) -> Vec<FeedEntry> {
        self.entries
    }
}

impl PartialEq for MatchResult {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for MatchResult {}

impl FromIterator<FeedEntry> for MatchResult {
    fn from_iter<I: IntoIterator<Item = FeedEntry>>(iter: I) -> Self {
        let mut result = MatchResult::new();
        for entry in iter {
            result.push(entry);
        }
        result
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a FeedEntry;
    type IntoIter = std::slice::Iter<'a, FeedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lowercase the needles and drop empty ones; an empty needle would match everything.
fn needles<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Entries whose title or summary contains one of the buzzwords.
///
/// A title hit always counts. A summary hit counts only if the summary
/// does not carry the replace marker.
pub fn match_by_keyword<I>(entries: &[FeedEntry], buzzwords: I) -> MatchResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let buzzwords = needles(buzzwords);
    let mut result = MatchResult::new();
    if buzzwords.is_empty() {
        return result;
    }

    for entry in entries {
        let title = entry.title.to_lowercase();
        let summary = entry.summary.as_deref().map(str::to_lowercase);
        let summary_usable = summary
            .as_deref()
            .filter(|s| !s.contains(REPLACE_MARKER));

        let hit = buzzwords.iter().any(|b| {
            title.contains(b.as_str()) || summary_usable.is_some_and(|s| s.contains(b.as_str()))
        });
        if hit {
            result.push(entry.clone());
        }
    }
    result
}

/// Entries whose author field contains one of the author fragments.
///
/// Entries without an author field are logged and skipped.
pub fn match_by_author<I>(entries: &[FeedEntry], authors: I) -> MatchResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let authors = needles(authors);
    let mut result = MatchResult::new();
    if authors.is_empty() {
        return result;
    }

    for entry in entries {
        let Some(field) = entry.author.as_deref() else {
            let err = DigestError::MissingField {
                field: "author",
                title: entry.title.clone(),
            };
            warn!(link = %entry.link, "Skipping entry in author match: {}", err);
            continue;
        };
        let field = field.to_lowercase();
        if authors.iter().any(|a| field.contains(a.as_str())) {
            result.push(entry.clone());
        }
    }
    result
}
