//! Digest assembly for arxiv-digest.
//!
//! A [`Digest`] is the channel-agnostic result of filtering one category's
//! feed: the entries by favourite authors and the entries hitting a buzzword.

pub mod format;
pub mod matcher;

use crate::config::Criteria;
use crate::feed::FeedEntry;

pub use format::{clean_abstract, escape_html, format_entry, EntryFormat};
pub use matcher::{match_by_author, match_by_keyword, MatchResult, REPLACE_MARKER};

/// Filtered view of one category for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    /// Category the entries came from.
    pub category: String,
    /// Entries written by a favourite author.
    pub author_matches: MatchResult,
    /// Entries mentioning a buzzword.
    pub keyword_matches: MatchResult,
}

impl Digest {
    /// Run both matchers over `entries` and assemble the result.
    pub fn build(category: impl Into<String>, entries: &[FeedEntry], criteria: &Criteria) -> Self {
        let author_matches = match_by_author(entries, &criteria.authors);
        let keyword_matches = match_by_keyword(entries, &criteria.buzzwords);
        assemble(category, keyword_matches, author_matches)
    }

    /// Whether neither section found anything.
    pub fn is_empty(&self) -> bool {
        self.author_matches.is_empty() && self.keyword_matches.is_empty()
    }
}

/// Combine matcher outputs into a digest.
pub fn assemble(
    category: impl Into<String>,
    keyword_matches: MatchResult,
    author_matches: MatchResult,
) -> Digest {
    Digest {
        category: category.into(),
        author_matches,
        keyword_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<FeedEntry> {
        vec![
            FeedEntry::new("A Transformer Model", "L1")
                .with_summary("...")
                .with_authors(["A. Smith"]),
            FeedEntry::new("Unrelated", "L2")
                .with_summary("uses transformer architecture. announce type: replace")
                .with_authors(["B. Lee"]),
        ]
    }

    #[test]
    fn test_assemble_keeps_fields() {
        let keyword: MatchResult = entries().into_iter().take(1).collect();
        let author = MatchResult::new();

        let digest = assemble("cs.AI", keyword.clone(), author);
        assert_eq!(digest.category, "cs.AI");
        assert_eq!(digest.keyword_matches, keyword);
        assert!(digest.author_matches.is_empty());
        assert!(!digest.is_empty());
    }

    #[test]
    fn test_build_runs_both_matchers() {
        let criteria = Criteria::new(
            &["transformer".to_string()],
            &["smith".to_string()],
        );
        let digest = Digest::build("cs.AI", &entries(), &criteria);

        assert_eq!(digest.keyword_matches.entries(), &entries()[..1]);
        assert_eq!(digest.author_matches.entries(), &entries()[..1]);
    }

    #[test]
    fn test_build_nothing_matches() {
        let criteria = Criteria::new(&["graphene".to_string()], &["nobody".to_string()]);
        let digest = Digest::build("cs.AI", &entries(), &criteria);

        assert!(digest.is_empty());
    }
}
