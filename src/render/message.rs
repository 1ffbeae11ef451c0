//! Renderer for chat messages (Telegram HTML parse mode).

use tracing::warn;

use crate::digest::{escape_html, format_entry, Digest, EntryFormat, MatchResult};
use crate::render::{
    keyword_count, no_author_matches, no_keyword_matches, RenderedUnit, Renderer, AUTHOR_INTRO,
};

/// Renders a digest as a sequence of chat messages, one per unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageRenderer;

impl MessageRenderer {
    pub fn new() -> Self {
        Self
    }

    fn push_entries(&self, section: &MatchResult, category: &str, units: &mut Vec<RenderedUnit>) {
        for entry in section {
            match format_entry(entry) {
                EntryFormat::Full {
                    title,
                    author,
                    link,
                    abstract_text,
                } => {
                    let short = short_message(title, author, link);
                    let full = format!(
                        "{short}\n<strong>Abstract:</strong> {}",
                        escape_html(&abstract_text)
                    );
                    units.push(RenderedUnit::html(full).with_fallback(short));
                }
                EntryFormat::Degraded {
                    title,
                    author,
                    link,
                    reason,
                } => {
                    warn!(category, "Sending shortened message: {}", reason);
                    units.push(RenderedUnit::html(short_message(title, author, link)));
                }
                EntryFormat::Failed(reason) => {
                    warn!(category, link = %entry.link, "Skipping entry: {}", reason);
                }
            }
        }
    }
}

fn short_message(title: &str, author: &str, link: &str) -> String {
    format!(
        "<strong>Title:</strong> {}\n<strong>Authors:</strong> {}\n<strong>Link:</strong> {}",
        escape_html(title),
        escape_html(author),
        escape_html(link)
    )
}

impl Renderer for MessageRenderer {
    fn render(&self, digest: &Digest) -> Vec<RenderedUnit> {
        let category = digest.category.as_str();
        let mut units = Vec::new();

        if digest.author_matches.is_empty() {
            units.push(RenderedUnit::plain(no_author_matches(category)));
        } else {
            units.push(RenderedUnit::plain(AUTHOR_INTRO));
            self.push_entries(&digest.author_matches, category, &mut units);
        }

        if digest.keyword_matches.is_empty() {
            units.push(RenderedUnit::plain(no_keyword_matches(category)));
        } else {
            units.push(RenderedUnit::plain(keyword_count(
                digest.keyword_matches.len(),
                category,
            )));
            self.push_entries(&digest.keyword_matches, category, &mut units);
        }

        units
    }
}
