//! Renderer for the email digest.
//!
//! Each unit is an HTML fragment; the email channel concatenates all
//! fragments of a run into one document.

use tracing::warn;

use crate::digest::{escape_html, format_entry, Digest, EntryFormat, MatchResult};
use crate::render::{keyword_count, no_author_matches, no_keyword_matches, RenderedUnit, Renderer};

/// Renders a digest as HTML fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn push_entries(&self, section: &MatchResult, category: &str, units: &mut Vec<RenderedUnit>) {
        for entry in section {
            let fragment = match format_entry(entry) {
                EntryFormat::Full {
                    title,
                    author,
                    link,
                    abstract_text,
                } => format!(
                    "{}<b>Abstract:</b> {}<br><br>",
                    entry_head(title, author, link),
                    escape_html(&abstract_text)
                ),
                EntryFormat::Degraded {
                    title,
                    author,
                    link,
                    reason,
                } => {
                    warn!(category, "Rendering entry without abstract: {}", reason);
                    format!("{}<br>", entry_head(title, author, link))
                }
                EntryFormat::Failed(reason) => {
                    warn!(category, link = %entry.link, "Skipping entry: {}", reason);
                    continue;
                }
            };
            units.push(RenderedUnit::html(fragment));
        }
    }
}

fn entry_head(title: &str, author: &str, link: &str) -> String {
    format!(
        "<h3>{}</h3><b>Authors:</b> {}<br><b>Link:</b> {}<br>",
        escape_html(title),
        escape_html(author),
        escape_html(link)
    )
}

impl Renderer for HtmlRenderer {
    fn render(&self, digest: &Digest) -> Vec<RenderedUnit> {
        let category = digest.category.as_str();
        let escaped = escape_html(category);
        let mut units = vec![RenderedUnit::html(format!(
            "<h1>{escaped}</h1><h2>Favourite authors</h2>"
        ))];

        if digest.author_matches.is_empty() {
            units.push(RenderedUnit::html(format!(
                "{}<br>",
                escape_html(&no_author_matches(category))
            )));
        } else {
            self.push_entries(&digest.author_matches, category, &mut units);
        }

        units.push(RenderedUnit::html("<h2>Keywords</h2>"));

        if digest.keyword_matches.is_empty() {
            units.push(RenderedUnit::html(format!(
                "{}<br>",
                escape_html(&no_keyword_matches(category))
            )));
        } else {
            units.push(RenderedUnit::html(format!(
                "{}<br><br>",
                escape_html(&keyword_count(digest.keyword_matches.len(), category))
            )));
            self.push_entries(&digest.keyword_matches, category, &mut units);
        }

        units
    }
}
