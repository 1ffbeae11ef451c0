//! Per-entry formatting shared by all renderers.

use crate::error::DigestError;
use crate::feed::FeedEntry;

/// Outcome of preparing one entry for display.
#[derive(Debug)]
pub enum EntryFormat<'a> {
    /// Everything available, abstract already cleaned.
    Full {
        title: &'a str,
        author: &'a str,
        link: &'a str,
        abstract_text: String,
    },
    /// No abstract; title, first author and link only.
    Degraded {
        title: &'a str,
        author: &'a str,
        link: &'a str,
        reason: DigestError,
    },
    /// Nothing sensible to show; the entry is skipped.
    Failed(DigestError),
}

/// Prepare an entry for display.
pub fn format_entry(entry: &FeedEntry) -> EntryFormat<'_> {
    let Some(author) = entry.first_author() else {
        return EntryFormat::Failed(DigestError::MissingField {
            field: "author",
            title: entry.title.clone(),
        });
    };

    match entry.summary.as_deref() {
        Some(summary) => EntryFormat::Full {
            title: &entry.title,
            author,
            link: &entry.link,
            abstract_text: clean_abstract(summary),
        },
        None => EntryFormat::Degraded {
            title: &entry.title,
            author,
            link: &entry.link,
            reason: DigestError::MissingField {
                field: "summary",
                title: entry.title.clone(),
            },
        },
    }
}

/// Collapse line separators to spaces and strip `<p>`/`</p>` tags.
///
/// Idempotent: tag removal repeats until nothing is left to remove.
pub fn clean_abstract(summary: &str) -> String {
    let mut text = summary.replace("\r\n", " ").replace(['\n', '\r'], " ");
    loop {
        let stripped = text.replace("<p>", "").replace("</p>", "");
        if stripped == text {
            return text;
        }
        text = stripped;
    }
}

/// Escape text for inclusion in HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
