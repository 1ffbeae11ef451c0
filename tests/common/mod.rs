//! Test helpers for pipeline tests.
//!
//! Provides an in-memory feed source and recording channel clients.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use arxiv_digest::channel::{MailTransport, MessageSender, OutgoingMail};
use arxiv_digest::config::CategoryConfig;
use arxiv_digest::{Config, DigestError, FeedEntry, FeedSource, Result, TextFormat};

/// Feed source serving fixed entries; unknown categories fail to fetch.
#[derive(Default)]
pub struct StaticFeed {
    feeds: HashMap<String, Vec<FeedEntry>>,
}

impl StaticFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: &str, entries: Vec<FeedEntry>) -> Self {
        self.feeds.insert(category.to_string(), entries);
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch_entries(&self, category: &str) -> Result<Vec<FeedEntry>> {
        self.feeds
            .get(category)
            .cloned()
            .ok_or_else(|| DigestError::fetch(category, "HTTP error: 404 Not Found"))
    }
}

/// A message recorded by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
    pub format: TextFormat,
}

/// Message sender that records every message.
///
/// Messages containing `reject_containing` fail with a delivery error.
#[derive(Clone, Default)]
pub struct RecordingSender {
    pub sent: Arc<Mutex<Vec<SentMessage>>>,
    pub reject_containing: Option<String>,
}

impl RecordingSender {
    pub fn rejecting(pattern: &str) -> Self {
        Self {
            reject_containing: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, chat_id: &str, text: &str, format: TextFormat) -> Result<()> {
        if let Some(pattern) = &self.reject_containing {
            if text.contains(pattern.as_str()) {
                return Err(DigestError::Delivery("Bad Request".to_string()));
            }
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            format,
        });
        Ok(())
    }
}

/// Mail transport that records every mail.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// The two entries used throughout the scenarios.
pub fn sample_entries() -> Vec<FeedEntry> {
    vec![
        FeedEntry::new("A Transformer Model", "L1")
            .with_summary("...")
            .with_authors(["A. Smith"]),
        FeedEntry::new("Unrelated", "L2")
            .with_summary("uses transformer architecture. announce type: replace")
            .with_authors(["B. Lee"]),
    ]
}

/// Config with the given categories, each using `buzzwords` and `authors`.
pub fn config_with(categories: &[&str], buzzwords: &[&str], authors: &[&str]) -> Config {
    let mut config = Config::default();
    config.categories = categories
        .iter()
        .map(|name| {
            CategoryConfig::new(*name)
                .with_buzzwords(buzzwords.iter().copied())
                .with_authors(authors.iter().copied())
        })
        .collect();
    config.telegram.token = "123:abc".to_string();
    config.telegram.chat_id = "42".to_string();
    config.email.from = "bot@example.com".to_string();
    config.email.to = "me@example.com".to_string();
    config
}
