//! One run over all configured categories.
//!
//! Categories are processed one after the other: fetch, match, assemble,
//! render, deliver. A category whose feed cannot be fetched is logged and
//! skipped; the run continues with the next one.

use tracing::{error, info, warn};

use crate::channel::{Channel, DeliveryReport};
use crate::config::{Config, Criteria};
use crate::digest::Digest;
use crate::feed::FeedSource;
use crate::render::Renderer;
use crate::Result;

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Categories whose digest was delivered.
    pub categories: usize,
    /// Categories whose feed could not be fetched.
    pub failed_categories: Vec<String>,
    /// Delivery counts over all categories.
    pub delivery: DeliveryReport,
}

/// Drives the fetch → match → render → deliver pipeline.
pub struct Runner {
    categories: Vec<(String, Criteria)>,
    source: Box<dyn FeedSource>,
    renderer: Box<dyn Renderer>,
    channel: Box<dyn Channel>,
}

impl Runner {
    /// Create a runner for the categories in `config`.
    pub fn new(
        config: &Config,
        source: Box<dyn FeedSource>,
        renderer: Box<dyn Renderer>,
        channel: Box<dyn Channel>,
    ) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|c| (c.name.clone(), config.criteria_for(c)))
            .collect();

        Self {
            categories,
            source,
            renderer,
            channel,
        }
    }

    /// Fetch one category and build its digest.
    pub async fn digest(&self, category: &str, criteria: &Criteria) -> Result<Digest> {
        let entries = self.source.fetch_entries(category).await?;
        let digest = Digest::build(category, &entries, criteria);
        info!(
            category,
            entries = entries.len(),
            author_matches = digest.author_matches.len(),
            keyword_matches = digest.keyword_matches.len(),
            "Category filtered"
        );
        Ok(digest)
    }

    /// Process every category and finish the channel.
    ///
    /// Only a failure in the channel's final step (sending the email) is
    /// returned as an error.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let channel_name = self.channel.name();
        info!(
            channel = channel_name,
            categories = self.categories.len(),
            "Starting run"
        );

        if let Err(e) = self.channel.begin().await {
            warn!(channel = channel_name, "Failed to open channel: {}", e);
        }

        let mut summary = RunSummary::default();
        for (category, criteria) in &self.categories {
            let digest = match self.digest(category, criteria).await {
                Ok(digest) => digest,
                Err(e) => {
                    error!(category = %category, "Skipping category: {}", e);
                    summary.failed_categories.push(category.clone());
                    continue;
                }
            };

            let units = self.renderer.render(&digest);
            let report = self.channel.deliver(category, &units).await;
            if report.failed > 0 {
                warn!(
                    category = %category,
                    failed = report.failed,
                    "Some messages were not delivered"
                );
            }
            summary.delivery.merge(report);
            summary.categories += 1;
        }

        self.channel.finish().await?;

        info!(
            channel = channel_name,
            categories = summary.categories,
            failed_categories = summary.failed_categories.len(),
            delivered = summary.delivery.delivered,
            degraded = summary.delivery.degraded,
            failed = summary.delivery.failed,
            "Run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ConsoleChannel;
    use crate::config::CategoryConfig;
    use crate::feed::FeedEntry;
    use crate::render::MessageRenderer;
    use crate::DigestError;
    use async_trait::async_trait;

    struct OneFeed;

    #[async_trait]
    impl FeedSource for OneFeed {
        async fn fetch_entries(&self, category: &str) -> Result<Vec<FeedEntry>> {
            if category == "broken" {
                return Err(DigestError::fetch(category, "HTTP error: 500"));
            }
            Ok(vec![FeedEntry::new("A Transformer Model", "L1")
                .with_summary("...")
                .with_authors(["A. Smith"])])
        }
    }

    fn config(names: &[&str]) -> Config {
        Config {
            categories: names
                .iter()
                .map(|n| CategoryConfig::new(*n).with_buzzwords(["transformer"]))
                .collect(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_digest_for_category() {
        let runner = Runner::new(
            &config(&["cs.AI"]),
            Box::new(OneFeed),
            Box::new(MessageRenderer::new()),
            Box::new(ConsoleChannel::new(Vec::new())),
        );
        let criteria = Criteria::new(&["transformer".to_string()], &Vec::new());

        let digest = runner.digest("cs.AI", &criteria).await.unwrap();
        assert_eq!(digest.keyword_matches.len(), 1);
        assert!(digest.author_matches.is_empty());
    }

    #[tokio::test]
    async fn test_run_skips_failed_category() {
        let mut runner = Runner::new(
            &config(&["broken", "cs.AI"]),
            Box::new(OneFeed),
            Box::new(MessageRenderer::new()),
            Box::new(ConsoleChannel::new(Vec::new())),
        );

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.categories, 1);
        assert_eq!(summary.failed_categories, vec!["broken".to_string()]);
        // author fallback, count, one entry
        assert_eq!(summary.delivery.delivered, 3);
    }
}
