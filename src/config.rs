//! Configuration module for arxiv-digest.

use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::channel::ChannelKind;
use crate::{DigestError, Result};

/// Environment variable overriding the Telegram bot token.
pub const ENV_TELEGRAM_TOKEN: &str = "ARXIV_DIGEST_TELEGRAM_TOKEN";

/// Environment variable overriding the Telegram chat id.
pub const ENV_TELEGRAM_CHAT_ID: &str = "ARXIV_DIGEST_TELEGRAM_CHAT_ID";

/// Environment variable overriding the SMTP password.
pub const ENV_SMTP_PASSWORD: &str = "ARXIV_DIGEST_SMTP_PASSWORD";

/// Criteria shared by every category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Buzzwords applied to every category.
    #[serde(default)]
    pub buzzwords: Vec<String>,
    /// Favourite authors applied to every category.
    #[serde(default)]
    pub authors: Vec<String>,
}

/// A single feed category (e.g. `quant-ph`, `cs.AI`).
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Category identifier; also the last path segment of the feed URL.
    pub name: String,
    /// Category-specific buzzwords.
    #[serde(default)]
    pub buzzwords: Vec<String>,
    /// Category-specific favourite authors.
    #[serde(default)]
    pub authors: Vec<String>,
}

impl CategoryConfig {
    /// Create a category with no criteria of its own.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buzzwords: Vec::new(),
            authors: Vec::new(),
        }
    }

    /// Add buzzwords.
    pub fn with_buzzwords<I, S>(mut self, buzzwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buzzwords.extend(buzzwords.into_iter().map(Into::into));
        self
    }

    /// Add favourite authors.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors.extend(authors.into_iter().map(Into::into));
        self
    }
}

/// Match criteria for one category, merged with the general defaults.
///
/// Both sets hold trimmed, lowercased, non-empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Buzzwords searched for in titles and summaries.
    pub buzzwords: BTreeSet<String>,
    /// Author fragments searched for in the author field.
    pub authors: BTreeSet<String>,
}

impl Criteria {
    /// Build criteria from raw buzzword and author lists.
    pub fn new<'a, B, A>(buzzwords: B, authors: A) -> Self
    where
        B: IntoIterator<Item = &'a String>,
        A: IntoIterator<Item = &'a String>,
    {
        Self {
            buzzwords: normalize(buzzwords),
            authors: normalize(authors),
        }
    }
}

fn normalize<'a, I>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Feed transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Base URL; the category name is appended to it.
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_feed_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_feed_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_feed_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_feed_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_feed_max_size")]
    pub max_feed_size_bytes: u64,
}

fn default_feed_base_url() -> String {
    "https://rss.arxiv.org/rss/".to_string()
}

fn default_feed_connect_timeout() -> u64 {
    10
}

fn default_feed_read_timeout() -> u64 {
    20
}

fn default_feed_total_timeout() -> u64 {
    30
}

fn default_feed_max_redirects() -> usize {
    5
}

fn default_feed_max_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            connect_timeout_secs: default_feed_connect_timeout(),
            read_timeout_secs: default_feed_read_timeout(),
            total_timeout_secs: default_feed_total_timeout(),
            max_redirects: default_feed_max_redirects(),
            max_feed_size_bytes: default_feed_max_size(),
        }
    }
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL.
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    /// Bot token.
    #[serde(default)]
    pub token: String,
    /// Chat (user or group) receiving the digest.
    #[serde(default)]
    pub chat_id: String,
    /// Request timeout in seconds.
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u64,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_timeout() -> u64 {
    30
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            token: String::new(),
            chat_id: String::new(),
            timeout_secs: default_telegram_timeout(),
        }
    }
}

/// SMTP configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username; defaults to the sender address when empty.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// Recipient address.
    #[serde(default)]
    pub to: String,
    /// Subject prefix; the run date is appended.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject_prefix() -> String {
    "arXiv update".to_string()
}

impl EmailConfig {
    /// Username used for SMTP authentication.
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.from
        } else {
            &self.username
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
            subject_prefix: default_subject_prefix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Criteria merged into every category.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Categories in processing order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Feed transport configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Telegram configuration.
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DigestError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DigestError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ARXIV_DIGEST_TELEGRAM_TOKEN`: Telegram bot token
    /// - `ARXIV_DIGEST_TELEGRAM_CHAT_ID`: Telegram chat id
    /// - `ARXIV_DIGEST_SMTP_PASSWORD`: SMTP password
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(token) = non_empty_env(ENV_TELEGRAM_TOKEN) {
            self.telegram.token = token;
        }
        if let Some(chat_id) = non_empty_env(ENV_TELEGRAM_CHAT_ID) {
            self.telegram.chat_id = chat_id;
        }
        if let Some(password) = non_empty_env(ENV_SMTP_PASSWORD) {
            self.email.password = password;
        }
    }

    /// Category names in file order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Merged criteria for a category, or `None` if it is not configured.
    pub fn criteria(&self, category: &str) -> Option<Criteria> {
        let section = self.categories.iter().find(|c| c.name == category)?;
        Some(self.criteria_for(section))
    }

    /// Merged criteria for a category section.
    pub fn criteria_for(&self, section: &CategoryConfig) -> Criteria {
        Criteria::new(
            section.buzzwords.iter().chain(&self.general.buzzwords),
            section.authors.iter().chain(&self.general.authors),
        )
    }

    /// Validate the configuration for the selected delivery channel.
    ///
    /// Returns an error if:
    /// - No category is configured, or a category name is empty or repeated
    /// - The feed base URL is not http(s)
    /// - Telegram is selected without a token or chat id
    /// - Email is selected without host, sender or recipient
    pub fn validate(&self, channel: ChannelKind) -> Result<()> {
        self.validate_categories()?;

        match channel {
            ChannelKind::Telegram => {
                if self.telegram.token.is_empty() || self.telegram.chat_id.is_empty() {
                    return Err(DigestError::Validation(format!(
                        "Telegram delivery needs a token and a chat_id. \
                         Set them in [telegram] or via {ENV_TELEGRAM_TOKEN} and {ENV_TELEGRAM_CHAT_ID}."
                    )));
                }
            }
            ChannelKind::Email => {
                if self.email.smtp_host.is_empty()
                    || self.email.from.is_empty()
                    || self.email.to.is_empty()
                {
                    return Err(DigestError::Validation(
                        "email delivery needs smtp_host, from and to in [email]".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Validate categories and the feed base URL only.
    ///
    /// This is all a dry run needs.
    pub fn validate_categories(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(DigestError::Validation(
                "no categories configured. Add at least one [[categories]] table.".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(DigestError::Validation(
                    "category name must not be empty".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(DigestError::Validation(format!(
                    "category {name} is configured more than once"
                )));
            }
        }

        crate::feed::validate_url(&self.feed.base_url)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[general]
buzzwords = ["Quantum", ""]
authors = ["Smith"]

[[categories]]
name = "quant-ph"
buzzwords = ["open systems", "quantum "]
authors = ["lee", "SMITH"]

[[categories]]
name = "cs.AI"
buzzwords = ["transformer"]

[feed]
base_url = "https://export.arxiv.org/rss/"
total_timeout_secs = 45

[telegram]
token = "123:abc"
chat_id = "42"

[email]
from = "bot@example.com"
to = "me@example.com"
subject_prefix = "QDS ArXiv update"

[logging]
level = "debug"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.categories.is_empty());
        assert!(config.general.buzzwords.is_empty());

        assert_eq!(config.feed.base_url, "https://rss.arxiv.org/rss/");
        assert_eq!(config.feed.connect_timeout_secs, 10);
        assert_eq!(config.feed.read_timeout_secs, 20);
        assert_eq!(config.feed.total_timeout_secs, 30);
        assert_eq!(config.feed.max_redirects, 5);
        assert_eq!(config.feed.max_feed_size_bytes, 5 * 1024 * 1024);

        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert!(config.telegram.token.is_empty());
        assert_eq!(config.telegram.timeout_secs, 30);

        assert_eq!(config.email.smtp_host, "smtp.gmail.com");
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.email.subject_prefix, "arXiv update");

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(SAMPLE).unwrap();

        let names: Vec<&str> = config.category_names().collect();
        assert_eq!(names, vec!["quant-ph", "cs.AI"]);

        assert_eq!(config.feed.base_url, "https://export.arxiv.org/rss/");
        assert_eq!(config.feed.total_timeout_secs, 45);
        assert_eq!(config.feed.connect_timeout_secs, 10);

        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.telegram.chat_id, "42");

        assert_eq!(config.email.from, "bot@example.com");
        assert_eq!(config.email.login(), "bot@example.com");
        assert_eq!(config.email.subject_prefix, "QDS ArXiv update");

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_criteria_merges_general_and_normalizes() {
        let config = Config::parse(SAMPLE).unwrap();
        let criteria = config.criteria("quant-ph").unwrap();

        let buzzwords: Vec<&str> = criteria.buzzwords.iter().map(String::as_str).collect();
        assert_eq!(buzzwords, vec!["open systems", "quantum"]);

        let authors: Vec<&str> = criteria.authors.iter().map(String::as_str).collect();
        assert_eq!(authors, vec!["lee", "smith"]);
    }

    #[test]
    fn test_criteria_category_without_own_authors() {
        let config = Config::parse(SAMPLE).unwrap();
        let criteria = config.criteria("cs.AI").unwrap();

        assert!(criteria.buzzwords.contains("transformer"));
        assert!(criteria.buzzwords.contains("quantum"));
        assert_eq!(criteria.authors.len(), 1);
        assert!(criteria.authors.contains("smith"));
    }

    #[test]
    fn test_criteria_unknown_category() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.criteria("math.CO").is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.categories.is_empty());
        assert_eq!(config.feed.base_url, "https://rss.arxiv.org/rss/");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(DigestError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.categories.len(), 2);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(result.is_err());
        assert!(matches!(result, Err(DigestError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides_smtp_password() {
        let original = std::env::var(ENV_SMTP_PASSWORD).ok();

        std::env::set_var(ENV_SMTP_PASSWORD, "env-password");

        let mut config = Config::default();
        config.email.password = "file-password".to_string();
        config.apply_env_overrides();

        assert_eq!(config.email.password, "env-password");

        if let Some(val) = original {
            std::env::set_var(ENV_SMTP_PASSWORD, val);
        } else {
            std::env::remove_var(ENV_SMTP_PASSWORD);
        }
    }

    #[test]
    fn test_apply_env_overrides_empty_value() {
        let original = std::env::var(ENV_TELEGRAM_CHAT_ID).ok();

        std::env::set_var(ENV_TELEGRAM_CHAT_ID, "");

        let mut config = Config::default();
        config.telegram.chat_id = "original".to_string();
        config.apply_env_overrides();

        // Should not override with empty string
        assert_eq!(config.telegram.chat_id, "original");

        if let Some(val) = original {
            std::env::set_var(ENV_TELEGRAM_CHAT_ID, val);
        } else {
            std::env::remove_var(ENV_TELEGRAM_CHAT_ID);
        }
    }

    #[test]
    fn test_validate_ok() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.validate(ChannelKind::Telegram).is_ok());
        assert!(config.validate(ChannelKind::Email).is_ok());
    }

    #[test]
    fn test_validate_no_categories() {
        let config = Config::default();
        let result = config.validate(ChannelKind::Email);
        assert!(matches!(result, Err(DigestError::Validation(_))));
    }

    #[test]
    fn test_validate_duplicate_category() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.categories.push(CategoryConfig::new("cs.AI"));

        let err = config.validate(ChannelKind::Email).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_telegram_missing_token() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.telegram.token.clear();

        let err = config.validate(ChannelKind::Telegram).unwrap_err();
        assert!(err.to_string().contains("token"));
        // Email does not care about Telegram settings
        assert!(config.validate(ChannelKind::Email).is_ok());
    }

    #[test]
    fn test_validate_email_missing_recipient() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.email.to.clear();

        assert!(config.validate(ChannelKind::Email).is_err());
        assert!(config.validate(ChannelKind::Telegram).is_ok());
    }

    #[test]
    fn test_validate_categories_ignores_credentials() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.telegram.token.clear();
        config.email.to.clear();

        assert!(config.validate_categories().is_ok());
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.feed.base_url = "ftp://export.arxiv.org/rss/".to_string();

        assert!(config.validate(ChannelKind::Email).is_err());
    }
}
