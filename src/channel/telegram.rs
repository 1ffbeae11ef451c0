//! Telegram delivery.
//!
//! Every rendered unit becomes one `sendMessage` call. HTML units are sent
//! with `parse_mode = HTML`; if Telegram rejects one, its shortened
//! fallback is sent instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::channel::{Channel, DeliveryReport};
use crate::config::TelegramConfig;
use crate::render::{RenderedUnit, TextFormat, GREETING};
use crate::{DigestError, Result};

/// Sends a single chat message.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `text` to `chat_id` using the given markup.
    async fn send_message(&self, chat_id: &str, text: &str, format: TextFormat) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client.
pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    /// Create a client from the Telegram configuration.
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DigestError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.api_url, &config.token))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(client: Client, api_url: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(&self, chat_id: &str, text: &str, format: TextFormat) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: match format {
                TextFormat::Html => Some("HTML"),
                TextFormat::Plain => None,
            },
        };

        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            // Do not echo the URL: it contains the bot token.
            .map_err(|e| DigestError::Delivery(format!("Telegram request failed: {}", e.without_url())))?;

        let status = resp.status();
        let body: Option<ApiResponse> = resp.json().await.ok();

        match body {
            Some(body) if status.is_success() && body.ok => Ok(()),
            Some(body) => Err(DigestError::Delivery(format!(
                "Telegram API error ({}): {}",
                status,
                body.description.unwrap_or_default()
            ))),
            None => Err(DigestError::Delivery(format!(
                "Telegram API error ({}): unreadable response",
                status
            ))),
        }
    }
}

/// Channel sending each unit as a Telegram message.
pub struct TelegramChannel<S> {
    sender: S,
    chat_id: String,
}

impl<S: MessageSender> TelegramChannel<S> {
    pub fn new(sender: S, chat_id: impl Into<String>) -> Self {
        Self {
            sender,
            chat_id: chat_id.into(),
        }
    }

    async fn deliver_unit(&self, category: &str, unit: &RenderedUnit) -> DeliveryOutcome {
        let err = match self
            .sender
            .send_message(&self.chat_id, &unit.text, unit.format)
            .await
        {
            Ok(()) => return DeliveryOutcome::Delivered,
            Err(e) => e,
        };

        let Some(fallback) = unit.fallback.as_deref() else {
            error!(category, "Failed to send message: {}", err);
            return DeliveryOutcome::Failed;
        };

        warn!(category, "Sending shortened message after error: {}", err);
        match self
            .sender
            .send_message(&self.chat_id, fallback, unit.format)
            .await
        {
            Ok(()) => DeliveryOutcome::Degraded,
            Err(e) => {
                error!(category, "Failed to send shortened message: {}", e);
                DeliveryOutcome::Failed
            }
        }
    }
}

enum DeliveryOutcome {
    Delivered,
    Degraded,
    Failed,
}

#[async_trait]
impl<S: MessageSender> Channel for TelegramChannel<S> {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn begin(&mut self) -> Result<()> {
        self.sender
            .send_message(&self.chat_id, GREETING, TextFormat::Plain)
            .await
    }

    async fn deliver(&mut self, category: &str, units: &[RenderedUnit]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for unit in units {
            match self.deliver_unit(category, unit).await {
                DeliveryOutcome::Delivered => report.delivered += 1,
                DeliveryOutcome::Degraded => report.degraded += 1,
                DeliveryOutcome::Failed => report.failed += 1,
            }
        }
        debug!(category, ?report, "Telegram delivery finished");
        report
    }
}
