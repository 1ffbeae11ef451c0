//! Delivery channels.
//!
//! A [`Channel`] receives the rendered units of every category in turn.
//! Chat channels send each unit as it arrives; the email channel buffers
//! them and sends one message when the run finishes.

pub mod console;
pub mod email;
pub mod telegram;

use async_trait::async_trait;

use crate::render::RenderedUnit;
use crate::Result;

pub use console::ConsoleChannel;
pub use email::{EmailChannel, MailTransport, OutgoingMail, SmtpMailer};
pub use telegram::{MessageSender, TelegramChannel, TelegramClient};

/// Delivery channel selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChannelKind {
    /// One Telegram message per unit.
    Telegram,
    /// One HTML email per run.
    Email,
}

/// Outcome counts of delivering units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Units delivered as rendered.
    pub delivered: usize,
    /// Units delivered in their shortened form.
    pub degraded: usize,
    /// Units that could not be delivered.
    pub failed: usize,
}

impl DeliveryReport {
    /// Add another report's counts to this one.
    pub fn merge(&mut self, other: DeliveryReport) {
        self.delivered += other.delivered;
        self.degraded += other.degraded;
        self.failed += other.failed;
    }
}

/// Destination for rendered digests.
#[async_trait]
pub trait Channel: Send {
    /// Channel name for logs.
    fn name(&self) -> &'static str;

    /// Called once before the first category.
    async fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Deliver the units of one category.
    ///
    /// Per-unit failures are logged and counted, never returned.
    async fn deliver(&mut self, category: &str, units: &[RenderedUnit]) -> DeliveryReport;

    /// Called once after the last category.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
