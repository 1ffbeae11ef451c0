//! Email delivery.
//!
//! Fragments of every category are collected during the run and sent as a
//! single multipart/alternative message when the run finishes.

use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::channel::{Channel, DeliveryReport};
use crate::config::EmailConfig;
use crate::render::{RenderedUnit, GREETING};
use crate::{DigestError, Result};

/// A fully assembled email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
}

/// Sends a finished email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()>;
}

/// SMTP transport with STARTTLS and password authentication.
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a mailer from the email configuration.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.login().to_string(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| DigestError::Config(format!("failed to create SMTP transport: {}", e)))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|e| DigestError::Delivery(format!("invalid from address: {}", e)))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| DigestError::Delivery(format!("invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(mail.plain_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(mail.html_body.clone()),
                    ),
            )
            .map_err(|e| DigestError::Delivery(format!("failed to build email: {}", e)))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| DigestError::Delivery(format!("failed to send email via SMTP: {}", e)))?;

        Ok(())
    }
}

/// Subject line for a run on `date`.
pub fn subject_for(prefix: &str, date: NaiveDate) -> String {
    format!("{} {}", prefix, date.format("%d-%m-%Y"))
}

/// Channel collecting HTML fragments into one email per run.
pub struct EmailChannel<T> {
    transport: T,
    from: String,
    to: String,
    subject: String,
    fragments: String,
    units: usize,
}

impl<T: MailTransport> EmailChannel<T> {
    pub fn new(transport: T, config: &EmailConfig, date: NaiveDate) -> Self {
        Self {
            transport,
            from: config.from.clone(),
            to: config.to.clone(),
            subject: subject_for(&config.subject_prefix, date),
            fragments: String::new(),
            units: 0,
        }
    }

    /// The email that `finish` would send now.
    pub fn compose(&self) -> OutgoingMail {
        OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            plain_body: format!("{GREETING}\n\n"),
            html_body: format!("<html><body>{}</body></html>", self.fragments),
        }
    }
}

#[async_trait]
impl<T: MailTransport> Channel for EmailChannel<T> {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&mut self, category: &str, units: &[RenderedUnit]) -> DeliveryReport {
        for unit in units {
            self.fragments.push_str(&unit.text);
        }
        self.units += units.len();
        debug!(category, fragments = units.len(), "Queued email fragments");

        DeliveryReport {
            delivered: units.len(),
            ..DeliveryReport::default()
        }
    }

    async fn finish(&mut self) -> Result<()> {
        let mail = self.compose();
        self.transport.send_mail(&mail).await?;
        info!(to = %mail.to, subject = %mail.subject, fragments = self.units, "Email sent");
        Ok(())
    }
}
