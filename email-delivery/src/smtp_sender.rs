use crate::{DeliveryError, Result, SmtpSettings};
use async_trait::async_trait;
use interfaces::defs::{Digest, DigestDelivery};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::info;

/// Upper bound for one relay session (connect, STARTTLS, login, send).
pub const SMTP_TIMEOUT_SECONDS: u64 = 30;

/// Sends digests as HTML mail through an authenticated STARTTLS relay.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(SmtpSettings::from_env()?))
    }

    pub fn settings(&self) -> &SmtpSettings {
        &self.settings
    }

    /// Build the MIME message for a digest without sending it.
    pub fn build_message(&self, subject: &str, html_body: &str) -> Result<Message> {
        let from = parse_mailbox(&self.settings.from)?;

        let recipients = self.settings.recipients();
        if recipients.is_empty() {
            return Err(DeliveryError::NoRecipients(self.settings.to.clone()));
        }

        let mut builder = Message::builder().from(from).subject(subject);
        for recipient in &recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let message = builder
            .header(header::ContentType::TEXT_HTML)
            .body(html_body.to_string())?;
        Ok(message)
    }

    /// Open a relay session and send one message. A single attempt, no retries.
    pub async fn send(&self, subject: &str, html_body: &str) -> Result<()> {
        let message = self.build_message(subject, html_body)?;

        // Never log the credential
        info!(
            "SMTP delivery host={} port={} user={}",
            self.settings.host, self.settings.port, self.settings.username
        );

        let credentials = Credentials::new(
            self.settings.username.clone(),
            self.settings.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(SMTP_TIMEOUT_SECONDS)))
            .build();

        mailer.send(message).await?;

        info!("Delivered digest '{}' to {} recipient(s)", subject, self.settings.recipients().len());
        Ok(())
    }
}

#[async_trait]
impl DigestDelivery for SmtpMailer {
    fn channel_name(&self) -> String {
        format!("smtp://{}:{}", self.settings.host, self.settings.port)
    }

    async fn deliver(&self, digest: &Digest) -> anyhow::Result<()> {
        self.send(&digest.subject, &digest.html_body).await?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address.parse::<Mailbox>().map_err(|e| DeliveryError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
