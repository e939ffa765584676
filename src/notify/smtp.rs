use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::Notifier;
use crate::config::MailConfig;

/// Sends the report to the configured address, from that same address,
/// over an authenticated STARTTLS session.
pub struct SmtpNotifier {
    address: String,
    mailbox: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Builds the transport without connecting.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let mailbox: Mailbox = config
            .address
            .parse()
            .with_context(|| format!("Invalid email address '{}'", config.address))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .with_context(|| format!("Invalid SMTP server '{}'", config.smtp_server))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.address.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            address: config.address.clone(),
            mailbox,
            transport,
        })
    }

    fn message(&self, subject: &str, html: String) -> Result<Message> {
        Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .context("Failed to build email message")
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, html: String) -> Result<()> {
        let message = self.message(subject, html)?;
        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(())
    }

    fn recipient(&self) -> &str {
        &self.address
    }
}
