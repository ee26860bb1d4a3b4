//! Outgoing email.
//!
//! With `SMTP_HOST` configured, mail goes out over SMTP (STARTTLS) through
//! lettre. Otherwise it is written to the log, which keeps development and
//! test setups free of a mail relay.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::config::SmtpSettings;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A plain-text email ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Delivery channel for notification emails.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// Pick the dispatcher matching `settings`.
pub fn dispatcher_from_settings(settings: &SmtpSettings) -> AppResult<Arc<dyn EmailDispatcher>> {
    if settings.is_configured() {
        Ok(Arc::new(SmtpMailer::new(settings)?))
    } else {
        tracing::warn!("SMTP not configured - emails will be logged instead of sent");
        Ok(Arc::new(LogMailer::new(settings.from.clone())))
    }
}

/// SMTP relay dispatcher.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> AppResult<Self> {
        let host = settings
            .host
            .as_deref()
            .ok_or_else(|| AppError::internal("SMTP host is not configured"))?;

        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::internal(format!("Invalid SMTP relay: {}", e)))?
            .port(settings.port)
            .timeout(Some(settings.timeout));

        if let Some((user, pass)) = settings.credentials() {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        tracing::info!(host = %host, port = settings.port, "SMTP mailer configured");

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailDispatcher for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::dispatch(format!("Invalid recipient {}: {}", message.to, e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| AppError::dispatch(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::dispatch(e.to_string()))?;

        tracing::info!(to = %message.to, "Email sent");
        Ok(())
    }
}

/// Development dispatcher: writes the email to the log.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl EmailDispatcher for LogMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            self.from,
            message.to,
            message.subject,
            message.body
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let mailer = LogMailer::new("noreply@example.com");
        let result = mailer
            .send(EmailMessage::new("user@example.com", "Hello", "Body"))
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_unconfigured_settings_fall_back_to_log_mailer() {
        let settings = SmtpSettings::new(None, 587, "noreply@example.com");
        assert!(dispatcher_from_settings(&settings).is_ok());
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let settings = SmtpSettings::new(Some("smtp.example.com".into()), 587, "not an address");
        assert!(SmtpMailer::new(&settings).is_err());
    }
}
