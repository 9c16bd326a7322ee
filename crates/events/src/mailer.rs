//! The notification send primitive.

use async_trait::async_trait;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// No SMTP server is configured.
    #[error("Email delivery is not configured")]
    NotConfigured,
}

/// Sends one HTML email to one recipient.
///
/// Implementations must be cheap to share behind an `Arc`; every failure is
/// per-recipient and callers decide whether it is fatal.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError>;
}

/// Mailer used when `SMTP_HOST` is unset. Every send fails with
/// [`EmailError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), EmailError> {
        tracing::debug!(to, subject, "Email delivery disabled, dropping message");
        Err(EmailError::NotConfigured)
    }
}
