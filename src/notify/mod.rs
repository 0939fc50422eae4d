//! Outbound notifications.
//!
//! The registration flow only needs "send this person a message"; who
//! actually delivers it is configuration. `SmtpNotifier` delivers over
//! SMTP, `LogNotifier` writes the message to the log and is the default
//! whenever SMTP is not configured.

use async_trait::async_trait;
use thiserror::Error;

pub mod smtp;

pub use smtp::SmtpNotifier;

/// A message for a single recipient. The sender identity belongs to the
/// delivering implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid message: {0}")]
    Message(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Logs notifications instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "Notification (log only): {}",
            notification.body
        );
        Ok(())
    }
}
