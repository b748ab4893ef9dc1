//! Outbound email port.

use async_trait::async_trait;

/// Transactional email sender.
///
/// Welcome, login and new-blog notifications are dispatched fire-and-forget;
/// only the contact acknowledgement and admin reply paths await the result.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single HTML email.
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// Mail dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Mail rejected: {0}")]
    Rejected(String),
}
