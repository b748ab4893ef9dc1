//! Logging mailer - used when no mail API is configured.
//!
//! Records every send in memory and logs it, so development environments
//! and tests can observe dispatch without a transport.

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::ports::{MailError, Mailer};

/// A recorded outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
}

/// Mailer that logs instead of sending. Note: nothing leaves the process.
#[derive(Default)]
pub struct LogMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails recorded so far, oldest first.
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), MailError> {
        tracing::info!(%to, %subject, "mail dispatch (logging mailer, not sent)");
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_in_order() {
        let mailer = LogMailer::new();
        mailer.send("a@example.com", "first", "<p>hi</p>").await.unwrap();
        mailer.send("b@example.com", "second", "<p>hi</p>").await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "first");
        assert_eq!(sent[1].to, "b@example.com");
    }
}
