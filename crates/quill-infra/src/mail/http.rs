//! HTTP mail API adapter.
//!
//! Sends transactional email through a JSON mail API (Resend-style):
//! `POST {endpoint}` with a bearer key and `{ from, to, subject, html }`.

use async_trait::async_trait;
use serde::Serialize;

use quill_core::ports::{MailError, Mailer};

/// Mail API configuration.
#[derive(Debug, Clone)]
pub struct MailApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub from: String,
}

impl MailApiConfig {
    /// Read `MAIL_API_URL`, `MAIL_API_KEY` and `MAIL_FROM`; `None` when the
    /// endpoint is not set, in which case callers fall back to `LogMailer`.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("MAIL_API_URL").ok()?;
        Some(Self {
            endpoint,
            api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Quill <no-reply@quill.example>".to_string()),
        })
    }
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Mailer backed by an HTTP mail API.
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailApiConfig,
}

impl HttpMailer {
    pub fn new(config: MailApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let payload = MailPayload {
            from: &self.config.from,
            to,
            subject,
            html,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(format!("{status}: {body}")));
        }

        tracing::debug!(%to, %subject, "mail accepted by provider");
        Ok(())
    }
}
