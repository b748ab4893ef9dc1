use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a contact submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Pending,
    Responded,
}

/// Contact entity - a support inbox message from a (possibly anonymous) visitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub admin_reply: Option<String>,
    pub auto_response_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(name: String, email: String, subject: String, message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            subject,
            message,
            status: ContactStatus::Pending,
            admin_reply: None,
            auto_response_sent: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record an administrator reply and move the record to `responded`.
    pub fn record_reply(&mut self, reply: String) {
        self.admin_reply = Some(reply);
        self.status = ContactStatus::Responded;
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_contact_starts_pending() {
        let c = Contact::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "Hello".to_string(),
            "A question".to_string(),
        );
        assert_eq!(c.status, ContactStatus::Pending);
        assert!(!c.auto_response_sent);
        assert!(c.admin_reply.is_none());
    }

    #[test]
    fn reply_marks_responded() {
        let mut c = Contact::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "Hello".to_string(),
            "A question".to_string(),
        );
        c.record_reply("We are on it".to_string());
        assert_eq!(c.status, ContactStatus::Responded);
        assert_eq!(c.admin_reply.as_deref(), Some("We are on it"));
    }
}
