use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - authored by a user, attached to a blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub blog: Uuid,
    pub user: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(blog: Uuid, user: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            blog,
            user,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Only the author or an administrator may edit or delete a comment.
    pub fn can_be_modified_by(&self, user_id: Uuid, is_admin: bool) -> bool {
        is_admin || self.user == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
