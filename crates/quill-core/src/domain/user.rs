use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an account on the platform.
///
/// The password hash never leaves the backend; response DTOs omit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a standard (non-administrator) user with generated ID and timestamps.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an administrator account. Only the seeding path calls this;
    /// registration never accepts a client-supplied role flag.
    pub fn new_admin(name: String, email: String, password_hash: String) -> Self {
        Self {
            is_admin: true,
            ..Self::new(name, email, password_hash)
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
