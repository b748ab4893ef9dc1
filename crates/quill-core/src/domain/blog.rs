use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DomainError;

/// Blog categories - a closed set; anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Education,
    Health,
    Innovation,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Business,
        Category::Education,
        Category::Health,
        Category::Innovation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Innovation => "Innovation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::Validation("Invalid category".to_string()))
    }
}

/// A reaction a user can register on a blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Unlike,
    Share,
}

/// Blog entity - a post with reaction sets and linked comments.
///
/// `likes`, `unlikes` and `shares` hold user ids. A user appears in at most
/// one of `likes`/`unlikes`; `shares` is append-only. `comments` holds the
/// ids of this blog's comments in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author: Uuid,
    pub image: Option<String>,
    pub likes: Vec<Uuid>,
    pub unlikes: Vec<Uuid>,
    pub shares: Vec<Uuid>,
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new blog authored by `author`.
    pub fn new(
        title: String,
        content: String,
        category: Category,
        author: Uuid,
        image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            category,
            author,
            image,
            likes: Vec::new(),
            unlikes: Vec::new(),
            shares: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a reaction from `user_id`.
    ///
    /// Rejects a repeated reaction on the same set. A like removes the user
    /// from `unlikes` and vice versa, so the two sets stay disjoint. Shares
    /// only ever grow.
    pub fn react(&mut self, user_id: Uuid, reaction: Reaction) -> Result<(), DomainError> {
        match reaction {
            Reaction::Like => {
                if self.likes.contains(&user_id) {
                    return Err(DomainError::Validation(
                        "You already liked this blog".to_string(),
                    ));
                }
                self.unlikes.retain(|id| *id != user_id);
                self.likes.push(user_id);
            }
            Reaction::Unlike => {
                if self.unlikes.contains(&user_id) {
                    return Err(DomainError::Validation(
                        "You already unliked this blog".to_string(),
                    ));
                }
                self.likes.retain(|id| *id != user_id);
                self.unlikes.push(user_id);
            }
            Reaction::Share => {
                if self.shares.contains(&user_id) {
                    return Err(DomainError::Validation(
                        "You already shared this blog".to_string(),
                    ));
                }
                self.shares.push(user_id);
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
