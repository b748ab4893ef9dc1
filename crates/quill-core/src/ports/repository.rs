use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Blog, Comment, Contact, Reaction, User};
use crate::error::RepoError;

/// User collection.
///
/// Email uniqueness is the store's responsibility: `insert_unique` performs
/// the duplicate check and the insert as one atomic operation, so two
/// concurrent registrations with the same email cannot both succeed.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// All users, oldest first.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;

    /// Insert a new user; fails with `Constraint` if the email is taken.
    async fn insert_unique(&self, user: User) -> Result<User, RepoError>;

    /// Upsert a user; fails with `Constraint` if the email belongs to
    /// another account.
    async fn save(&self, user: User) -> Result<User, RepoError>;

    /// Delete by id; `NotFound` if the id does not resolve.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Delete every user, returning the number removed.
    async fn delete_all(&self) -> Result<u64, RepoError>;
}

/// Blog collection.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;

    /// All blogs, newest-first.
    async fn find_all(&self) -> Result<Vec<Blog>, RepoError>;

    async fn save(&self, blog: Blog) -> Result<Blog, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn delete_all(&self) -> Result<u64, RepoError>;

    /// Apply a reaction as a single conditional update.
    ///
    /// Fails with `NotFound` if the blog is missing and with `Constraint` if
    /// the user already reacted on the target set. Enforces the like/unlike
    /// mutual exclusion inside the store, not in the handler.
    async fn apply_reaction(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Blog, RepoError>;

    /// Append a comment id to the blog's comment list.
    async fn link_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;

    /// Remove a comment id from the blog's comment list, if present.
    async fn unlink_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;

    /// Empty the blog's comment list.
    async fn clear_comments(&self, blog_id: Uuid) -> Result<(), RepoError>;
}

/// Comment collection.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    /// Comments for one blog, newest-first.
    async fn find_by_blog(&self, blog_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Delete every comment referencing `blog_id`, returning the number removed.
    async fn delete_by_blog(&self, blog_id: Uuid) -> Result<u64, RepoError>;
}

/// Contact collection.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, RepoError>;

    /// All contacts, newest-first.
    async fn find_all(&self) -> Result<Vec<Contact>, RepoError>;

    async fn save(&self, contact: Contact) -> Result<Contact, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn delete_all(&self) -> Result<u64, RepoError>;
}
