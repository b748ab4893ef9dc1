//! In-memory document collections.
//!
//! Each repository is a HashMap behind an async RwLock, one per collection.
//! Operations the handlers must not race on (unique email insert, reaction
//! toggles, comment linking) run entirely under one write lock, which gives
//! them the same atomicity a store-side unique index or conditional update
//! would. Note: data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Blog, Comment, Contact, Reaction, User};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{BlogRepository, CommentRepository, ContactRepository, UserRepository};

/// User collection.
#[derive(Default)]
pub struct InMemoryUserRepository {
    docs: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.docs.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert_unique(&self, user: User) -> Result<User, RepoError> {
        // Uniqueness check and insert under one write lock.
        let mut docs = self.docs.write().await;
        if docs.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }
        docs.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        // An email change may not collide with another account.
        let mut docs = self.docs.write().await;
        if docs.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }
        docs.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        let count = docs.len() as u64;
        docs.clear();
        Ok(count)
    }
}

/// Blog collection.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    docs: RwLock<HashMap<Uuid, Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        let mut blogs: Vec<Blog> = self.docs.read().await.values().cloned().collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(blogs)
    }

    async fn save(&self, blog: Blog) -> Result<Blog, RepoError> {
        self.docs.write().await.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        let count = docs.len() as u64;
        docs.clear();
        Ok(count)
    }

    async fn apply_reaction(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Blog, RepoError> {
        let mut docs = self.docs.write().await;
        let blog = docs.get_mut(&blog_id).ok_or(RepoError::NotFound)?;
        blog.react(user_id, reaction).map_err(|e| match e {
            DomainError::Validation(msg) => RepoError::Constraint(msg),
            other => RepoError::Query(other.to_string()),
        })?;
        Ok(blog.clone())
    }

    async fn link_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        let blog = docs.get_mut(&blog_id).ok_or(RepoError::NotFound)?;
        blog.comments.push(comment_id);
        blog.touch();
        Ok(())
    }

    async fn unlink_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        let blog = docs.get_mut(&blog_id).ok_or(RepoError::NotFound)?;
        blog.comments.retain(|id| *id != comment_id);
        blog.touch();
        Ok(())
    }

    async fn clear_comments(&self, blog_id: Uuid) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        let blog = docs.get_mut(&blog_id).ok_or(RepoError::NotFound)?;
        blog.comments.clear();
        blog.touch();
        Ok(())
    }
}

/// Comment collection.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    docs: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn find_by_blog(&self, blog_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let docs = self.docs.read().await;
        let mut comments: Vec<Comment> =
            docs.values().filter(|c| c.blog == blog_id).cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.docs.write().await.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn delete_by_blog(&self, blog_id: Uuid) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|_, c| c.blog != blog_id);
        Ok((before - docs.len()) as u64)
    }
}

/// Contact collection.
#[derive(Default)]
pub struct InMemoryContactRepository {
    docs: RwLock<HashMap<Uuid, Contact>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, RepoError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Contact>, RepoError> {
        let mut contacts: Vec<Contact> = self.docs.read().await.values().cloned().collect();
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contacts)
    }

    async fn save(&self, contact: Contact) -> Result<Contact, RepoError> {
        self.docs.write().await.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        let count = docs.len() as u64;
        docs.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::Category;

    fn user(email: &str) -> User {
        User::new("Test".to_string(), email.to_string(), "hash".to_string())
    }

    fn blog(author: Uuid) -> Blog {
        Blog::new(
            "Title".to_string(),
            "Content".to_string(),
            Category::Business,
            author,
            None,
        )
    }

    #[tokio::test]
    async fn insert_unique_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert_unique(user("a@example.com")).await.unwrap();

        let err = repo.insert_unique(user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        // First account unaffected.
        assert!(
            repo.find_by_email("a@example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_rejects_email_taken_by_another_account() {
        let repo = InMemoryUserRepository::new();
        repo.insert_unique(user("a@example.com")).await.unwrap();
        let other = repo.insert_unique(user("b@example.com")).await.unwrap();

        let mut hijack = other.clone();
        hijack.email = "a@example.com".to_string();
        let err = repo.save(hijack).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        // Saving under the account's own email still works.
        assert!(repo.save(other).await.is_ok());
    }

    #[tokio::test]
    async fn apply_reaction_moves_user_between_sets() {
        let repo = InMemoryBlogRepository::new();
        let author = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let saved = repo.save(blog(author)).await.unwrap();

        let liked = repo
            .apply_reaction(saved.id, reader, Reaction::Like)
            .await
            .unwrap();
        assert!(liked.likes.contains(&reader));

        let unliked = repo
            .apply_reaction(saved.id, reader, Reaction::Unlike)
            .await
            .unwrap();
        assert!(!unliked.likes.contains(&reader));
        assert!(unliked.unlikes.contains(&reader));
    }

    #[tokio::test]
    async fn apply_reaction_rejects_repeat_and_missing_blog() {
        let repo = InMemoryBlogRepository::new();
        let reader = Uuid::new_v4();
        let saved = repo.save(blog(Uuid::new_v4())).await.unwrap();

        repo.apply_reaction(saved.id, reader, Reaction::Share)
            .await
            .unwrap();
        let err = repo
            .apply_reaction(saved.id, reader, Reaction::Share)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        let err = repo
            .apply_reaction(Uuid::new_v4(), reader, Reaction::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn comment_link_and_unlink() {
        let blogs = InMemoryBlogRepository::new();
        let saved = blogs.save(blog(Uuid::new_v4())).await.unwrap();
        let comment_id = Uuid::new_v4();

        blogs.link_comment(saved.id, comment_id).await.unwrap();
        assert_eq!(
            blogs.find_by_id(saved.id).await.unwrap().unwrap().comments,
            vec![comment_id]
        );

        blogs.unlink_comment(saved.id, comment_id).await.unwrap();
        assert!(
            blogs
                .find_by_id(saved.id)
                .await
                .unwrap()
                .unwrap()
                .comments
                .is_empty()
        );
    }

    #[tokio::test]
    async fn comments_for_blog_newest_first() {
        let repo = InMemoryCommentRepository::new();
        let blog_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut first = Comment::new(blog_id, user_id, "first".to_string());
        let mut second = Comment::new(blog_id, user_id, "second".to_string());
        first.created_at = chrono::Utc::now() - chrono::Duration::seconds(10);
        second.created_at = chrono::Utc::now();
        repo.save(first).await.unwrap();
        repo.save(second).await.unwrap();
        repo.save(Comment::new(Uuid::new_v4(), user_id, "other blog".to_string()))
            .await
            .unwrap();

        let listed = repo.find_by_blog(blog_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "second");
        assert_eq!(listed[1].content, "first");
    }

    #[tokio::test]
    async fn delete_by_blog_counts_removed() {
        let repo = InMemoryCommentRepository::new();
        let blog_id = Uuid::new_v4();
        for i in 0..3 {
            repo.save(Comment::new(blog_id, Uuid::new_v4(), format!("c{i}")))
                .await
                .unwrap();
        }
        repo.save(Comment::new(Uuid::new_v4(), Uuid::new_v4(), "keep".to_string()))
            .await
            .unwrap();

        assert_eq!(repo.delete_by_blog(blog_id).await.unwrap(), 3);
        assert!(repo.find_by_blog(blog_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_reports_count() {
        let repo = InMemoryContactRepository::new();
        for i in 0..2 {
            repo.save(Contact::new(
                format!("n{i}"),
                format!("e{i}@example.com"),
                "s".to_string(),
                "m".to_string(),
            ))
            .await
            .unwrap();
        }
        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
