//! MongoDB-backed document collections.
//!
//! The durable counterpart to the in-memory repositories. Atomicity moves
//! into the store: email uniqueness is a unique index, reactions and comment
//! linking are single conditional updates, so concurrent requests cannot
//! interleave a check with a write.

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{Bson, doc, to_bson};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use uuid::Uuid;

use quill_core::domain::{Blog, Comment, Contact, Reaction, User};
use quill_core::error::RepoError;
use quill_core::ports::{BlogRepository, CommentRepository, ContactRepository, UserRepository};

/// Connection settings, read from `MONGO_URI` and `MONGO_DB`.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl MongoConfig {
    /// Returns `None` when `MONGO_URI` is unset, in which case the caller
    /// falls back to the in-memory collections.
    pub fn from_env() -> Option<Self> {
        let uri = std::env::var("MONGO_URI").ok()?;
        let database = std::env::var("MONGO_DB").unwrap_or_else(|_| "quill".to_string());
        Some(Self { uri, database })
    }

    /// Establish the connection once, at startup. The ping forces an actual
    /// round trip so a bad URI fails here instead of on the first request.
    pub async fn connect(&self) -> Result<Database, RepoError> {
        let client = Client::with_uri_str(&self.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        let db = client.database(&self.database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        Ok(db)
    }
}

fn query(e: mongodb::error::Error) -> RepoError {
    RepoError::Query(e.to_string())
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(*e.kind, ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == 11000)
}

fn now_bson() -> Result<Bson, RepoError> {
    to_bson(&Utc::now()).map_err(|e| RepoError::Query(e.to_string()))
}

/// User collection with a unique index on `email`.
pub struct MongoUserRepository {
    coll: Collection<User>,
}

impl MongoUserRepository {
    pub async fn new(db: &Database) -> Result<Self, RepoError> {
        let coll = db.collection("users");
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        coll.create_index(index).await.map_err(query)?;
        Ok(Self { coll })
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.coll
            .find_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.coll
            .find_one(doc! { "email": email })
            .await
            .map_err(query)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let cursor = self
            .coll
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(query)?;
        cursor.try_collect().await.map_err(query)
    }

    async fn insert_unique(&self, user: User) -> Result<User, RepoError> {
        match self.coll.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => {
                Err(RepoError::Constraint("Email already registered".to_string()))
            }
            Err(e) => Err(query(e)),
        }
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        // The unique index also guards email changes on existing accounts.
        match self
            .coll
            .replace_one(doc! { "id": user.id.to_string() }, &user)
            .upsert(true)
            .await
        {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => {
                Err(RepoError::Constraint("Email already registered".to_string()))
            }
            Err(e) => Err(query(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = self
            .coll
            .delete_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)?;
        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = self.coll.delete_many(doc! {}).await.map_err(query)?;
        Ok(result.deleted_count)
    }
}

/// Blog collection.
pub struct MongoBlogRepository {
    coll: Collection<Blog>,
}

impl MongoBlogRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("blogs"),
        }
    }
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.coll
            .find_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)
    }

    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        let cursor = self
            .coll
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(query)?;
        cursor.try_collect().await.map_err(query)
    }

    async fn save(&self, blog: Blog) -> Result<Blog, RepoError> {
        self.coll
            .replace_one(doc! { "id": blog.id.to_string() }, &blog)
            .upsert(true)
            .await
            .map_err(query)?;
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = self
            .coll
            .delete_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)?;
        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = self.coll.delete_many(doc! {}).await.map_err(query)?;
        Ok(result.deleted_count)
    }

    async fn apply_reaction(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Blog, RepoError> {
        let id = blog_id.to_string();
        let uid = user_id.to_string();
        let now = now_bson()?;

        // The filter requires the user absent from the target set, so the
        // membership check and the write are one server-side operation. A
        // like pulls the user out of unlikes and vice versa; shares only
        // ever grow.
        let (filter, update, taken) = match reaction {
            Reaction::Like => (
                doc! { "id": &id, "likes": { "$ne": &uid } },
                doc! {
                    "$addToSet": { "likes": &uid },
                    "$pull": { "unlikes": &uid },
                    "$set": { "updated_at": &now },
                },
                "You already liked this blog",
            ),
            Reaction::Unlike => (
                doc! { "id": &id, "unlikes": { "$ne": &uid } },
                doc! {
                    "$addToSet": { "unlikes": &uid },
                    "$pull": { "likes": &uid },
                    "$set": { "updated_at": &now },
                },
                "You already unliked this blog",
            ),
            Reaction::Share => (
                doc! { "id": &id, "shares": { "$ne": &uid } },
                doc! {
                    "$addToSet": { "shares": &uid },
                    "$set": { "updated_at": &now },
                },
                "You already shared this blog",
            ),
        };

        let updated = self
            .coll
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(query)?;

        match updated {
            Some(blog) => Ok(blog),
            // No match: either the blog is gone or the user already reacted.
            None => match self.find_by_id(blog_id).await? {
                None => Err(RepoError::NotFound),
                Some(_) => Err(RepoError::Constraint(taken.to_string())),
            },
        }
    }

    async fn link_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let now = now_bson()?;
        let result = self
            .coll
            .update_one(
                doc! { "id": blog_id.to_string() },
                doc! {
                    "$push": { "comments": comment_id.to_string() },
                    "$set": { "updated_at": now },
                },
            )
            .await
            .map_err(query)?;
        if result.matched_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn unlink_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let now = now_bson()?;
        let result = self
            .coll
            .update_one(
                doc! { "id": blog_id.to_string() },
                doc! {
                    "$pull": { "comments": comment_id.to_string() },
                    "$set": { "updated_at": now },
                },
            )
            .await
            .map_err(query)?;
        if result.matched_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn clear_comments(&self, blog_id: Uuid) -> Result<(), RepoError> {
        let now = now_bson()?;
        let result = self
            .coll
            .update_one(
                doc! { "id": blog_id.to_string() },
                doc! { "$set": { "comments": [], "updated_at": now } },
            )
            .await
            .map_err(query)?;
        if result.matched_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Comment collection.
pub struct MongoCommentRepository {
    coll: Collection<Comment>,
}

impl MongoCommentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("comments"),
        }
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        self.coll
            .find_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)
    }

    async fn find_by_blog(&self, blog_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let cursor = self
            .coll
            .find(doc! { "blog": blog_id.to_string() })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(query)?;
        cursor.try_collect().await.map_err(query)
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.coll
            .replace_one(doc! { "id": comment.id.to_string() }, &comment)
            .upsert(true)
            .await
            .map_err(query)?;
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = self
            .coll
            .delete_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)?;
        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_blog(&self, blog_id: Uuid) -> Result<u64, RepoError> {
        let result = self
            .coll
            .delete_many(doc! { "blog": blog_id.to_string() })
            .await
            .map_err(query)?;
        Ok(result.deleted_count)
    }
}

/// Contact collection.
pub struct MongoContactRepository {
    coll: Collection<Contact>,
}

impl MongoContactRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: db.collection("contacts"),
        }
    }
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, RepoError> {
        self.coll
            .find_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)
    }

    async fn find_all(&self) -> Result<Vec<Contact>, RepoError> {
        let cursor = self
            .coll
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(query)?;
        cursor.try_collect().await.map_err(query)
    }

    async fn save(&self, contact: Contact) -> Result<Contact, RepoError> {
        self.coll
            .replace_one(doc! { "id": contact.id.to_string() }, &contact)
            .upsert(true)
            .await
            .map_err(query)?;
        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = self
            .coll
            .delete_one(doc! { "id": id.to_string() })
            .await
            .map_err(query)?;
        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = self.coll.delete_many(doc! {}).await.map_err(query)?;
        Ok(result.deleted_count)
    }
}

// Integration tests against a live server. Run with:
//   MONGO_URI=mongodb://localhost:27017 cargo test -p quill-infra -- --ignored
#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let config = MongoConfig {
            uri: std::env::var("MONGO_URI").expect("MONGO_URI"),
            database: format!("quill_test_{}", Uuid::new_v4().simple()),
        };
        config.connect().await.expect("connect")
    }

    fn user(email: &str) -> User {
        User::new("Test".to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB (set MONGO_URI)"]
    async fn documents_survive_across_repository_handles() {
        let db = test_db().await;

        // Two handles model two process lifetimes over the same store.
        let first = MongoUserRepository::new(&db).await.unwrap();
        let saved = first.insert_unique(user("durable@example.com")).await.unwrap();
        drop(first);

        let second = MongoUserRepository::new(&db).await.unwrap();
        let found = second.find_by_id(saved.id).await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("durable@example.com".to_string()));

        db.drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB (set MONGO_URI)"]
    async fn unique_index_rejects_duplicate_email_on_insert_and_save() {
        let db = test_db().await;
        let repo = MongoUserRepository::new(&db).await.unwrap();

        repo.insert_unique(user("a@example.com")).await.unwrap();
        let err = repo.insert_unique(user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        // An email change onto a taken address hits the same index.
        let mut other = repo.insert_unique(user("b@example.com")).await.unwrap();
        other.email = "a@example.com".to_string();
        let err = repo.save(other).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        db.drop().await.unwrap();
    }
}
