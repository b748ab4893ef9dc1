//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{
    BlogRepository, CommentRepository, ContactRepository, Mailer, MediaStore, PasswordService,
    TokenService, UserRepository,
};
use quill_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryCommentRepository,
    InMemoryContactRepository, InMemoryMediaStore, InMemoryUserRepository, JwtTokenService,
    LogMailer, MongoBlogRepository, MongoCommentRepository, MongoConfig, MongoContactRepository,
    MongoUserRepository,
};

/// Shared application state: the four document collections plus the
/// credential, mail and media collaborators.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub blogs: Arc<dyn BlogRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub mailer: Arc<dyn Mailer>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    /// Assemble state over in-memory collections with the given collaborators.
    pub fn new(
        tokens: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            blogs: Arc::new(InMemoryBlogRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            contacts: Arc::new(InMemoryContactRepository::new()),
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            mailer,
            media,
        }
    }

    /// Build state from environment configuration. The store connection is
    /// established once here; a configured but unreachable MongoDB fails
    /// startup. Unconfigured mail/media providers fall back to the logging
    /// and in-memory adapters instead.
    pub async fn from_env() -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());

        let mailer: Arc<dyn Mailer> = match quill_infra::mail::MailApiConfig::from_env() {
            Some(config) => Arc::new(quill_infra::HttpMailer::new(config)),
            None => {
                tracing::warn!("MAIL_API_URL not set. Outbound email is log-only.");
                Arc::new(LogMailer::new())
            }
        };

        let media: Arc<dyn MediaStore> = match quill_infra::media::MediaApiConfig::from_env() {
            Some(config) => Arc::new(quill_infra::HttpMediaStore::new(config)),
            None => {
                tracing::warn!("MEDIA_API_URL not set. Images are stored in memory.");
                Arc::new(InMemoryMediaStore::new())
            }
        };

        let state = match MongoConfig::from_env() {
            Some(config) => {
                let db = config.connect().await?;
                tracing::info!(database = %config.database, "MongoDB store connected");
                Self {
                    users: Arc::new(MongoUserRepository::new(&db).await?),
                    blogs: Arc::new(MongoBlogRepository::new(&db)),
                    comments: Arc::new(MongoCommentRepository::new(&db)),
                    contacts: Arc::new(MongoContactRepository::new(&db)),
                    tokens,
                    passwords: Arc::new(Argon2PasswordService::new()),
                    mailer,
                    media,
                }
            }
            None => {
                tracing::warn!("MONGO_URI not set. Collections are in-memory and lost on restart.");
                Self::new(tokens, mailer, media)
            }
        };
        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Provision the administrator account if it does not exist yet.
    /// Registration never accepts a role flag, so this is the only path
    /// that creates administrators.
    pub async fn seed_admin(&self, name: &str, email: &str, password: &str) {
        match self.users.find_by_email(email).await {
            Ok(Some(_)) => {
                tracing::debug!(%email, "admin account already present");
            }
            Ok(None) => {
                let hash = match self.passwords.hash(password) {
                    Ok(hash) => hash,
                    Err(e) => {
                        tracing::error!("failed to hash admin password: {e}");
                        return;
                    }
                };
                let admin = User::new_admin(name.to_string(), email.to_string(), hash);
                match self.users.insert_unique(admin).await {
                    Ok(user) => tracing::info!(%email, id = %user.id, "admin account seeded"),
                    Err(e) => tracing::error!("failed to seed admin account: {e}"),
                }
            }
            Err(e) => tracing::error!("admin seed lookup failed: {e}"),
        }
    }
}
