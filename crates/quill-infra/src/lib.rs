//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! document collections, token/password services, and the mail and media
//! collaborators.
//!
//! ## Feature Flags
//!
//! - `http` (default) - reqwest-backed mail and media adapters
//! - `mongo` (default) - MongoDB-backed document collections

pub mod auth;
pub mod mail;
pub mod media;
pub mod store;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use mail::LogMailer;
pub use media::InMemoryMediaStore;
pub use store::{
    InMemoryBlogRepository, InMemoryCommentRepository, InMemoryContactRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "http")]
pub use mail::HttpMailer;

#[cfg(feature = "http")]
pub use media::HttpMediaStore;

#[cfg(feature = "mongo")]
pub use store::{
    MongoBlogRepository, MongoCommentRepository, MongoConfig, MongoContactRepository,
    MongoUserRepository,
};
