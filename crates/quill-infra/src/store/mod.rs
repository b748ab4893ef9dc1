//! Document store adapters.

mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use memory::{
    InMemoryBlogRepository, InMemoryCommentRepository, InMemoryContactRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "mongo")]
pub use mongo::{
    MongoBlogRepository, MongoCommentRepository, MongoConfig, MongoContactRepository,
    MongoUserRepository,
};
