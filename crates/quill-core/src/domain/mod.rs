//! Domain entities - the core business objects.

mod blog;
mod comment;
mod contact;
mod user;

pub use blog::{Blog, Category, Reaction};
pub use comment::Comment;
pub use contact::{Contact, ContactStatus};
pub use user::User;
