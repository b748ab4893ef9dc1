//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mail;
mod media;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use mail::{MailError, Mailer};
pub use media::{BLOG_IMAGE_FOLDER, MediaError, MediaStore, public_id_from_url};
pub use repository::{BlogRepository, CommentRepository, ContactRepository, UserRepository};
