//! Outbound email adapters.

mod log;

#[cfg(feature = "http")]
mod http;

pub use log::LogMailer;

#[cfg(feature = "http")]
pub use http::{HttpMailer, MailApiConfig};
