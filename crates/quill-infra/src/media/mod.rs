//! Image hosting adapters.

mod memory;

#[cfg(feature = "http")]
mod http;

pub use memory::InMemoryMediaStore;

#[cfg(feature = "http")]
pub use http::{HttpMediaStore, MediaApiConfig};
