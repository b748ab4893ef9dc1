//! # Quill Shared
//!
//! DTOs and the JSON response envelope shared between the API server and
//! any Rust clients.

pub mod dto;
pub mod response;

pub use response::MessageResponse;
