//! JSON response envelope.
//!
//! Success bodies are the resource itself or a `{ message }` object; error
//! bodies are always `{ message }`. Status codes carry the rest of the
//! contract.

use serde::{Deserialize, Serialize};

/// The `{ message }` body used for plain confirmations and for every error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
