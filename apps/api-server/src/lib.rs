//! # Quill API Server
//!
//! Actix-web transport layer over the Quill domain: accounts, blogs with
//! image attachments, comments, reactions, and the contact inbox.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
