//! HTTP API for mailrelay.
//!
//! Maps requests onto [`UserDirectory`](crate::user::UserDirectory) and
//! [`MessageStore`](crate::mail::MessageStore) and renders results as JSON.
//! Errors are returned as `{"error": "<message>"}`.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
