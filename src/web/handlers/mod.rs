//! API handlers for the mailrelay HTTP surface.

pub mod mail;
pub mod seed;
pub mod user;

pub use mail::*;
pub use seed::*;
pub use user::*;

use std::sync::Arc;

use crate::storage::Storage;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The one storage handle of this process.
    pub storage: Arc<Storage>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}
