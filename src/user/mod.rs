//! User module for mailrelay.
//!
//! Users are identified by email. The directory guarantees that no two users
//! share an email; users are never updated or removed.

mod directory;
mod types;

pub use directory::UserDirectory;
pub use types::User;
