//! Mail module for mailrelay.
//!
//! This module provides:
//! - The [`Message`] record
//! - [`MessageStore`], which only accepts messages between registered users
//! - [`parse_message`], turning raw message text into a [`Message`]

mod parser;
mod store;
mod types;

pub use parser::parse_message;
pub use store::MessageStore;
pub use types::Message;
