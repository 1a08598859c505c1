//! mailrelay - minimal mail relay backend
//!
//! Keeps a directory of users keyed by email and a log of messages between
//! them, persisted as JSON across restarts, and serves both over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod mail;
pub mod seed;
pub mod storage;
pub mod user;
pub mod web;

pub use config::Config;
pub use error::{RelayError, Result};
pub use mail::{parse_message, Message, MessageStore};
pub use storage::{ReadFailure, ReadFailureHook, Storage};
pub use user::{User, UserDirectory};
pub use web::WebServer;
