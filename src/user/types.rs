//! User types for mailrelay.

use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `email` is the identity key: compared exactly and case-sensitively.
/// `user_name` is free text and may repeat across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Display name.
    pub user_name: String,
    /// Email address.
    pub email: String,
}

impl User {
    /// Create a new user.
    pub fn new(user_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            email: email.into(),
        }
    }
}
