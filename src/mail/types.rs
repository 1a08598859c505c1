//! Message types for mailrelay.

use serde::{Deserialize, Serialize};

/// A message sent from one registered user to another.
///
/// `sender_id` and `receiver_id` hold user emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    /// Message subject.
    pub subject: String,
    /// Message body.
    #[serde(rename = "Message")]
    pub body: String,
    /// Sender email.
    pub sender_id: String,
    /// Receiver email.
    pub receiver_id: String,
}

impl Message {
    /// Create a new message.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
        }
    }
}
