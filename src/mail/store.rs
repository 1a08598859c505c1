//! Message store for mailrelay.
//!
//! Messages are only accepted between registered users and are kept in the
//! order they were appended.

use tracing::{debug, info};

use crate::storage::Storage;
use crate::{RelayError, Result};

use super::types::Message;

/// Referentially checked, append-only view of the messages collection.
pub struct MessageStore<'a> {
    storage: &'a Storage,
}

impl<'a> MessageStore<'a> {
    /// Create a new MessageStore over the given storage.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Append a message.
    ///
    /// # Errors
    ///
    /// - [`RelayError::SenderNotFound`] if the sender is not registered
    /// - [`RelayError::ReceiverNotFound`] if the receiver is not registered
    ///
    /// The sender is checked first, against the same users snapshot as the
    /// receiver. On error nothing is written.
    pub async fn append(&self, message: Message) -> Result<()> {
        let users = self.storage.get_users().await?;
        let registered = |email: &str| users.iter().any(|u| u.email == email);

        if !registered(&message.sender_id) {
            debug!(sender = %message.sender_id, "Unknown sender");
            return Err(RelayError::SenderNotFound(message.sender_id));
        }
        if !registered(&message.receiver_id) {
            debug!(receiver = %message.receiver_id, "Unknown receiver");
            return Err(RelayError::ReceiverNotFound(message.receiver_id));
        }

        let (sender, receiver) = (message.sender_id.clone(), message.receiver_id.clone());
        self.storage.add_message(message).await?;

        info!(sender = %sender, receiver = %receiver, "Message stored");
        Ok(())
    }

    /// List all messages in insertion order.
    pub async fn list(&self) -> Result<Vec<Message>> {
        self.storage.get_messages().await
    }

    /// Messages received by `email`, in insertion order.
    pub async fn inbox(&self, email: &str) -> Result<Vec<Message>> {
        let messages = self.storage.get_messages().await?;
        Ok(messages
            .into_iter()
            .filter(|m| m.receiver_id == email)
            .collect())
    }

    /// Messages sent by `email`, in insertion order.
    pub async fn sent(&self, email: &str) -> Result<Vec<Message>> {
        let messages = self.storage.get_messages().await?;
        Ok(messages
            .into_iter()
            .filter(|m| m.sender_id == email)
            .collect())
    }
}
