//! Error types for mailrelay.

use thiserror::Error;

/// Common error type for mailrelay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A user with this email is already registered.
    #[error("email already taken: {0}")]
    DuplicateEmail(String),

    /// The sender of a message is not a registered user.
    #[error("sender not found: {0}")]
    SenderNotFound(String),

    /// The receiver of a message is not a registered user.
    #[error("receiver not found: {0}")]
    ReceiverNotFound(String),

    /// A persisted collection could not be deserialized.
    ///
    /// Only returned when storage is configured to fail on corrupt files;
    /// by default corrupt collections are read as empty.
    #[error("corrupt {collection} collection: {reason}")]
    CorruptCollection {
        /// Collection name ("users" or "messages").
        collection: &'static str,
        /// Deserializer message.
        reason: String,
    },

    /// Raw message text could not be parsed.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Seed for random population is not a non-negative integer.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A background task failed before completing.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Serialization(e.to_string())
    }
}

/// Result type alias for mailrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_display() {
        let err = RelayError::DuplicateEmail("dup@x".to_string());
        assert_eq!(err.to_string(), "email already taken: dup@x");
    }

    #[test]
    fn test_sender_not_found_display() {
        let err = RelayError::SenderNotFound("a@a".to_string());
        assert_eq!(err.to_string(), "sender not found: a@a");
    }

    #[test]
    fn test_receiver_not_found_display() {
        let err = RelayError::ReceiverNotFound("b@b".to_string());
        assert_eq!(err.to_string(), "receiver not found: b@b");
    }

    #[test]
    fn test_corrupt_collection_display() {
        let err = RelayError::CorruptCollection {
            collection: "users",
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt users collection: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelayError = io_err.into();
        assert!(matches!(err, RelayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err: RelayError = json_err.into();
        assert!(matches!(err, RelayError::Serialization(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(RelayError::Config("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
