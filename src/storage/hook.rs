//! Read-failure reporting for persisted collections.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

/// A collection file whose content could not be deserialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFailure {
    /// Collection name ("users" or "messages").
    pub collection: &'static str,
    /// Path of the offending file.
    pub path: PathBuf,
    /// Deserializer message.
    pub reason: String,
}

/// Callback invoked whenever a corrupt collection file is read.
///
/// Invoked on both reads and writes, before the configured
/// [`CorruptPolicy`](crate::config::CorruptPolicy) is applied.
pub type ReadFailureHook = Arc<dyn Fn(&ReadFailure) + Send + Sync>;

/// Default hook: log the failure at `warn`.
pub fn log_read_failure() -> ReadFailureHook {
    Arc::new(|failure: &ReadFailure| {
        warn!(
            collection = failure.collection,
            path = %failure.path.display(),
            reason = %failure.reason,
            "corrupt collection file"
        );
    })
}
