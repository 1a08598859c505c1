//! In-memory collection.

use tokio::sync::RwLock;

use crate::Result;

use super::Record;

/// A collection held in process memory.
///
/// Reads hand out clones so callers never alias internal state.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records in insertion order.
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    /// Append `record` if `check` accepts the current records.
    ///
    /// `check` runs while the write lock is held.
    pub async fn append_if<F>(&self, record: T, check: F) -> Result<()>
    where
        F: FnOnce(&[T]) -> Result<()>,
    {
        let mut records = self.records.write().await;
        check(&records)?;
        records.push(record);
        Ok(())
    }
}
