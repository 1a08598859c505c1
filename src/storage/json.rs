//! JSON file-backed collection.
//!
//! Each collection lives in its own file holding the whole collection as one
//! JSON array. Writes go through a single writer per collection and replace
//! the file atomically:
//!
//! 1. Read the current array and append the new record
//! 2. Write the array to a fresh temporary file in the same directory and
//!    fsync it
//! 3. Rename the temporary file over `<file>`
//!
//! Readers take no lock; a rename never exposes a half-written file.

use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::CorruptPolicy;
use crate::{RelayError, Result};

use super::hook::{ReadFailure, ReadFailureHook};
use super::Record;

/// Result of decoding a collection file.
#[derive(Debug, PartialEq)]
pub(crate) enum LoadOutcome<T> {
    /// The file held a JSON array.
    Records(Vec<T>),
    /// The file is missing, blank or `null`.
    Empty,
    /// The file content is not a valid array of records.
    Corrupt(String),
}

/// Decode raw file content.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> LoadOutcome<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return LoadOutcome::Empty;
    }
    match serde_json::from_slice::<Option<Vec<T>>>(bytes) {
        Ok(Some(records)) => LoadOutcome::Records(records),
        Ok(None) => LoadOutcome::Empty,
        Err(e) => LoadOutcome::Corrupt(e.to_string()),
    }
}

/// Create the parent directory of `path` and return the path with that
/// directory canonicalized.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        RelayError::Config(format!("{} does not name a file", path.display()))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    Ok(fs::canonicalize(parent)?.join(file_name))
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path).map(drop).map_err(|e| RelayError::Io(e.error))
}

/// File identity and read policy shared with the blocking writer task.
struct CollectionFile {
    name: &'static str,
    path: PathBuf,
    policy: CorruptPolicy,
    hook: ReadFailureHook,
}

impl CollectionFile {
    fn resolve<T>(&self, outcome: LoadOutcome<T>) -> Result<Vec<T>> {
        match outcome {
            LoadOutcome::Records(records) => Ok(records),
            LoadOutcome::Empty => Ok(Vec::new()),
            LoadOutcome::Corrupt(reason) => {
                (self.hook)(&ReadFailure {
                    collection: self.name,
                    path: self.path.clone(),
                    reason: reason.clone(),
                });
                match self.policy {
                    CorruptPolicy::Empty => Ok(Vec::new()),
                    CorruptPolicy::Error => Err(RelayError::CorruptCollection {
                        collection: self.name,
                        reason,
                    }),
                }
            }
        }
    }

    fn read_blocking<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        self.resolve(decode(&bytes))
    }

    fn write_blocking<T: Serialize>(&self, records: &[T]) -> Result<()> {
        let json = serde_json::to_vec(records)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));

        // Dropped on any error, which removes the temporary file.
        let mut tmp = tempfile::Builder::new()
            .prefix(".mailrelay-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        persist(tmp, &self.path)
    }
}

/// A collection persisted as a JSON array in a single file.
pub struct JsonCollection<T> {
    file: Arc<CollectionFile>,
    writer: Arc<Mutex<()>>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonCollection<T> {
    /// Open the collection stored at `path`.
    ///
    /// The parent directory is created if missing and canonicalized, so
    /// [`path`](Self::path) is the resolved location. The file itself is
    /// created on the first write.
    pub fn open(
        name: &'static str,
        path: impl Into<PathBuf>,
        policy: CorruptPolicy,
        hook: ReadFailureHook,
    ) -> Result<Self> {
        let path = resolve_path(&path.into())?;
        debug!(collection = name, path = %path.display(), "Opened JSON collection");

        Ok(Self {
            file: Arc::new(CollectionFile {
                name,
                path,
                policy,
                hook,
            }),
            writer: Arc::new(Mutex::new(())),
            _record: PhantomData,
        })
    }

    /// Resolved path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file.path
    }

    /// Read the whole collection.
    pub async fn snapshot(&self) -> Result<Vec<T>> {
        let bytes = match tokio::fs::read(&self.file.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        self.file.resolve(decode(&bytes))
    }

    /// Append `record` if `check` accepts the current records.
    ///
    /// The read-modify-write runs on the blocking pool while the collection's
    /// writer lock is held. Once the lock is acquired the write runs to
    /// completion even if the returned future is dropped.
    pub async fn append_if<F>(&self, record: T, check: F) -> Result<()>
    where
        F: FnOnce(&[T]) -> Result<()> + Send + 'static,
    {
        let guard = Arc::clone(&self.writer).lock_owned().await;
        let file = Arc::clone(&self.file);

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let mut records: Vec<T> = file.read_blocking()?;
            check(&records)?;
            records.push(record);
            file.write_blocking(&records)?;
            debug!(collection = file.name, count = records.len(), "Collection written");
            Ok(())
        })
        .await
        .map_err(|e| RelayError::Internal(format!("{} writer task failed: {e}", self.file.name)))?
    }
}

impl<T> std::fmt::Debug for JsonCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCollection")
            .field("name", &self.file.name)
            .field("path", &self.file.path)
            .field("policy", &self.file.policy)
            .finish()
    }
}
