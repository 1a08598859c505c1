//! Persistence backend for mailrelay.
//!
//! [`Storage`] holds the two collections (users and messages) and is the only
//! component that touches the disk. It performs no validation; uniqueness and
//! referential checks belong to [`UserDirectory`](crate::user::UserDirectory)
//! and [`MessageStore`](crate::mail::MessageStore).
//!
//! Two variants are selected at construction:
//! - **memory**: records live in process memory (tests, demos)
//! - **json**: each collection is a JSON array in its own file
//!
//! Every write to a collection is serialized through one writer, so
//! concurrent appends never lose each other. Reads return independent
//! snapshots.

mod hook;
mod json;
mod memory;

pub use hook::{log_read_failure, ReadFailure, ReadFailureHook};
pub use json::JsonCollection;
pub use memory::MemoryCollection;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::mail::Message;
use crate::user::User;
use crate::{RelayError, Result};

/// Bounds shared by everything stored in a collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Record for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

enum Collection<T> {
    Memory(MemoryCollection<T>),
    Json(JsonCollection<T>),
}

impl<T: Record> Collection<T> {
    async fn snapshot(&self) -> Result<Vec<T>> {
        match self {
            Collection::Memory(c) => Ok(c.snapshot().await),
            Collection::Json(c) => c.snapshot().await,
        }
    }

    async fn append_if<F>(&self, record: T, check: F) -> Result<()>
    where
        F: FnOnce(&[T]) -> Result<()> + Send + 'static,
    {
        match self {
            Collection::Memory(c) => c.append_if(record, check).await,
            Collection::Json(c) => c.append_if(record, check).await,
        }
    }
}

/// Storage handle for users and messages.
///
/// Construct once and share it (for example through `Arc<Storage>`).
pub struct Storage {
    backend: StorageBackend,
    users: Collection<User>,
    messages: Collection<Message>,
}

impl Storage {
    /// Create an empty in-memory storage.
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            users: Collection::Memory(MemoryCollection::new()),
            messages: Collection::Memory(MemoryCollection::new()),
        }
    }

    /// Open storage as described by `config`, logging corrupt files.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        Self::open_with_hook(config, log_read_failure())
    }

    /// Open storage as described by `config` with a custom read-failure hook.
    ///
    /// The hook is ignored by the memory variant.
    pub fn open_with_hook(config: &StorageConfig, hook: ReadFailureHook) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Json => Self::open_json(config, hook),
        }
    }

    fn open_json(config: &StorageConfig, hook: ReadFailureHook) -> Result<Self> {
        config.validate()?;

        let users = JsonCollection::open("users", config.users_path(), config.on_corrupt, hook.clone())?;
        let messages =
            JsonCollection::open("messages", config.messages_path(), config.on_corrupt, hook)?;
        if users.path() == messages.path() {
            return Err(RelayError::Config(format!(
                "users and messages resolve to the same file {}",
                users.path().display()
            )));
        }

        info!(
            users = %users.path().display(),
            messages = %messages.path().display(),
            "Opening JSON storage"
        );

        Ok(Self {
            backend: StorageBackend::Json,
            users: Collection::Json(users),
            messages: Collection::Json(messages),
        })
    }

    /// The variant this storage was constructed as.
    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    /// Snapshot of all users in storage order.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.users.snapshot().await
    }

    /// Snapshot of all messages in storage order.
    pub async fn get_messages(&self) -> Result<Vec<Message>> {
        self.messages.snapshot().await
    }

    /// Append a user without any checks.
    pub async fn add_user(&self, user: User) -> Result<()> {
        self.users.append_if(user, |_| Ok(())).await
    }

    /// Append a message without any checks.
    pub async fn add_message(&self, message: Message) -> Result<()> {
        self.messages.append_if(message, |_| Ok(())).await
    }

    /// Append a user if `check` accepts the current users.
    ///
    /// `check` runs inside the users writer's critical section, so no other
    /// append can interleave between the check and the write.
    pub(crate) async fn add_user_if<F>(&self, user: User, check: F) -> Result<()>
    where
        F: FnOnce(&[User]) -> Result<()> + Send + 'static,
    {
        self.users.append_if(user, check).await
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("backend", &self.backend)
            .finish()
    }
}
