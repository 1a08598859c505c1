//! Concurrency tests for mailrelay.
//!
//! These tests verify that concurrent appends to the same collection are
//! serialized: no write is lost and email uniqueness holds under races.

use std::sync::Arc;

use mailrelay::config::StorageConfig;
use mailrelay::{Message, MessageStore, RelayError, Storage, User, UserDirectory};
use tempfile::TempDir;

const NUM_TASKS: usize = 16;

fn open_json_storage(dir: &TempDir) -> Arc<Storage> {
    Arc::new(Storage::open(&StorageConfig::json(dir.path())).unwrap())
}

/// Register `NUM_TASKS` distinct users concurrently and return how many succeeded.
async fn register_distinct(storage: &Arc<Storage>) -> usize {
    let mut handles = Vec::new();
    for i in 0..NUM_TASKS {
        let storage = Arc::clone(storage);
        handles.push(tokio::spawn(async move {
            UserDirectory::new(&storage)
                .register(User::new(format!("User {i}"), format!("user{i}@example.org")))
                .await
        }));
    }

    let mut success_count = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            success_count += 1;
        }
    }
    success_count
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_json() {
    let dir = TempDir::new().unwrap();
    let storage = open_json_storage(&dir);

    let success_count = register_distinct(&storage).await;

    assert_eq!(success_count, NUM_TASKS, "All registrations should succeed");
    assert_eq!(
        UserDirectory::new(&storage).list().await.unwrap().len(),
        NUM_TASKS,
        "No registration should be lost"
    );

    // The file on disk agrees after reopening.
    let reopened = open_json_storage(&dir);
    assert_eq!(reopened.get_users().await.unwrap().len(), NUM_TASKS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_memory() {
    let storage = Arc::new(Storage::in_memory());

    let success_count = register_distinct(&storage).await;

    assert_eq!(success_count, NUM_TASKS);
    assert_eq!(storage.get_users().await.unwrap().len(), NUM_TASKS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_email_registers_once() {
    let dir = TempDir::new().unwrap();
    let storage = open_json_storage(&dir);

    let mut handles = Vec::new();
    for i in 0..NUM_TASKS {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            UserDirectory::new(&storage)
                .register(User::new(format!("Clone {i}"), "same@example.org"))
                .await
        }));
    }

    let mut success_count = 0;
    let mut duplicate_count = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => success_count += 1,
            Err(RelayError::DuplicateEmail(email)) => {
                assert_eq!(email, "same@example.org");
                duplicate_count += 1;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(success_count, 1);
    assert_eq!(duplicate_count, NUM_TASKS - 1);
    assert_eq!(storage.get_users().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_message_append_json() {
    let dir = TempDir::new().unwrap();
    let storage = open_json_storage(&dir);
    {
        let directory = UserDirectory::new(&storage);
        directory.register(User::new("A", "a@a")).await.unwrap();
        directory.register(User::new("B", "b@b")).await.unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..NUM_TASKS {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            MessageStore::new(&storage)
                .append(Message::new(format!("Subject {i}"), "body", "a@a", "b@b"))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let messages = MessageStore::new(&storage).list().await.unwrap();
    assert_eq!(messages.len(), NUM_TASKS);

    let mut subjects: Vec<String> = messages.into_iter().map(|m| m.subject).collect();
    subjects.sort();
    subjects.dedup();
    assert_eq!(subjects.len(), NUM_TASKS, "Every message is stored exactly once");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reads_during_writes_never_see_partial_file() {
    let dir = TempDir::new().unwrap();
    let storage = open_json_storage(&dir);

    let writer = {
        let storage = Arc::clone(&storage);
        tokio::spawn(async move { register_distinct(&storage).await })
    };

    let mut last_len = 0;
    while !writer.is_finished() {
        let len = storage.get_users().await.unwrap().len();
        assert!(len >= last_len, "Snapshots never go backwards");
        last_len = len;
        tokio::task::yield_now().await;
    }

    assert_eq!(writer.await.unwrap(), NUM_TASKS);
    assert_eq!(storage.get_users().await.unwrap().len(), NUM_TASKS);
}
