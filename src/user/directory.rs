//! User directory for mailrelay.

use tracing::{debug, info};

use crate::storage::Storage;
use crate::{RelayError, Result};

use super::types::User;

/// Uniqueness-enforcing view of the users collection.
pub struct UserDirectory<'a> {
    storage: &'a Storage,
}

impl<'a> UserDirectory<'a> {
    /// Create a new UserDirectory over the given storage.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new user.
    ///
    /// The uniqueness check and the append happen under the users writer
    /// lock, so concurrent registrations of one email admit exactly one.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DuplicateEmail`] if the email is already
    /// registered; storage is left unchanged.
    pub async fn register(&self, user: User) -> Result<()> {
        let email = user.email.clone();
        let taken = email.clone();

        self.storage
            .add_user_if(user, move |existing| {
                if existing.iter().any(|u| u.email == taken) {
                    Err(RelayError::DuplicateEmail(taken))
                } else {
                    Ok(())
                }
            })
            .await
            .inspect_err(|e| debug!(email = %email, error = %e, "Registration rejected"))?;

        info!(email = %email, "User registered");
        Ok(())
    }

    /// Find a user by exact email.
    pub async fn lookup(&self, email: &str) -> Result<Option<User>> {
        let users = self.storage.get_users().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Check whether an email is registered.
    pub async fn exists(&self, email: &str) -> Result<bool> {
        Ok(self.lookup(email).await?.is_some())
    }

    /// List all users ordered ascending by email.
    pub async fn list(&self) -> Result<Vec<User>> {
        let mut users = self.storage.get_users().await?;
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let storage = Storage::in_memory();
        let directory = UserDirectory::new(&storage);

        directory
            .register(User::new("Ivan Pupkin", "pupkin@x"))
            .await
            .unwrap();

        let user = directory.lookup("pupkin@x").await.unwrap().unwrap();
        assert_eq!(user, User::new("Ivan Pupkin", "pupkin@x"));
        assert_eq!(
            directory.list().await.unwrap(),
            vec![User::new("Ivan Pupkin", "pupkin@x")]
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let storage = Storage::in_memory();
        let directory = UserDirectory::new(&storage);

        directory.register(User::new("A", "dup@x")).await.unwrap();
        let result = directory.register(User::new("B", "dup@x")).await;

        assert!(matches!(result, Err(RelayError::DuplicateEmail(ref e)) if e == "dup@x"));
        let users = directory.list().await.unwrap();
        assert_eq!(users, vec![User::new("A", "dup@x")]);
    }

    #[tokio::test]
    async fn test_register_same_name_different_email() {
        let storage = Storage::in_memory();
        let directory = UserDirectory::new(&storage);

        directory.register(User::new("Bob", "bob@gmail.com")).await.unwrap();
        directory.register(User::new("Bob", "bob@yandex.ru")).await.unwrap();

        assert_eq!(directory.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let storage = Storage::in_memory();
        let directory = UserDirectory::new(&storage);

        directory.register(User::new("John", "John@example.org")).await.unwrap();
        directory.register(User::new("john", "john@example.org")).await.unwrap();

        assert!(directory.lookup("JOHN@example.org").await.unwrap().is_none());
        assert!(directory.exists("John@example.org").await.unwrap());
        assert_eq!(directory.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_unknown() {
        let storage = Storage::in_memory();
        let directory = UserDirectory::new(&storage);

        assert!(directory.lookup("notregistered@ya.ru").await.unwrap().is_none());
        assert!(!directory.exists("notregistered@ya.ru").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_sorted_by_email() {
        let storage = Storage::in_memory();
        let directory = UserDirectory::new(&storage);

        directory
            .register(User::new("BBB_First User", "1st@example.org"))
            .await
            .unwrap();
        directory
            .register(User::new("AAA_Second User", "2nd@random.email"))
            .await
            .unwrap();
        directory.register(User::new("Zed", "0@z")).await.unwrap();

        let emails: Vec<String> = directory
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["0@z", "1st@example.org", "2nd@random.email"]);

        // Storage order is untouched.
        let stored = storage.get_users().await.unwrap();
        assert_eq!(stored[0].email, "1st@example.org");
        assert_eq!(stored[2].email, "0@z");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let storage = Storage::in_memory();
        assert!(UserDirectory::new(&storage).list().await.unwrap().is_empty());
    }
}
