//! In-memory user directory implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{normalize_email, User, UserDirectory, UserId};
use crate::domain::DomainError;

/// In-memory implementation of UserDirectory. The real user base lives in
/// an external identity system; this stand-in is seeded with profiles and
/// mutated only through `add_user`, which mirrors an external registration
/// landing in the directory.
#[derive(Debug)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
    /// Index for normalized email -> user ID lookup
    email_index: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryUserDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a directory with initial profiles
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = HashMap::new();
        let mut email_map = HashMap::new();

        for user in users {
            let id = user.id().as_str().to_string();
            email_map.insert(normalize_email(user.email()), id.clone());
            users_map.insert(id, user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
            email_index: Arc::new(RwLock::new(email_map)),
        }
    }

    /// Record a profile that registered after the directory was built
    pub async fn add_user(&self, user: User) {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        let id = user.id().as_str().to_string();
        email_index.insert(normalize_email(user.email()), id.clone());
        users.insert(id, user);
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // add_user locks users before email_index; the index guard must be
        // released before the users map is locked.
        let user_id = self
            .email_index
            .read()
            .await
            .get(&normalize_email(email))
            .cloned();

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(id: &str, email: &str) -> User {
        User::new(UserId::new(id).unwrap(), email, format!("User {}", id))
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let directory =
            InMemoryUserDirectory::with_users(vec![create_test_user("alice", "alice@example.com")]);

        let found = directory
            .find_by_id(&UserId::new("alice").unwrap())
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().email(), "alice@example.com");

        let missing = directory
            .find_by_id(&UserId::new("nobody").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let directory =
            InMemoryUserDirectory::with_users(vec![create_test_user("alice", "alice@example.com")]);

        let found = directory.find_by_email("alice@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id().as_str(), "alice");

        let missing = directory.find_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let directory =
            InMemoryUserDirectory::with_users(vec![create_test_user("alice", "Alice@Example.com")]);

        let found = directory.find_by_email("alice@example.COM").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_add_user_after_build() {
        let directory = InMemoryUserDirectory::new();

        let missing = directory.find_by_email("bob@example.com").await.unwrap();
        assert!(missing.is_none());

        directory
            .add_user(create_test_user("bob", "bob@example.com"))
            .await;

        let found = directory.find_by_email("bob@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id().as_str(), "bob");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_and_lookup_make_progress() {
        let directory = Arc::new(InMemoryUserDirectory::with_users(vec![create_test_user(
            "alice",
            "alice@example.com",
        )]));

        // Email lookups racing registrations must not wedge on the two
        // directory locks, whichever side wins each race.
        let writer = {
            let directory = directory.clone();
            tokio::spawn(async move {
                for i in 0..500 {
                    directory
                        .add_user(create_test_user(
                            &format!("user{}", i),
                            &format!("user{}@example.com", i),
                        ))
                        .await;
                }
            })
        };
        let reader = {
            let directory = directory.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    let found = directory.find_by_email("alice@example.com").await.unwrap();
                    assert!(found.is_some());
                }
            })
        };

        tokio::time::timeout(std::time::Duration::from_secs(10), async {
            writer.await.unwrap();
            reader.await.unwrap();
        })
        .await
        .expect("concurrent add and lookup stalled");
    }
}
