//! In-memory `UserRepository` adapter.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{EmailAddress, User, UserId};

/// Vector-backed user store enforcing the unique-email invariant.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("user store lock");
        if users.iter().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(
                user.email().to_string(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .lock()
            .expect("user store lock")
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .lock()
            .expect("user store lock")
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::user::{DisplayName, PasswordHash, Role};

    fn user(email: &str) -> User {
        User::new(
            UserId::random(),
            EmailAddress::new(email).expect("email"),
            PasswordHash::from_digest("$2b$04$fixture"),
            DisplayName::new("U").expect("name"),
            Role::Member,
        )
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::default();
        repo.insert(&user("u@example.com")).await.expect("first insert");
        let err = repo
            .insert(&user("u@example.com"))
            .await
            .expect_err("second insert must fail");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[tokio::test]
    async fn lookup_by_id_and_email() {
        let repo = InMemoryUserRepository::default();
        let stored = user("u@example.com");
        repo.insert(&stored).await.expect("insert");

        let by_id = repo.find_by_id(stored.id()).await.expect("query");
        assert_eq!(by_id.as_ref(), Some(&stored));

        let by_email = repo
            .find_by_email(stored.email())
            .await
            .expect("query");
        assert_eq!(by_email, Some(stored));

        let missing = repo.find_by_id(&UserId::random()).await.expect("query");
        assert!(missing.is_none());
    }
}
