//! Account lifecycle use-cases: signup and login.
//!
//! Both operations end with a freshly minted bearer token; the HTTP adapter
//! decides whether to hand the token to the client or to persist a session
//! cookie instead, depending on the deployment's auth mode.

use std::sync::Arc;

use crate::domain::auth::{Credentials, SignupDetails};
use crate::domain::error::Error;
use crate::domain::password::PasswordHasher;
use crate::domain::ports::UserRepository;
use crate::domain::repo_errors::map_user_persistence_error;
use crate::domain::token::AccessTokens;
use crate::domain::user::{Role, User, UserId};

/// Uniform message for every credential failure; the cause stays in logs.
const BAD_CREDENTIALS: &str = "invalid email or password";

/// Outcome of a successful signup or login.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    /// The authenticated account.
    pub user: User,
    /// Signed bearer token for the account.
    pub token: String,
}

/// Signup/login service over the user repository.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: Arc<AccessTokens>,
}

impl AccountService {
    /// Build the service from its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        tokens: Arc<AccessTokens>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new member account and mint its first token.
    ///
    /// A duplicate email surfaces as a conflict; every other repository
    /// failure maps to the generic availability/internal codes.
    pub async fn signup(&self, details: &SignupDetails) -> Result<IssuedCredentials, Error> {
        let credentials = details.credentials();
        let password_hash = self.hasher.hash(credentials.password()).await?;
        let user = User::new(
            UserId::random(),
            credentials.email().clone(),
            password_hash,
            details.display_name().clone(),
            Role::Member,
        );

        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;

        let token = self.tokens.issue(user.id())?;
        Ok(IssuedCredentials { user, token })
    }

    /// Authenticate stored credentials and mint a token.
    ///
    /// An unknown email and a wrong password produce the same error; callers
    /// learn nothing about which check failed.
    pub async fn login(&self, credentials: &Credentials) -> Result<IssuedCredentials, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::unauthorized(BAD_CREDENTIALS))?;

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await?;
        if !matches {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(user.id())?;
        Ok(IssuedCredentials { user, token })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for signup/login semantics.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;
    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::UserPersistenceError;
    use crate::domain::user::EmailAddress;

    #[derive(Default)]
    struct StubUserRepository {
        users: Mutex<Vec<User>>,
        fail_with: Mutex<Option<UserPersistenceError>>,
    }

    impl StubUserRepository {
        fn set_failure(&self, failure: UserPersistenceError) {
            *self.fail_with.lock().expect("state lock") = Some(failure);
        }

        fn stored(&self) -> Vec<User> {
            self.users.lock().expect("state lock").clone()
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
            if let Some(failure) = self.fail_with.lock().expect("state lock").clone() {
                return Err(failure);
            }
            let mut users = self.users.lock().expect("state lock");
            if users.iter().any(|u| u.email() == user.email()) {
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
                .expect("state lock")
                .iter()
                .find(|u| u.id() == id)
                .cloned())
        }

        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Option<User>, UserPersistenceError> {
            if let Some(failure) = self.fail_with.lock().expect("state lock").clone() {
                return Err(failure);
            }
            Ok(self
                .users
                .lock()
                .expect("state lock")
                .iter()
                .find(|u| u.email() == email)
                .cloned())
        }
    }

    fn service(users: Arc<StubUserRepository>) -> AccountService {
        AccountService::new(
            users,
            PasswordHasher::fast_for_tests(),
            Arc::new(AccessTokens::new(b"test-secret", Duration::minutes(30))),
        )
    }

    fn signup_details() -> SignupDetails {
        SignupDetails::try_from_parts("u@example.com", "pw123", "U").expect("valid signup")
    }

    #[tokio::test]
    async fn signup_stores_member_with_hashed_password() {
        let users = Arc::new(StubUserRepository::default());
        let issued = service(users.clone())
            .signup(&signup_details())
            .await
            .expect("signup succeeds");

        assert!(!issued.token.is_empty());
        assert_eq!(issued.user.role(), Role::Member);

        let stored = users.stored();
        assert_eq!(stored.len(), 1);
        let account = stored.first().expect("one account");
        assert_eq!(account.email().as_ref(), "u@example.com");
        assert_ne!(account.password_hash().digest(), "pw123");
    }

    #[tokio::test]
    async fn duplicate_signup_is_a_conflict() {
        let users = Arc::new(StubUserRepository::default());
        let svc = service(users);
        svc.signup(&signup_details()).await.expect("first signup");
        let err = svc
            .signup(&signup_details())
            .await
            .expect_err("second signup must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn login_round_trips_after_signup() {
        let users = Arc::new(StubUserRepository::default());
        let svc = service(users);
        svc.signup(&signup_details()).await.expect("signup");

        let creds = Credentials::try_from_parts("u@example.com", "pw123").expect("credentials");
        let issued = svc.login(&creds).await.expect("login succeeds");
        assert_eq!(issued.user.email().as_ref(), "u@example.com");
    }

    #[rstest]
    #[case("u@example.com", "wrong-password")]
    #[case("other@example.com", "pw123")]
    #[tokio::test]
    async fn login_failures_are_uniform(#[case] email: &str, #[case] password: &str) {
        let users = Arc::new(StubUserRepository::default());
        let svc = service(users);
        svc.signup(&signup_details()).await.expect("signup");

        let creds = Credentials::try_from_parts(email, password).expect("credentials");
        let err = svc.login(&creds).await.expect_err("login must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), BAD_CREDENTIALS);
    }

    #[rstest]
    #[case(
        UserPersistenceError::connection("refused"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_map_to_generic_codes(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let users = Arc::new(StubUserRepository::default());
        users.set_failure(failure);
        let svc = service(users);

        let creds = Credentials::try_from_parts("u@example.com", "pw123").expect("credentials");
        let err = svc.login(&creds).await.expect_err("login must fail");
        assert_eq!(err.code(), expected);
    }
}
