//! Credential resolution for protected operations.
//!
//! One gate serves both deployment variants: self-contained bearer tokens
//! and server-side cookie sessions. Handlers depend on the gate alone and
//! never branch on the mechanism.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::UserRepository;
use crate::domain::token::AccessTokens;
use crate::domain::user::{User, UserId};

use super::repo_errors::map_user_persistence_error;

/// Which credential mechanism signup/login hand out.
///
/// The gate itself tolerates either credential on incoming requests; the
/// mode decides what gets minted, so one mechanism is active per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: Bearer <token>`; logout is client-side discard.
    Bearer,
    /// Signed session cookie; logout clears the server-tracked session.
    CookieSession,
}

impl AuthMode {
    /// Parse a configuration label.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "bearer" => Some(Self::Bearer),
            "cookie" => Some(Self::CookieSession),
            _ => None,
        }
    }
}

/// Credentials extracted from one incoming request.
///
/// Both fields may be present; the gate applies bearer-first precedence.
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials {
    /// Raw token from the `Authorization: Bearer` header, if any.
    pub bearer: Option<String>,
    /// User id recovered from the signed session cookie, if any.
    pub session_user: Option<UserId>,
}

/// Uniform message for every resolution failure.
const UNAUTHENTICATED: &str = "authentication required";

/// Resolves request credentials to a concrete user record.
///
/// Every failure mode (missing credential, bad signature, expiry, unknown
/// subject) collapses to the same unauthenticated error so callers cannot
/// probe which check failed. The specific cause is logged at debug level.
pub struct AuthGate {
    tokens: Arc<AccessTokens>,
    users: Arc<dyn UserRepository>,
}

impl AuthGate {
    /// Build the gate from the token codec and user repository.
    pub fn new(tokens: Arc<AccessTokens>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Resolve the caller or fail with a uniform unauthenticated error.
    pub async fn resolve(&self, credentials: &RequestCredentials) -> Result<User, Error> {
        let subject = self.subject_of(credentials)?;

        let user = self
            .users
            .find_by_id(&subject)
            .await
            .map_err(map_user_persistence_error)?;

        user.ok_or_else(|| {
            tracing::debug!(%subject, "credential subject does not resolve to a user");
            Error::unauthorized(UNAUTHENTICATED)
        })
    }

    /// Pick the subject id from the presented credentials, bearer first.
    fn subject_of(&self, credentials: &RequestCredentials) -> Result<UserId, Error> {
        if let Some(token) = credentials.bearer.as_deref() {
            return self.tokens.validate(token).map_err(|error| {
                tracing::debug!(%error, "bearer token rejected");
                Error::unauthorized(UNAUTHENTICATED)
            });
        }
        credentials
            .session_user
            .ok_or_else(|| Error::unauthorized(UNAUTHENTICATED))
    }
}
