//! Signed, time-limited bearer tokens.
//!
//! Tokens are self-contained HS256 JWTs carrying the subject user id and an
//! absolute expiry. Nothing is persisted and nothing can be revoked
//! server-side; logout in bearer deployments is client-side discard.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::error::Error;
use crate::domain::user::UserId;

/// Issuer claim stamped into and required from every token.
pub const TOKEN_ISSUER: &str = "ladle";

/// Default lifetime for issued tokens.
pub fn default_token_ttl() -> Duration {
    Duration::minutes(30)
}

/// Classified token validation failures.
///
/// The HTTP boundary must collapse all three to one generic unauthenticated
/// outcome; the split exists for logs and tests only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature did not verify against the server secret.
    #[error("token signature did not verify")]
    InvalidSignature,
    /// The encoded expiry is in the past.
    #[error("token has expired")]
    Expired,
    /// The token structure could not be decoded.
    #[error("token could not be decoded")]
    Malformed,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    exp: i64,
    iat: i64,
}

/// Issues and validates bearer tokens with a server-held secret.
pub struct AccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl AccessTokens {
    /// Build a token codec from the shared secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: "expired" means expired, also in tests.
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            validation,
        }
    }

    /// Mint a signed token for the given subject.
    pub fn issue(&self, subject: &UserId) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iss: TOKEN_ISSUER.to_owned(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|error| Error::internal(format!("token encoding failed: {error}")))
    }

    /// Verify a token and return the subject it was issued for.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|error| {
            match error.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;
        UserId::new(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn subject() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
    }

    #[test]
    fn issued_token_validates_before_expiry() {
        let tokens = AccessTokens::new(SECRET, Duration::minutes(30));
        let token = tokens.issue(&subject()).expect("token issues");
        let resolved = tokens.validate(&token).expect("token validates");
        assert_eq!(resolved, subject());
    }

    #[test]
    fn expired_token_is_classified_as_expired() {
        let tokens = AccessTokens::new(SECRET, Duration::minutes(-5));
        let token = tokens.issue(&subject()).expect("token issues");
        assert_eq!(
            tokens.validate(&token).expect_err("must fail"),
            TokenError::Expired
        );
    }

    #[test]
    fn foreign_signature_is_classified_as_invalid() {
        let ours = AccessTokens::new(SECRET, Duration::minutes(30));
        let theirs = AccessTokens::new(b"another-secret", Duration::minutes(30));
        let token = theirs.issue(&subject()).expect("token issues");
        assert_eq!(
            ours.validate(&token).expect_err("must fail"),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn garbage_is_classified_as_malformed() {
        let tokens = AccessTokens::new(SECRET, Duration::minutes(30));
        assert_eq!(
            tokens.validate("not.a.token").expect_err("must fail"),
            TokenError::Malformed
        );
        assert_eq!(
            tokens.validate("").expect_err("must fail"),
            TokenError::Malformed
        );
    }

    #[test]
    fn non_uuid_subject_is_classified_as_malformed() {
        let tokens = AccessTokens::new(SECRET, Duration::minutes(30));
        let claims = Claims {
            sub: "not-a-uuid".to_owned(),
            iss: TOKEN_ISSUER.to_owned(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("token encodes");
        assert_eq!(
            tokens.validate(&token).expect_err("must fail"),
            TokenError::Malformed
        );
    }
}
