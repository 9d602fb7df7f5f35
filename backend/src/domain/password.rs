//! One-way password hashing built on bcrypt.
//!
//! Hashing and verification run on the blocking thread pool so the
//! deliberately expensive digest computation never stalls the async runtime.
//! The plaintext is moved into the blocking task and dropped there; it is
//! never logged or persisted.

use crate::domain::error::Error;
use crate::domain::user::PasswordHash;

/// Salted, slow password hasher.
///
/// The cost factor is configurable so tests can use the cheapest setting
/// while production keeps the bcrypt default.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Hasher with an explicit bcrypt cost factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hasher with the minimum cost bcrypt accepts (4). Test use only;
    /// digests produced this way are not suitable for real credentials.
    pub fn fast_for_tests() -> Self {
        Self::with_cost(4)
    }

    /// Digest a plaintext password.
    pub async fn hash(&self, plaintext: &str) -> Result<PasswordHash, Error> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|error| Error::internal(format!("hashing task failed: {error}")))?
            .map_err(|error| Error::internal(format!("password hashing failed: {error}")))?;
        Ok(PasswordHash::from_digest(digest))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Returns `false` for a mismatch; a corrupt digest is reported as an
    /// internal error rather than a mismatch so operators can notice it.
    pub async fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, Error> {
        let plaintext = plaintext.to_owned();
        let digest = hash.digest().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
            .await
            .map_err(|error| Error::internal(format!("hashing task failed: {error}")))?
            .map_err(|error| Error::internal(format!("password verification failed: {error}")))
    }
}
