//! Authentication payloads: login credentials and signup details.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{DisplayName, EmailAddress, UserValidationError};

/// Domain error returned when an auth payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The email field failed validation.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// The display name failed validation (signup only).
    DisplayName(UserValidationError),
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) => write!(f, "{inner}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::DisplayName(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised exactly like stored account emails.
/// - `password` must be non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons; the buffer is zeroised on drop.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup payload.
#[derive(Debug, Clone)]
pub struct SignupDetails {
    credentials: Credentials,
    display_name: DisplayName,
}

impl SignupDetails {
    /// Construct signup details from raw inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Self, AuthValidationError> {
        let credentials = Credentials::try_from_parts(email, password)?;
        let display_name =
            DisplayName::new(display_name).map_err(AuthValidationError::DisplayName)?;
        Ok(Self {
            credentials,
            display_name,
        })
    }

    /// Email and password for the new account.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }
}
