//! User aggregate: identity, contact address, credentials digest, and role.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by the user value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The id string is not a valid UUID.
    InvalidId,
    /// The email address is blank.
    EmptyEmail,
    /// The email address does not look like `local@domain`.
    InvalidEmail,
    /// The display name is blank once trimmed.
    EmptyDisplayName,
    /// The display name exceeds the permitted length.
    DisplayNameTooLong {
        /// Maximum number of characters permitted.
        max: usize,
    },
    /// The role label is not a recognised variant.
    UnknownRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::UnknownRole => write!(f, "role must be either member or admin"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is the mail system's problem.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address used as the unique login handle.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lowercased on construction so
///   lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human-readable name shown next to recipes and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account privilege level.
///
/// Modelled as an explicit enum rather than a boolean so neither end of the
/// wire can disagree about which value means what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary account.
    Member,
    /// Elevated account.
    Admin,
}

impl Role {
    /// Stable label used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored label back into a role.
    pub fn parse(label: &str) -> Result<Self, UserValidationError> {
        match label {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque bcrypt digest of an account password.
///
/// Holds only the digest; the corresponding plaintext must never be stored or
/// logged. `Debug` output is redacted for the same reason.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest produced by the password hasher or read from storage.
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The stored digest string.
    pub fn digest(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Application user.
///
/// ## Invariants
/// - `email` is unique across the store; the repository enforces it.
/// - Users are never hard-deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    password_hash: PasswordHash,
    display_name: DisplayName,
    role: Role,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        password_hash: PasswordHash,
        display_name: DisplayName,
        role: Role,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            display_name,
            role,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password digest.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Privilege level.
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("not-an-email", UserValidationError::InvalidEmail)]
    #[case("two@@example.com", UserValidationError::InvalidEmail)]
    #[case("missing-domain@", UserValidationError::InvalidEmail)]
    fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw).expect_err("must fail"), expected);
    }

    #[rstest]
    #[case("U@Example.COM", "u@example.com")]
    #[case("  ada@example.com  ", "ada@example.com")]
    fn emails_normalise_case_and_whitespace(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[test]
    fn display_name_is_trimmed_and_bounded() {
        let name = DisplayName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada Lovelace");

        let too_long = "x".repeat(DISPLAY_NAME_MAX + 1);
        assert_eq!(
            DisplayName::new(too_long).expect_err("must fail"),
            UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            }
        );
    }

    #[rstest]
    #[case("member", Role::Member)]
    #[case("admin", Role::Admin)]
    fn role_labels_round_trip(#[case] label: &str, #[case] role: Role) {
        assert_eq!(Role::parse(label).expect("known label"), role);
        assert_eq!(role.as_str(), label);
    }

    #[test]
    fn unknown_role_label_is_rejected() {
        assert_eq!(
            Role::parse("superuser").expect_err("must fail"),
            UserValidationError::UnknownRole
        );
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::from_digest("$2b$12$abcdefghijklmnopqrstuv");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[test]
    fn invalid_user_id_is_rejected() {
        assert_eq!(
            UserId::new("not-a-uuid").expect_err("must fail"),
            UserValidationError::InvalidId
        );
    }
}
