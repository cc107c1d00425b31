//! Account identities: the login principal behind every profile.
//!
//! Usernames follow the conventional web-framework rules: up to 150
//! characters drawn from letters, digits and `@.+-_`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::FieldViolation;

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;

/// Validation errors for identity fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Permitted maximum.
        max: usize,
    },
    /// Username contained a character outside the permitted set.
    #[error("username may contain only letters, digits and @/./+/-/_")]
    InvalidUsernameCharacter,
    /// Email address was not plausibly formed.
    #[error("enter a valid email address")]
    InvalidEmail,
}

impl From<IdentityValidationError> for FieldViolation {
    fn from(value: IdentityValidationError) -> Self {
        let (field, code) = match &value {
            IdentityValidationError::EmptyUsername => ("username", "empty_username"),
            IdentityValidationError::UsernameTooLong { .. } => ("username", "username_too_long"),
            IdentityValidationError::InvalidUsernameCharacter => {
                ("username", "invalid_username")
            }
            IdentityValidationError::InvalidEmail => ("email", "invalid_email"),
        };
        Self::new(field, code, value.to_string())
    }
}

/// Stable identifier of an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct IdentityId(i64);

impl IdentityId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated username.
///
/// ## Invariants
/// - Trimmed, non-empty and at most [`USERNAME_MAX`] characters.
/// - Only letters, digits or one of `@.+-_`.
///
/// # Examples
/// ```
/// use devmatch::domain::Username;
///
/// let name = Username::new("  alice_dev ").unwrap();
/// assert_eq!(name.as_ref(), "alice_dev");
/// assert!(Username::new("bad name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "alice_dev")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    ///
    /// # Errors
    /// [`IdentityValidationError`] when the name is blank, too long or
    /// carries a forbidden character.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(IdentityValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let permitted = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !trimmed.chars().all(permitted) {
            return Err(IdentityValidationError::InvalidUsernameCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Optional contact address. Only shape is checked, never deliverability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "alice@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an address of the form `local@domain`.
    ///
    /// # Errors
    /// [`IdentityValidationError::InvalidEmail`] for anything else.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.as_ref().trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !trimmed.chars().any(char::is_whitespace) =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(IdentityValidationError::InvalidEmail),
        }
    }

    /// Parse optional form input; blank text means "no address".
    ///
    /// # Errors
    /// As [`EmailAddress::new`] for non-blank input.
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, IdentityValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::new(value).map(Some),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Encoded password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an already-encoded hash.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Database identifier.
    pub id: IdentityId,
    /// Unique login name.
    pub username: Username,
    /// Optional contact address.
    pub email: Option<EmailAddress>,
    /// Argon2 digest of the password.
    pub password_hash: PasswordDigest,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
}

/// Account awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    /// Requested login name.
    pub username: Username,
    /// Optional contact address.
    pub email: Option<EmailAddress>,
    /// Argon2 digest of the password.
    pub password_hash: PasswordDigest,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
}
