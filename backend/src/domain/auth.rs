//! Authentication primitives: login credentials, registrations and tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::identity::{EmailAddress, IdentityValidationError, Username};
use super::profile::ProfileDetails;
use super::validation::FieldViolation;

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl From<LoginValidationError> for FieldViolation {
    fn from(value: LoginValidationError) -> Self {
        let (field, code) = match &value {
            LoginValidationError::EmptyUsername => ("username", "empty_username"),
            LoginValidationError::EmptyPassword => ("password", "empty_password"),
        };
        Self::new(field, code, value.to_string())
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use devmatch::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice_dev", "demo123").unwrap();
/// assert_eq!(creds.username(), "alice_dev");
/// assert_eq!(creds.password(), "demo123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    /// [`LoginValidationError`] when either part is empty.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors raised while building a [`Registration`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Username or email failed validation.
    #[error(transparent)]
    Identity(#[from] IdentityValidationError),
    /// Password is shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// Password and confirmation differ.
    #[error("the two password fields didn't match")]
    PasswordMismatch,
}

impl From<RegistrationValidationError> for FieldViolation {
    fn from(value: RegistrationValidationError) -> Self {
        let message = value.to_string();
        match value {
            RegistrationValidationError::Identity(inner) => inner.into(),
            RegistrationValidationError::PasswordTooShort { .. } => {
                Self::new("password", "password_too_short", message)
            }
            RegistrationValidationError::PasswordMismatch => {
                Self::new("password_confirmation", "password_mismatch", message)
            }
        }
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: Option<EmailAddress>,
    password: Zeroizing<String>,
    profile: ProfileDetails,
}

impl Registration {
    /// Validate sign-up input. Blank email text means "no address".
    ///
    /// # Errors
    /// [`RegistrationValidationError`] naming the first rejected field.
    pub fn try_new(
        username: &str,
        email: Option<&str>,
        password: &str,
        profile: ProfileDetails,
    ) -> Result<Self, RegistrationValidationError> {
        let name = Username::new(username)?;
        let address = EmailAddress::parse_optional(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username: name,
            email: address,
            password: Zeroizing::new(password.to_owned()),
            profile,
        })
    }

    /// Validate a form submission that repeats the password.
    ///
    /// # Errors
    /// As [`Registration::try_new`], plus
    /// [`RegistrationValidationError::PasswordMismatch`].
    pub fn try_new_confirmed(
        username: &str,
        email: Option<&str>,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let registration = Self::try_new(username, email, password, ProfileDetails::default())?;
        if password != confirmation {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        Ok(registration)
    }

    /// Requested login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address, if one was given.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Plain-text password, zeroed on drop.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Initial profile fields.
    #[must_use]
    pub const fn profile(&self) -> &ProfileDetails {
        &self.profile
    }
}

/// Purpose of a bearer token; refresh tokens cannot authorise requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived token that authorises API requests.
    Access,
    /// Long-lived token exchanged for a new access token.
    Refresh,
}

impl TokenKind {
    /// Claim value embedded in issued tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Access and refresh tokens issued together at login.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Encoded access token.
    pub access: String,
    /// Encoded refresh token.
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenPair(..)")
    }
}
