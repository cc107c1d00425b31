//! Driving port for account lifecycle operations.
//!
//! Inbound adapters call [`AccountCommand`] to register, sign in, refresh
//! tokens, edit the caller's profile, and close an account.

use async_trait::async_trait;

use crate::domain::{
    Actor, EmailAddress, Error, IdentityId, LoginCredentials, Profile, ProfileDetails,
    Registration, TokenPair, Username,
};

/// Account created by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    /// New identity.
    pub identity_id: IdentityId,
    /// Registered login name.
    pub username: Username,
    /// Stored contact address.
    pub email: Option<EmailAddress>,
    /// Profile created with the identity.
    pub profile: Profile,
}

/// Result of a token login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Access and refresh tokens.
    pub tokens: TokenPair,
    /// The signed-in caller.
    pub actor: Actor,
}

/// Account use-cases driven by the inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an identity and its profile.
    ///
    /// # Errors
    /// `Conflict` when the username is taken.
    async fn register(&self, registration: Registration) -> Result<RegisteredAccount, Error>;

    /// Check credentials and return the resolved actor. Used by the page
    /// login, which keeps the identity in the session cookie.
    ///
    /// # Errors
    /// `Unauthorized` on unknown usernames or wrong passwords.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error>;

    /// Check credentials and issue an access/refresh token pair.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, Error>;

    /// Replace the caller's profile content.
    async fn update_profile(&self, actor: &Actor, details: ProfileDetails)
    -> Result<Profile, Error>;

    /// Delete the caller's identity, cascading to profile, owned projects and
    /// memberships.
    async fn delete_account(&self, actor: &Actor) -> Result<(), Error>;
}
