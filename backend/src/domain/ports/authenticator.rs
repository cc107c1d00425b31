//! Driving port used at the authentication boundary of every inbound adapter.
//!
//! Adapters extract either a bearer token or a session identity, then ask
//! [`Authenticator::resolve_actor`] for an [`Actor`]. Resolution is the single
//! place where a missing profile is created.

use async_trait::async_trait;

use crate::domain::{Actor, Error, IdentityId};

/// Turns bearer tokens and session identities into an [`Actor`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify an access token and return the identity it was issued to.
    ///
    /// # Errors
    /// `Unauthorized` for malformed, expired or refresh tokens.
    async fn identify_bearer(&self, token: &str) -> Result<IdentityId, Error>;

    /// Load the identity and get-or-create its profile.
    ///
    /// # Errors
    /// `Unauthorized` when the identity no longer exists.
    async fn resolve_actor(&self, identity_id: IdentityId) -> Result<Actor, Error>;
}
