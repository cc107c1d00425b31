//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Identity, IdentityId, NewIdentity};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by identity repository adapters.
    pub enum IdentityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "identity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already registered: {username}",
    }
}

/// Storage of login identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, IdentityRepositoryError>;

    /// Fetch an account by its exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Delete an account together with its profile, owned projects and
    /// memberships. Returns `false` when no such account existed.
    async fn delete(&self, id: IdentityId) -> Result<bool, IdentityRepositoryError>;
}
