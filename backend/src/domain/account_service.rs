//! Account domain service.
//!
//! Implements the [`AccountCommand`] and [`Authenticator`] driving ports over
//! the identity and profile repositories, a password hasher and a token
//! issuer. Profiles are created lazily here, in `resolve_actor`, so every
//! authenticated request reaches the project rules with a profile in hand.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, Authenticator, CredentialHasher, CredentialHasherError, IdentityRepository,
    IdentityRepositoryError, LoginOutcome, ProfileRepository, ProfileRepositoryError,
    RegisteredAccount, TokenError, TokenIssuer,
};
use crate::domain::{
    Actor, Error, ErrorCode, Identity, IdentityId, LoginCredentials, NewIdentity, NewProfile,
    Profile, ProfileDetails, Registration, TokenKind, TokenPair,
};

const PROFILE_NOT_FOUND: &str = "User profile not found";
const INVALID_CREDENTIALS: &str = "invalid credentials";
const UNKNOWN_ACCOUNT: &str = "account no longer exists";

/// Account service implementing the account driving ports.
pub struct AccountService<I, P> {
    identities: Arc<I>,
    profiles: Arc<P>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<I, P> AccountService<I, P> {
    /// Create a new service with the given adapters.
    #[must_use]
    pub const fn new(
        identities: Arc<I>,
        profiles: Arc<P>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            profiles,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<I, P> AccountService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    fn map_identity_error(error: IdentityRepositoryError) -> Error {
        match error {
            IdentityRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("identity repository unavailable: {message}"))
            }
            IdentityRepositoryError::Query { message } => {
                Error::internal(format!("identity repository error: {message}"))
            }
            IdentityRepositoryError::DuplicateUsername { .. } => Self::username_taken(),
        }
    }

    fn map_profile_error(error: ProfileRepositoryError) -> Error {
        match error {
            ProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            ProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile repository error: {message}"))
            }
            ProfileRepositoryError::Duplicate { .. } => {
                Error::conflict("a profile already exists for this user")
            }
        }
    }

    fn map_hasher_error(error: CredentialHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_token_error(error: TokenError) -> Error {
        if let TokenError::Signing { message } = &error {
            return Error::internal(format!("token signing failed: {message}"));
        }
        debug!(%error, "token rejected");
        Error::unauthorized("token is invalid or expired")
    }

    fn username_taken() -> Error {
        Error::conflict("A user with that username already exists.")
            .with_details(json!({ "field": "username", "code": "duplicate_username" }))
    }

    async fn find_identity(&self, id: IdentityId) -> Result<Option<Identity>, Error> {
        self.identities
            .find_by_id(id)
            .await
            .map_err(Self::map_identity_error)
    }

    /// Create the profile for `identity_id`.
    ///
    /// # Errors
    /// `Conflict` when the identity already owns a profile.
    pub async fn create_profile(
        &self,
        identity_id: IdentityId,
        details: ProfileDetails,
    ) -> Result<Profile, Error> {
        let new_profile = NewProfile {
            identity_id,
            details,
            created_at: self.clock.utc(),
        };
        let profile = self
            .profiles
            .insert(&new_profile)
            .await
            .map_err(Self::map_profile_error)?;
        info!(%identity_id, profile_id = %profile.id, "profile created");
        Ok(profile)
    }

    /// Return the identity's profile, creating a default one when missing.
    pub async fn get_or_create_profile(&self, identity_id: IdentityId) -> Result<Profile, Error> {
        if let Some(profile) = self
            .profiles
            .find_by_identity(identity_id)
            .await
            .map_err(Self::map_profile_error)?
        {
            return Ok(profile);
        }

        match self
            .create_profile(identity_id, ProfileDetails::default())
            .await
        {
            Ok(profile) => Ok(profile),
            Err(err) if err.code() == ErrorCode::Conflict => {
                // Lost a creation race; the winner's profile is now visible.
                self.profiles
                    .find_by_identity(identity_id)
                    .await
                    .map_err(Self::map_profile_error)?
                    .ok_or_else(|| Error::profile_not_found(PROFILE_NOT_FOUND))
            }
            Err(err) => Err(err),
        }
    }

    async fn actor_for(&self, identity: Identity) -> Result<Actor, Error> {
        let profile = self.get_or_create_profile(identity.id).await?;
        Ok(Actor {
            identity_id: identity.id,
            username: identity.username,
            profile,
        })
    }

    fn issue(&self, identity: IdentityId, kind: TokenKind) -> Result<String, Error> {
        self.tokens
            .issue(identity, kind)
            .map_err(Self::map_token_error)
    }
}

#[async_trait]
impl<I, P> AccountCommand for AccountService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    async fn register(&self, registration: Registration) -> Result<RegisteredAccount, Error> {
        if self
            .identities
            .find_by_username(registration.username().as_ref())
            .await
            .map_err(Self::map_identity_error)?
            .is_some()
        {
            return Err(Self::username_taken());
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(Self::map_hasher_error)?;
        let identity = self
            .identities
            .create(&NewIdentity {
                username: registration.username().clone(),
                email: registration.email().cloned(),
                password_hash,
                date_joined: self.clock.utc(),
            })
            .await
            .map_err(Self::map_identity_error)?;
        let profile = self
            .create_profile(identity.id, registration.profile().clone())
            .await?;

        info!(identity_id = %identity.id, username = %identity.username, "account registered");
        Ok(RegisteredAccount {
            identity_id: identity.id,
            username: identity.username,
            email: identity.email,
            profile,
        })
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error> {
        let Some(identity) = self
            .identities
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_identity_error)?
        else {
            debug!(username = credentials.username(), "login for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &identity.password_hash)
            .map_err(Self::map_hasher_error)?;
        if !matches {
            debug!(identity_id = %identity.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.actor_for(identity).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let actor = self.authenticate(credentials).await?;
        let tokens = TokenPair {
            access: self.issue(actor.identity_id, TokenKind::Access)?,
            refresh: self.issue(actor.identity_id, TokenKind::Refresh)?,
        };
        info!(identity_id = %actor.identity_id, "token pair issued");
        Ok(LoginOutcome { tokens, actor })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, Error> {
        let identity_id = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(Self::map_token_error)?;
        if self.find_identity(identity_id).await?.is_none() {
            return Err(Error::unauthorized("token is invalid or expired"));
        }
        self.issue(identity_id, TokenKind::Access)
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        details: ProfileDetails,
    ) -> Result<Profile, Error> {
        let profile = self
            .profiles
            .update(actor.profile.id, &details)
            .await
            .map_err(Self::map_profile_error)?
            .ok_or_else(|| Error::profile_not_found(PROFILE_NOT_FOUND))?;
        info!(profile_id = %profile.id, "profile updated");
        Ok(profile)
    }

    async fn delete_account(&self, actor: &Actor) -> Result<(), Error> {
        let deleted = self
            .identities
            .delete(actor.identity_id)
            .await
            .map_err(Self::map_identity_error)?;
        if !deleted {
            return Err(Error::not_found("account not found"));
        }
        info!(identity_id = %actor.identity_id, "account deleted");
        Ok(())
    }
}

#[async_trait]
impl<I, P> Authenticator for AccountService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    async fn identify_bearer(&self, token: &str) -> Result<IdentityId, Error> {
        self.tokens
            .verify(token, TokenKind::Access)
            .map_err(Self::map_token_error)
    }

    async fn resolve_actor(&self, identity_id: IdentityId) -> Result<Actor, Error> {
        let identity = self
            .find_identity(identity_id)
            .await?
            .ok_or_else(|| Error::unauthorized(UNKNOWN_ACCOUNT))?;
        self.actor_for(identity).await
    }
}
