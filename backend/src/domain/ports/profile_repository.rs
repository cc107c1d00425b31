//! Port abstraction for profile persistence.
use async_trait::async_trait;

use crate::domain::{IdentityId, NewProfile, Profile, ProfileDetails, ProfileId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// The identity already owns a profile.
        Duplicate { identity_id: i64 } => "identity {identity_id} already has a profile",
    }
}

/// Display name for a profile, used when listing owners and team members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    /// Profile id.
    pub id: ProfileId,
    /// Username of the owning identity.
    pub username: Username,
}

/// Storage of developer profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile owned by `identity_id`.
    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Insert a profile; fails with `Duplicate` when the identity has one.
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfileRepositoryError>;

    /// Replace the editable fields. Returns `None` when the profile is gone.
    async fn update(
        &self,
        id: ProfileId,
        details: &ProfileDetails,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Resolve usernames for the given profiles, in ascending id order.
    /// Unknown ids are skipped.
    async fn summaries(
        &self,
        ids: &[ProfileId],
    ) -> Result<Vec<ProfileSummary>, ProfileRepositoryError>;
}
