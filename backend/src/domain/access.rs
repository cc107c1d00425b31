//! Access and membership rules over projects and profiles.
//!
//! These are pure functions: services load the records, ask these rules, and
//! only then touch a repository.

use serde::Serialize;
use utoipa::ToSchema;

use super::identity::{IdentityId, Username};
use super::profile::Profile;
use super::project::Project;

/// Authenticated caller with a resolved profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Identity that presented the credential.
    pub identity_id: IdentityId,
    /// Login name of that identity.
    pub username: Username,
    /// Profile owned by the identity.
    pub profile: Profile,
}

impl Actor {
    /// Whether this actor may edit or delete `project`.
    #[must_use]
    pub fn can_modify(&self, project: &Project) -> bool {
        can_modify(&self.profile, project)
    }
}

/// Edit/delete permission: only the owning profile may modify a project.
#[must_use]
pub fn can_modify(profile: &Profile, project: &Project) -> bool {
    project.is_owner(profile.id)
}

/// Direction of a membership toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    /// The actor was not a member and now is.
    Joined,
    /// The actor was a member and no longer is.
    Left,
}

impl MembershipChange {
    /// Transition for an actor whose current membership is `is_member`.
    #[must_use]
    pub const fn from_membership(is_member: bool) -> Self {
        if is_member { Self::Left } else { Self::Joined }
    }

    /// Confirmation message reported to API clients.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Joined => "Joined project successfully",
            Self::Left => "Left project successfully",
        }
    }
}
