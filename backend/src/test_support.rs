//! Shared fixtures for unit tests inside the crate.
//!
//! Only compiled for `cargo test`. Integration tests under `tests/` build
//! their fixtures through the public API instead.

use std::collections::BTreeSet;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Actor, IdentityId, Profile, ProfileDetails, ProfileId, Project, ProjectDescription, ProjectId,
    ProjectTitle, TagList, Username,
};

/// Fixed instant every fixture clock reports.
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at [`fixture_now`].
pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Default for FixtureClock {
    fn default() -> Self {
        Self {
            utc_now: fixture_now(),
        }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Profile with default details owned by `identity_id`.
pub(crate) fn profile_for(profile_id: i64, identity_id: i64) -> Profile {
    Profile {
        id: ProfileId::new(profile_id),
        identity_id: IdentityId::new(identity_id),
        details: ProfileDetails::default(),
        created_at: fixture_now(),
    }
}

/// Actor whose profile and identity share the id `profile_id`.
pub(crate) fn actor_with_profile(profile_id: i64) -> Actor {
    Actor {
        identity_id: IdentityId::new(profile_id),
        username: Username::new(format!("user{profile_id}")).expect("fixture username"),
        profile: profile_for(profile_id, profile_id),
    }
}

/// Project titled `Project {id}` owned by `owner` with no members.
pub(crate) fn project_owned_by(id: i64, owner: i64) -> Project {
    Project {
        id: ProjectId::new(id),
        title: ProjectTitle::new(format!("Project {id}")).expect("fixture title"),
        description: ProjectDescription::new("Fixture project").expect("fixture description"),
        tech_stack: TagList::parse("Rust"),
        needed_roles: TagList::parse("Designer"),
        created_by: ProfileId::new(owner),
        members: BTreeSet::new(),
        created_at: fixture_now(),
    }
}
