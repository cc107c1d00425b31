//! Driving port for project mutations.

use async_trait::async_trait;

use crate::domain::{
    Actor, Error, MembershipChange, Project, ProjectChanges, ProjectDraft, ProjectId,
};

/// Mutating project use-cases. Every operation requires an authenticated
/// [`Actor`]; adapters reject anonymous callers before reaching this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCommand: Send + Sync {
    /// Persist a draft owned by the actor, with no members.
    async fn create(&self, actor: &Actor, draft: ProjectDraft) -> Result<Project, Error>;

    /// Apply changes to a project the actor owns.
    ///
    /// # Errors
    /// `NotFound` for unknown projects, `Forbidden` for non-owners.
    async fn update(
        &self,
        actor: &Actor,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Project, Error>;

    /// Delete a project the actor owns.
    async fn delete(&self, actor: &Actor, id: ProjectId) -> Result<(), Error>;

    /// Join the project when not a member, leave it otherwise.
    async fn toggle_membership(
        &self,
        actor: &Actor,
        id: ProjectId,
    ) -> Result<MembershipChange, Error>;
}
