//! Port abstraction for project and membership persistence.
//!
//! Membership is a set relation. Adapters must make
//! [`ProjectRepository::toggle_membership`] a single atomic step so that
//! concurrent toggles never leave duplicate rows behind.
use async_trait::async_trait;

use crate::domain::{MembershipChange, NewProject, ProfileId, Project, ProjectId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

/// Storage of projects and their member sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project with an empty member set.
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError>;

    /// Project with `id`, if it exists.
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;

    /// First project carrying exactly this title, if any.
    async fn find_by_title(&self, title: &str) -> Result<Option<Project>, ProjectRepositoryError>;

    /// All projects in insertion order.
    async fn list_all(&self) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Projects owned or joined by `profile`, each once, in insertion order.
    async fn list_involving(
        &self,
        profile: ProfileId,
    ) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Persist title, description and tags. Ownership and membership are
    /// left untouched. Returns `false` when the project no longer exists.
    async fn update(&self, project: &Project) -> Result<bool, ProjectRepositoryError>;

    /// Delete a project and its memberships. Returns `false` when absent.
    async fn delete(&self, id: ProjectId) -> Result<bool, ProjectRepositoryError>;

    /// Flip `profile`'s membership. Returns `None` when the project is absent.
    async fn toggle_membership(
        &self,
        id: ProjectId,
        profile: ProfileId,
    ) -> Result<Option<MembershipChange>, ProjectRepositoryError>;

    /// Ensure `profile` is a member; adding an existing member is a no-op.
    async fn add_member(
        &self,
        id: ProjectId,
        profile: ProfileId,
    ) -> Result<(), ProjectRepositoryError>;
}
