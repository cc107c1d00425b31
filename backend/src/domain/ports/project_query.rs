//! Driving port for project reads.

use async_trait::async_trait;

use crate::domain::{Actor, Error, ProfileId, Project, ProjectId};

use super::ProfileSummary;

/// Read-only project use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectQuery: Send + Sync {
    /// Every project, in insertion order.
    async fn list(&self) -> Result<Vec<Project>, Error>;

    /// One project.
    ///
    /// # Errors
    /// `NotFound` when no project has this id.
    async fn detail(&self, id: ProjectId) -> Result<Project, Error>;

    /// Projects the actor owns or has joined, each once.
    async fn my_projects(&self, actor: &Actor) -> Result<Vec<Project>, Error>;

    /// Usernames for owners and members shown alongside projects.
    async fn people(&self, ids: &[ProfileId]) -> Result<Vec<ProfileSummary>, Error>;
}
