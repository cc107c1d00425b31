//! Project domain service.
//!
//! Implements [`ProjectCommand`] and [`ProjectQuery`]. Ownership checks run
//! against the freshly loaded project before any write reaches the
//! repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ProfileRepository, ProfileRepositoryError, ProfileSummary, ProjectCommand, ProjectQuery,
    ProjectRepository, ProjectRepositoryError,
};
use crate::domain::{
    Actor, Error, MembershipChange, NewProject, ProfileId, Project, ProjectChanges, ProjectDraft,
    ProjectId,
};

const PROJECT_NOT_FOUND: &str = "project not found";

/// Project service implementing the project driving ports.
pub struct ProjectService<R, P> {
    projects: Arc<R>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<R, P> ProjectService<R, P> {
    /// Create a new service over the given repositories.
    #[must_use]
    pub const fn new(projects: Arc<R>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects,
            profiles,
            clock,
        }
    }
}

impl<R, P> ProjectService<R, P>
where
    R: ProjectRepository,
    P: ProfileRepository,
{
    fn map_project_error(error: ProjectRepositoryError) -> Error {
        match error {
            ProjectRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("project repository unavailable: {message}"))
            }
            ProjectRepositoryError::Query { message } => {
                Error::internal(format!("project repository error: {message}"))
            }
        }
    }

    fn map_profile_error(error: ProfileRepositoryError) -> Error {
        match error {
            ProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            other => Error::internal(format!("profile repository error: {other}")),
        }
    }

    async fn load(&self, id: ProjectId) -> Result<Project, Error> {
        self.projects
            .find_by_id(id)
            .await
            .map_err(Self::map_project_error)?
            .ok_or_else(|| Error::not_found(PROJECT_NOT_FOUND))
    }

    async fn load_modifiable(&self, actor: &Actor, id: ProjectId) -> Result<Project, Error> {
        let project = self.load(id).await?;
        if !actor.can_modify(&project) {
            info!(
                project_id = %id,
                profile_id = %actor.profile.id,
                "modification refused for non-owner"
            );
            return Err(Error::forbidden(
                "You do not have permission to modify this project",
            ));
        }
        Ok(project)
    }
}

#[async_trait]
impl<R, P> ProjectCommand for ProjectService<R, P>
where
    R: ProjectRepository,
    P: ProfileRepository,
{
    async fn create(&self, actor: &Actor, draft: ProjectDraft) -> Result<Project, Error> {
        let project = self
            .projects
            .insert(&NewProject {
                draft,
                created_by: actor.profile.id,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(Self::map_project_error)?;
        info!(project_id = %project.id, profile_id = %actor.profile.id, "project created");
        Ok(project)
    }

    async fn update(
        &self,
        actor: &Actor,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Project, Error> {
        let mut project = self.load_modifiable(actor, id).await?;
        project.apply(changes);
        let found = self
            .projects
            .update(&project)
            .await
            .map_err(Self::map_project_error)?;
        if !found {
            return Err(Error::not_found(PROJECT_NOT_FOUND));
        }
        info!(project_id = %id, "project updated");
        Ok(project)
    }

    async fn delete(&self, actor: &Actor, id: ProjectId) -> Result<(), Error> {
        self.load_modifiable(actor, id).await?;
        let deleted = self
            .projects
            .delete(id)
            .await
            .map_err(Self::map_project_error)?;
        if !deleted {
            return Err(Error::not_found(PROJECT_NOT_FOUND));
        }
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    async fn toggle_membership(
        &self,
        actor: &Actor,
        id: ProjectId,
    ) -> Result<MembershipChange, Error> {
        let change = self
            .projects
            .toggle_membership(id, actor.profile.id)
            .await
            .map_err(Self::map_project_error)?
            .ok_or_else(|| Error::not_found(PROJECT_NOT_FOUND))?;
        info!(
            project_id = %id,
            profile_id = %actor.profile.id,
            change = ?change,
            "membership toggled"
        );
        Ok(change)
    }
}

#[async_trait]
impl<R, P> ProjectQuery for ProjectService<R, P>
where
    R: ProjectRepository,
    P: ProfileRepository,
{
    async fn list(&self) -> Result<Vec<Project>, Error> {
        self.projects
            .list_all()
            .await
            .map_err(Self::map_project_error)
    }

    async fn detail(&self, id: ProjectId) -> Result<Project, Error> {
        self.load(id).await
    }

    async fn my_projects(&self, actor: &Actor) -> Result<Vec<Project>, Error> {
        self.projects
            .list_involving(actor.profile.id)
            .await
            .map_err(Self::map_project_error)
    }

    async fn people(&self, ids: &[ProfileId]) -> Result<Vec<ProfileSummary>, Error> {
        self.profiles
            .summaries(ids)
            .await
            .map_err(Self::map_profile_error)
    }
}
