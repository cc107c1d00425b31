//! In-memory repositories for tests and database-less runs.
//!
//! [`InMemoryStore`] implements the identity, profile and project
//! repositories over one mutex-guarded state, so the cascade on identity
//! deletion and the membership toggle are each a single critical section.
//! Identifiers are assigned from per-table counters starting at 1.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    IdentityRepository, IdentityRepositoryError, ProfileRepository, ProfileRepositoryError,
    ProfileSummary, ProjectRepository, ProjectRepositoryError,
};
use crate::domain::{
    Identity, IdentityId, MembershipChange, NewIdentity, NewProfile, NewProject, Profile,
    ProfileDetails, ProfileId, Project, ProjectId,
};

#[derive(Debug, Default)]
struct StoreState {
    identities: BTreeMap<IdentityId, Identity>,
    profiles: BTreeMap<ProfileId, Profile>,
    projects: BTreeMap<ProjectId, Project>,
    next_identity: i64,
    next_profile: i64,
    next_project: i64,
}

impl StoreState {
    fn profile_of(&self, identity: IdentityId) -> Option<&Profile> {
        self.profiles
            .values()
            .find(|profile| profile.identity_id == identity)
    }

    /// Remove a profile together with owned projects and its memberships.
    fn remove_profile(&mut self, id: ProfileId) {
        self.profiles.remove(&id);
        self.projects.retain(|_, project| project.created_by != id);
        for project in self.projects.values_mut() {
            project.members.remove(&id);
        }
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Shared in-memory backing store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, IdentityRepositoryError> {
        let mut state = self.lock().map_err(IdentityRepositoryError::connection)?;
        if state
            .identities
            .values()
            .any(|existing| existing.username == identity.username)
        {
            return Err(IdentityRepositoryError::duplicate_username(
                identity.username.to_string(),
            ));
        }
        let id = IdentityId::new(next_id(&mut state.next_identity));
        let created = Identity {
            id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            password_hash: identity.password_hash.clone(),
            date_joined: identity.date_joined,
        };
        state.identities.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let state = self.lock().map_err(IdentityRepositoryError::connection)?;
        Ok(state
            .identities
            .values()
            .find(|identity| identity.username.as_ref() == username)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let state = self.lock().map_err(IdentityRepositoryError::connection)?;
        Ok(state.identities.get(&id).cloned())
    }

    async fn delete(&self, id: IdentityId) -> Result<bool, IdentityRepositoryError> {
        let mut state = self.lock().map_err(IdentityRepositoryError::connection)?;
        if state.identities.remove(&id).is_none() {
            return Ok(false);
        }
        if let Some(profile) = state.profile_of(id).map(|profile| profile.id) {
            state.remove_profile(profile);
        }
        debug!(identity_id = %id, "identity removed with dependants");
        Ok(true)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let state = self.lock().map_err(ProfileRepositoryError::connection)?;
        Ok(state.profile_of(identity_id).cloned())
    }

    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfileRepositoryError> {
        let mut state = self.lock().map_err(ProfileRepositoryError::connection)?;
        if !state.identities.contains_key(&profile.identity_id) {
            return Err(ProfileRepositoryError::query(format!(
                "identity {} does not exist",
                profile.identity_id
            )));
        }
        if state.profile_of(profile.identity_id).is_some() {
            return Err(ProfileRepositoryError::duplicate(profile.identity_id.get()));
        }
        let id = ProfileId::new(next_id(&mut state.next_profile));
        let created = Profile {
            id,
            identity_id: profile.identity_id,
            details: profile.details.clone(),
            created_at: profile.created_at,
        };
        state.profiles.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: ProfileId,
        details: &ProfileDetails,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut state = self.lock().map_err(ProfileRepositoryError::connection)?;
        Ok(state.profiles.get_mut(&id).map(|profile| {
            profile.details = details.clone();
            profile.clone()
        }))
    }

    async fn summaries(
        &self,
        ids: &[ProfileId],
    ) -> Result<Vec<ProfileSummary>, ProfileRepositoryError> {
        let state = self.lock().map_err(ProfileRepositoryError::connection)?;
        let wanted: BTreeSet<ProfileId> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| {
                let profile = state.profiles.get(&id)?;
                let identity = state.identities.get(&profile.identity_id)?;
                Some(ProfileSummary {
                    id,
                    username: identity.username.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::connection)?;
        if !state.profiles.contains_key(&project.created_by) {
            return Err(ProjectRepositoryError::query(format!(
                "profile {} does not exist",
                project.created_by
            )));
        }
        let id = ProjectId::new(next_id(&mut state.next_project));
        let draft = project.draft.clone();
        let created = Project {
            id,
            title: draft.title,
            description: draft.description,
            tech_stack: draft.tech_stack,
            needed_roles: draft.needed_roles,
            created_by: project.created_by,
            members: BTreeSet::new(),
            created_at: project.created_at,
        };
        state.projects.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::connection)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Project>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::connection)?;
        Ok(state
            .projects
            .values()
            .find(|project| project.title.as_ref() == title)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::connection)?;
        Ok(state.projects.values().cloned().collect())
    }

    async fn list_involving(
        &self,
        profile: ProfileId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::connection)?;
        Ok(state
            .projects
            .values()
            .filter(|project| project.involves(profile))
            .cloned()
            .collect())
    }

    async fn update(&self, project: &Project) -> Result<bool, ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::connection)?;
        let Some(stored) = state.projects.get_mut(&project.id) else {
            return Ok(false);
        };
        stored.title = project.title.clone();
        stored.description = project.description.clone();
        stored.tech_stack = project.tech_stack.clone();
        stored.needed_roles = project.needed_roles.clone();
        Ok(true)
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::connection)?;
        Ok(state.projects.remove(&id).is_some())
    }

    async fn toggle_membership(
        &self,
        id: ProjectId,
        profile: ProfileId,
    ) -> Result<Option<MembershipChange>, ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::connection)?;
        let Some(project) = state.projects.get_mut(&id) else {
            return Ok(None);
        };
        let change = if project.members.remove(&profile) {
            MembershipChange::Left
        } else {
            project.members.insert(profile);
            MembershipChange::Joined
        };
        Ok(Some(change))
    }

    async fn add_member(
        &self,
        id: ProjectId,
        profile: ProfileId,
    ) -> Result<(), ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::connection)?;
        let project = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| ProjectRepositoryError::query(format!("project {id} does not exist")))?;
        project.members.insert(profile);
        Ok(())
    }
}
