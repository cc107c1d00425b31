//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.
//!
//! Members live in `project_members`, keyed by `(project_id, profile_id)`, so
//! the database enforces the set semantics. Membership toggles run in one
//! transaction: a delete that removes nothing is followed by an insert with
//! `ON CONFLICT DO NOTHING`.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{
    MembershipChange, NewProject, ProfileId, Project, ProjectDescription, ProjectId,
    ProjectTitle, ProjectValidationError, TagList,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MembershipRow, NewProjectRow, ProjectRow, ProjectUpdate};
use super::pool::DbPool;
use super::schema::{project_members, projects};

/// Diesel-backed implementation of the `ProjectRepository` port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: diesel::result::Error) -> ProjectRepositoryError {
    map_diesel_error(
        error,
        ProjectRepositoryError::query,
        ProjectRepositoryError::connection,
    )
}

fn row_to_project(
    row: ProjectRow,
    members: BTreeSet<ProfileId>,
) -> Result<Project, ProjectRepositoryError> {
    let stored = |err: ProjectValidationError| {
        ProjectRepositoryError::query(format!("stored project {}: {err}", row.id))
    };
    Ok(Project {
        id: ProjectId::new(row.id),
        title: ProjectTitle::new(&row.title).map_err(stored)?,
        description: ProjectDescription::new(row.description.as_str()).map_err(stored)?,
        tech_stack: TagList::from(row.tech_stack),
        needed_roles: TagList::from(row.needed_roles),
        created_by: ProfileId::new(row.created_by_id),
        members,
        created_at: row.created_at,
    })
}

/// Load member sets for `rows` with one query and assemble the projects.
async fn with_members(
    conn: &mut AsyncPgConnection,
    rows: Vec<ProjectRow>,
) -> Result<Vec<Project>, ProjectRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let memberships: Vec<MembershipRow> = project_members::table
        .filter(project_members::project_id.eq_any(&ids))
        .select(MembershipRow::as_select())
        .load(conn)
        .await
        .map_err(query_error)?;

    let mut members: BTreeMap<i64, BTreeSet<ProfileId>> = BTreeMap::new();
    for membership in memberships {
        members
            .entry(membership.project_id)
            .or_default()
            .insert(ProfileId::new(membership.profile_id));
    }

    rows.into_iter()
        .map(|row| {
            let set = members.remove(&row.id).unwrap_or_default();
            row_to_project(row, set)
        })
        .collect()
}

async fn project_exists(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<bool, diesel::result::Error> {
    diesel::select(diesel::dsl::exists(projects::table.find(id)))
        .get_result(conn)
        .await
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let draft = &project.draft;
        let row = NewProjectRow {
            title: draft.title.as_ref(),
            description: draft.description.as_ref(),
            tech_stack: draft.tech_stack.as_slice(),
            needed_roles: draft.needed_roles.as_slice(),
            created_by_id: project.created_by.get(),
            created_at: project.created_at,
        };

        let inserted: ProjectRow = diesel::insert_into(projects::table)
            .values(&row)
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(query_error)?;

        debug!(project_id = inserted.id, profile_id = inserted.created_by_id, "project inserted");
        row_to_project(inserted, BTreeSet::new())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let row: Option<ProjectRow> = projects::table
            .find(id.get())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;

        let Some(found) = row else {
            return Ok(None);
        };
        Ok(with_members(&mut conn, vec![found]).await?.pop())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::title.eq(title))
            .order(projects::id.asc())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;

        let Some(found) = row else {
            return Ok(None);
        };
        Ok(with_members(&mut conn, vec![found]).await?.pop())
    }

    async fn list_all(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let rows: Vec<ProjectRow> = projects::table
            .order(projects::id.asc())
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        with_members(&mut conn, rows).await
    }

    async fn list_involving(
        &self,
        profile: ProfileId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let joined = project_members::table
            .filter(project_members::profile_id.eq(profile.get()))
            .select(project_members::project_id);
        let rows: Vec<ProjectRow> = projects::table
            .filter(
                projects::created_by_id
                    .eq(profile.get())
                    .or(projects::id.eq_any(joined)),
            )
            .order(projects::id.asc())
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        with_members(&mut conn, rows).await
    }

    async fn update(&self, project: &Project) -> Result<bool, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let changes = ProjectUpdate {
            title: project.title.as_ref(),
            description: project.description.as_ref(),
            tech_stack: project.tech_stack.as_slice(),
            needed_roles: project.needed_roles.as_slice(),
        };

        let updated = diesel::update(projects::table.find(project.id.get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let deleted = diesel::delete(projects::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(deleted > 0)
    }

    async fn toggle_membership(
        &self,
        id: ProjectId,
        profile: ProfileId,
    ) -> Result<Option<MembershipChange>, ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        let membership = MembershipRow {
            project_id: id.get(),
            profile_id: profile.get(),
        };
        let change = conn
            .transaction(|conn| {
                async move {
                    if !project_exists(conn, membership.project_id).await? {
                        return Ok(None);
                    }
                    let removed = diesel::delete(
                        project_members::table.find((membership.project_id, membership.profile_id)),
                    )
                    .execute(conn)
                    .await?;
                    if removed > 0 {
                        return Ok(Some(MembershipChange::Left));
                    }
                    diesel::insert_into(project_members::table)
                        .values(&membership)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                    Ok(Some(MembershipChange::Joined))
                }
                .scope_boxed()
            })
            .await
            .map_err(query_error)?;

        debug!(project_id = %id, profile_id = %profile, ?change, "membership toggled");
        Ok(change)
    }

    async fn add_member(
        &self,
        id: ProjectId,
        profile: ProfileId,
    ) -> Result<(), ProjectRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))?;

        diesel::insert_into(project_members::table)
            .values(&MembershipRow {
                project_id: id.get(),
                profile_id: profile.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(title: &str) -> ProjectRow {
        ProjectRow {
            id: 5,
            title: title.to_owned(),
            description: "Pairing app".to_owned(),
            tech_stack: vec!["Go".to_owned(), "Rust".to_owned(), "Rust".to_owned()],
            needed_roles: Vec::new(),
            created_by_id: 2,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[rstest]
    fn rows_keep_duplicate_tags_and_members() {
        let members = BTreeSet::from([ProfileId::new(4), ProfileId::new(3)]);
        let project = row_to_project(row("DevMatch"), members).expect("valid row");
        assert_eq!(project.tech_stack.as_slice(), ["Go", "Rust", "Rust"]);
        assert_eq!(project.created_by, ProfileId::new(2));
        assert!(project.is_member(ProfileId::new(3)));
        assert!(!project.is_member(ProfileId::new(2)));
    }

    #[rstest]
    fn blank_stored_titles_are_query_errors() {
        let err = row_to_project(row("   "), BTreeSet::new()).expect_err("blank title");
        assert!(matches!(err, ProjectRepositoryError::Query { .. }));
    }
}
