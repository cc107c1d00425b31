//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError, ProfileSummary};
use crate::domain::{
    IdentityId, NewProfile, Profile, ProfileDetails, ProfileId, TagList, Username,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewProfileRow, ProfileRow, ProfileUpdate};
use super::pool::DbPool;
use super::schema::{identities, profiles};

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

fn row_to_profile(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    let details = ProfileDetails::try_new(
        row.bio,
        TagList::from(row.skills),
        TagList::from(row.interests),
        Some(row.availability_hours),
        TagList::from(row.preferred_roles),
    )
    .map_err(|err| ProfileRepositoryError::query(format!("stored profile {}: {err}", row.id)))?;
    Ok(Profile {
        id: ProfileId::new(row.id),
        identity_id: IdentityId::new(row.identity_id),
        details,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProfileRepositoryError::connection))?;

        profiles::table
            .filter(profiles::identity_id.eq(identity_id.get()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(row_to_profile)
            .transpose()
    }

    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProfileRepositoryError::connection))?;

        let details = &profile.details;
        let row = NewProfileRow {
            identity_id: profile.identity_id.get(),
            bio: details.bio(),
            skills: details.skills().as_slice(),
            interests: details.interests().as_slice(),
            availability_hours: details.availability_hours(),
            preferred_roles: details.preferred_roles().as_slice(),
            created_at: profile.created_at,
        };

        let inserted: ProfileRow = diesel::insert_into(profiles::table)
            .values(&row)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ProfileRepositoryError::duplicate(profile.identity_id.get())
                } else {
                    query_error(err)
                }
            })?;

        debug!(profile_id = inserted.id, identity_id = inserted.identity_id, "profile created");
        row_to_profile(inserted)
    }

    async fn update(
        &self,
        id: ProfileId,
        details: &ProfileDetails,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProfileRepositoryError::connection))?;

        let changes = ProfileUpdate {
            bio: details.bio(),
            skills: details.skills().as_slice(),
            interests: details.interests().as_slice(),
            availability_hours: details.availability_hours(),
            preferred_roles: details.preferred_roles().as_slice(),
        };

        diesel::update(profiles::table.find(id.get()))
            .set(&changes)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(row_to_profile)
            .transpose()
    }

    async fn summaries(
        &self,
        ids: &[ProfileId],
    ) -> Result<Vec<ProfileSummary>, ProfileRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProfileRepositoryError::connection))?;

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<(i64, String)> = profiles::table
            .inner_join(identities::table)
            .filter(profiles::id.eq_any(&raw_ids))
            .order(profiles::id.asc())
            .select((profiles::id, identities::username))
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        rows.into_iter()
            .map(|(id, username)| {
                let username = Username::new(&username).map_err(|err| {
                    ProfileRepositoryError::query(format!("stored username: {err}"))
                })?;
                Ok(ProfileSummary {
                    id: ProfileId::new(id),
                    username,
                })
            })
            .collect()
    }
}
