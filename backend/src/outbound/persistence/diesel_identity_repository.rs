//! PostgreSQL-backed `IdentityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{EmailAddress, Identity, IdentityId, NewIdentity, PasswordDigest, Username};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{IdentityRow, NewIdentityRow};
use super::pool::DbPool;
use super::schema::identities;

/// Diesel-backed implementation of the `IdentityRepository` port.
///
/// Deleting an identity relies on the `ON DELETE CASCADE` foreign keys to
/// remove its profile, the projects it owns and every membership row.
#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: diesel::result::Error) -> IdentityRepositoryError {
    map_diesel_error(
        error,
        IdentityRepositoryError::query,
        IdentityRepositoryError::connection,
    )
}

fn row_to_identity(row: IdentityRow) -> Result<Identity, IdentityRepositoryError> {
    let username = Username::new(&row.username)
        .map_err(|err| IdentityRepositoryError::query(format!("stored username: {err}")))?;
    let email = EmailAddress::parse_optional(row.email.as_deref())
        .map_err(|err| IdentityRepositoryError::query(format!("stored email: {err}")))?;
    Ok(Identity {
        id: IdentityId::new(row.id),
        username,
        email,
        password_hash: PasswordDigest::new(row.password_hash),
        date_joined: row.date_joined,
    })
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;

        let row = NewIdentityRow {
            username: identity.username.as_ref(),
            email: identity.email.as_ref().map(AsRef::as_ref),
            password_hash: identity.password_hash.as_str(),
            date_joined: identity.date_joined,
        };

        let inserted: IdentityRow = diesel::insert_into(identities::table)
            .values(&row)
            .returning(IdentityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    IdentityRepositoryError::duplicate_username(identity.username.to_string())
                } else {
                    query_error(err)
                }
            })?;

        debug!(identity_id = inserted.id, "identity created");
        row_to_identity(inserted)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;

        identities::table
            .filter(identities::username.eq(username))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(row_to_identity)
            .transpose()
    }

    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;

        identities::table
            .find(id.get())
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(row_to_identity)
            .transpose()
    }

    async fn delete(&self, id: IdentityId) -> Result<bool, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;

        let deleted = diesel::delete(identities::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(deleted > 0)
    }
}
