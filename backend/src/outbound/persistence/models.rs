//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Repositories convert them at the edge.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{identities, profiles, project_members, projects};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdentityRow {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub(crate) struct NewIdentityRow<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub identity_id: i64,
    pub bio: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub availability_hours: i32,
    pub preferred_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub identity_id: i64,
    pub bio: &'a str,
    pub skills: &'a [String],
    pub interests: &'a [String],
    pub availability_hours: i32,
    pub preferred_roles: &'a [String],
    pub created_at: DateTime<Utc>,
}

/// Editable profile columns; every field is written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
pub(crate) struct ProfileUpdate<'a> {
    pub bio: &'a str,
    pub skills: &'a [String],
    pub interests: &'a [String],
    pub availability_hours: i32,
    pub preferred_roles: &'a [String],
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub needed_roles: Vec<String>,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub tech_stack: &'a [String],
    pub needed_roles: &'a [String],
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Content columns of a project. Ownership is never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
pub(crate) struct ProjectUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub tech_stack: &'a [String],
    pub needed_roles: &'a [String],
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MembershipRow {
    pub project_id: i64,
    pub profile_id: i64,
}
