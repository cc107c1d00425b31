//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Login accounts. `username` is unique.
    identities (id) {
        id -> Int8,
        username -> Varchar,
        email -> Nullable<Varchar>,
        password_hash -> Text,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per identity, removed with it.
    profiles (id) {
        id -> Int8,
        identity_id -> Int8,
        bio -> Text,
        skills -> Array<Text>,
        interests -> Array<Text>,
        availability_hours -> Int4,
        preferred_roles -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects, removed with the owning profile.
    projects (id) {
        id -> Int8,
        title -> Varchar,
        description -> Text,
        tech_stack -> Array<Text>,
        needed_roles -> Array<Text>,
        created_by_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership set keyed by `(project_id, profile_id)`.
    project_members (project_id, profile_id) {
        project_id -> Int8,
        profile_id -> Int8,
    }
}

diesel::joinable!(profiles -> identities (identity_id));
diesel::joinable!(projects -> profiles (created_by_id));
diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(project_members -> profiles (profile_id));

diesel::allow_tables_to_appear_in_same_query!(identities, profiles, projects, project_members);
