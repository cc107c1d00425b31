//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: the same repositories over a mutex-guarded map, for tests
//!   and database-less runs
//! - **auth**: Argon2 password hashing and JWT bearer tokens
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod memory;
pub mod persistence;
