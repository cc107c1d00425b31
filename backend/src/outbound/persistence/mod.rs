//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories only translate between Diesel rows (`models.rs`) and domain
//! types; the row structs and `schema.rs` never leave this module. All
//! database errors are mapped to the port error of the repository.
//!
//! # Example
//!
//! ```ignore
//! use devmatch::outbound::persistence::{DbPool, DieselProjectRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/devmatch")).await?;
//! let projects = DieselProjectRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_identity_repository;
mod diesel_profile_repository;
mod diesel_project_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_identity_repository::DieselIdentityRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
