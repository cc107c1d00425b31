//! Domain primitives, rules and services.
//!
//! Purpose: define the accounts, profiles and projects the application works
//! with, the membership and ownership rules over them, and the services that
//! implement the driving ports. Nothing here depends on HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Project / Profile / Identity: the persisted entities.
//! - AccountService / ProjectService: implementations of the driving ports.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod demo_data;
pub mod error;
pub mod identity;
pub mod ports;
pub mod profile;
pub mod project;
pub mod project_service;
pub mod tags;
pub mod trace_id;
pub mod validation;

pub use self::access::{Actor, MembershipChange, can_modify};
pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError, TokenKind, TokenPair,
};
pub use self::demo_data::{DemoDataError, DemoDataSeeder, DemoSeedOutcome};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{
    EmailAddress, Identity, IdentityId, IdentityValidationError, NewIdentity, PasswordDigest,
    Username,
};
pub use self::profile::{
    DEFAULT_AVAILABILITY_HOURS, NewProfile, Profile, ProfileDetails, ProfileId,
    ProfileValidationError,
};
pub use self::project::{
    NewProject, Project, ProjectChanges, ProjectDescription, ProjectDraft, ProjectId,
    ProjectTitle, ProjectValidationError,
};
pub use self::project_service::ProjectService;
pub use self::tags::{TagInput, TagList, parse_tags, serialize_tags};
pub use self::trace_id::TraceId;
pub use self::validation::FieldViolation;
