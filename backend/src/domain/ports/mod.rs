//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, tokens) are implemented by outbound
//! adapters. Driving ports (commands and queries) are implemented by domain
//! services and consumed by the HTTP and page adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod authenticator;
mod credential_hasher;
mod identity_repository;
mod profile_repository;
mod project_command;
mod project_query;
mod project_repository;
mod token_issuer;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginOutcome, RegisteredAccount};
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use identity_repository::MockIdentityRepository;
pub use identity_repository::{IdentityRepository, IdentityRepositoryError};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError, ProfileSummary};
#[cfg(test)]
pub use project_command::MockProjectCommand;
pub use project_command::ProjectCommand;
#[cfg(test)]
pub use project_query::MockProjectQuery;
pub use project_query::ProjectQuery;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
