//! Builders wiring repositories into the services behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use crate::domain::ports::{
    IdentityRepository, ProfileRepository, ProjectRepository, TokenIssuer,
};
use crate::domain::{AccountService, ProjectService};
use crate::inbound::http::state::HttpState;
use crate::outbound::auth::Argon2Hasher;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselIdentityRepository, DieselProfileRepository, DieselProjectRepository,
};

use super::ServerConfig;

/// The three repositories every service set needs.
pub struct Repositories<I, P, R> {
    /// Identity storage.
    pub identities: Arc<I>,
    /// Profile storage.
    pub profiles: Arc<P>,
    /// Project and membership storage.
    pub projects: Arc<R>,
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore> {
    /// All three ports backed by one in-memory store.
    #[must_use]
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            identities: store.clone(),
            profiles: store.clone(),
            projects: store,
        }
    }
}

impl Repositories<DieselIdentityRepository, DieselProfileRepository, DieselProjectRepository> {
    /// Diesel repositories sharing `pool`.
    #[must_use]
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            identities: Arc::new(DieselIdentityRepository::new(pool.clone())),
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            projects: Arc::new(DieselProjectRepository::new(pool.clone())),
        }
    }
}

/// Build the handler state over `repositories`.
///
/// One [`AccountService`] serves both the account commands and bearer
/// authentication; one [`ProjectService`] serves commands and queries.
#[must_use]
pub fn build_http_state<I, P, R>(
    repositories: Repositories<I, P, R>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    I: IdentityRepository + 'static,
    P: ProfileRepository + 'static,
    R: ProjectRepository + 'static,
{
    let Repositories {
        identities,
        profiles,
        projects,
    } = repositories;
    let accounts = Arc::new(AccountService::new(
        identities,
        profiles.clone(),
        Arc::new(Argon2Hasher::new()),
        tokens,
        clock.clone(),
    ));
    let project_service = Arc::new(ProjectService::new(projects, profiles, clock));
    HttpState::new(accounts.clone(), accounts, project_service.clone(), project_service)
}

/// Pick Diesel repositories when a pool is configured, otherwise memory.
pub(crate) fn build_server_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if let Some(pool) = &config.db_pool {
        return build_http_state(Repositories::diesel(pool), config.tokens.clone(), clock);
    }
    warn!("no database configured; data is kept in memory and lost on restart");
    build_http_state(
        Repositories::in_memory(Arc::new(InMemoryStore::new())),
        config.tokens.clone(),
        clock,
    )
}
