//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O. The page adapter uses the
//! same bundle.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, Authenticator, ProjectCommand, ProjectQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and profile commands.
    pub accounts: Arc<dyn AccountCommand>,
    /// Bearer and session resolution.
    pub auth: Arc<dyn Authenticator>,
    /// Project mutations.
    pub projects: Arc<dyn ProjectCommand>,
    /// Project reads.
    pub project_queries: Arc<dyn ProjectQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    #[must_use]
    pub const fn new(
        accounts: Arc<dyn AccountCommand>,
        auth: Arc<dyn Authenticator>,
        projects: Arc<dyn ProjectCommand>,
        project_queries: Arc<dyn ProjectQuery>,
    ) -> Self {
        Self {
            accounts,
            auth,
            projects,
            project_queries,
        }
    }
}
