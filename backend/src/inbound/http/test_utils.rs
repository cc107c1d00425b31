//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    MockAccountCommand, MockAuthenticator, MockProjectCommand, MockProjectQuery,
};

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
#[must_use]
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock bundle; unset expectations panic when called.
pub struct MockPorts {
    /// Account commands.
    pub accounts: MockAccountCommand,
    /// Bearer and session resolution.
    pub auth: MockAuthenticator,
    /// Project mutations.
    pub projects: MockProjectCommand,
    /// Project reads.
    pub project_queries: MockProjectQuery,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            accounts: MockAccountCommand::new(),
            auth: MockAuthenticator::new(),
            projects: MockProjectCommand::new(),
            project_queries: MockProjectQuery::new(),
        }
    }
}

impl MockPorts {
    /// Handler state over the mocks.
    #[must_use]
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.auth),
            Arc::new(self.projects),
            Arc::new(self.project_queries),
        )
    }
}

/// State whose only configured port is the authenticator.
#[must_use]
pub fn state_with_auth(auth: MockAuthenticator) -> HttpState {
    MockPorts {
        auth,
        ..MockPorts::default()
    }
    .into_state()
}
