//! Authentication boundary for HTTP handlers.
//!
//! [`Actor`] is an extractor: a handler that takes one only runs once the
//! caller is authenticated and their profile resolved. Bearer tokens win over
//! the session cookie so API clients never depend on page state.

use actix_session::SessionExt;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Actor, Error, ErrorCode, IdentityId};

use super::session::SessionContext;
use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// How the caller presented their identity.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Credential {
    Bearer(String),
    Session(IdentityId),
    Anonymous,
}

fn credential(req: &HttpRequest) -> Result<Credential, Error> {
    if let Some(header) = req.headers().get(AUTHORIZATION) {
        let raw = header
            .to_str()
            .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
        let token = raw
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
        return Ok(Credential::Bearer(token.to_owned()));
    }
    let session = SessionContext::new(req.get_session());
    Ok(session
        .identity_id()
        .map_or(Credential::Anonymous, Credential::Session))
}

fn state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

async fn resolve(state: &HttpState, credential: Credential) -> Result<Option<Actor>, Error> {
    let identity_id = match credential {
        Credential::Bearer(token) => state.auth.identify_bearer(&token).await?,
        Credential::Session(identity_id) => identity_id,
        Credential::Anonymous => return Ok(None),
    };
    state.auth.resolve_actor(identity_id).await.map(Some)
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared =
            state(req).and_then(|state| credential(req).map(|credential| (state, credential)));
        Box::pin(async move {
            let (state, credential) = prepared?;
            resolve(&state, credential)
                .await?
                .ok_or_else(|| Error::unauthorized("Authentication credentials were not provided."))
        })
    }
}

/// Actor when the caller is signed in, `None` for anonymous visitors.
///
/// A session pointing at an identity that no longer exists reads as
/// anonymous; a malformed bearer token is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalActor(pub Option<Actor>);

impl OptionalActor {
    /// Unwrap into the optional actor.
    #[must_use]
    pub fn into_inner(self) -> Option<Actor> {
        self.0
    }
}

impl FromRequest for OptionalActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared =
            state(req).and_then(|state| credential(req).map(|credential| (state, credential)));
        Box::pin(async move {
            let (state, credential) = prepared?;
            let from_session = matches!(credential, Credential::Session(_));
            match resolve(&state, credential).await {
                Ok(actor) => Ok(Self(actor)),
                Err(error) if from_session && error.code() == ErrorCode::Unauthorized => {
                    debug!(%error, "stale session treated as anonymous");
                    Ok(Self(None))
                }
                Err(error) => Err(error),
            }
        })
    }
}
