//! Session helpers to keep handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving an identity.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, IdentityId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    ///
    /// The session is renewed first so a pre-login cookie cannot be replayed.
    pub fn persist_identity(&self, identity_id: IdentityId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, identity_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if present.
    ///
    /// A cookie whose identity cannot be decoded reads as anonymous.
    #[must_use]
    pub fn identity_id(&self) -> Option<IdentityId> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(raw) => raw.map(IdentityId::new),
            Err(error) => {
                tracing::warn!(%error, "unreadable identity in session cookie");
                None
            }
        }
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    session.persist_identity(IdentityId::new(42))?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/tamper",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-number")
                        .expect("set tampered id");
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let body = session
                        .identity_id()
                        .map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
                    HttpResponse::Ok().body(body)
                }),
            )
    }

    async fn body_after(path: &str) -> String {
        let app = test::init_service(session_test_app()).await;
        let set_res =
            test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    #[actix_web::test]
    async fn round_trips_identity() {
        assert_eq!(body_after("/set").await, "42");
    }

    #[actix_web::test]
    async fn tampered_identity_reads_as_anonymous() {
        assert_eq!(body_after("/tamper").await, "anonymous");
    }

    #[actix_web::test]
    async fn missing_identity_reads_as_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        let body = test::read_body(res).await;
        assert_eq!(body, "anonymous");
    }
}
