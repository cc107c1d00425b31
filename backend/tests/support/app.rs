//! Full application over the in-memory store, plus request helpers.
#![expect(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::web;
use devmatch::inbound::http::health::HealthState;
use devmatch::inbound::http::state::HttpState;
use devmatch::outbound::auth::{JwtTokenIssuer, TokenLifetimes};
use devmatch::outbound::memory::InMemoryStore;
use devmatch::server::{AppDependencies, Repositories, build_app, build_http_state};
use mockable::DefaultClock;
use serde_json::{Value, json};
use zeroize::Zeroizing;

pub const PASSWORD: &str = "hunter22";

/// Handler state over a fresh store, returned with the store for
/// direct inspection.
pub fn memory_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let tokens = JwtTokenIssuer::new(
        &Zeroizing::new(b"integration-secret".to_vec()),
        TokenLifetimes::default(),
        Arc::new(DefaultClock),
    );
    let state = build_http_state(
        Repositories::in_memory(store.clone()),
        Arc::new(tokens),
        Arc::new(DefaultClock),
    );
    (state, store)
}

pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    test::init_service(build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }))
    .await
}

/// Send `req` and decode the JSON body; empty bodies decode as `null`.
pub async fn send<S>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Register `username` through the API and return its access token and
/// profile id.
pub async fn sign_up<S>(app: &S, username: &str) -> (String, i64)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, _) = send(
        app,
        TestRequest::post()
            .uri("/api/users/register/")
            .set_json(json!({"username": username, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}");

    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/users/login/")
            .set_json(json!({"username": username, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {username}");
    let access = body["access"].as_str().expect("access token").to_owned();
    let profile_id = body["profile"]["id"].as_i64().expect("profile id");
    (access, profile_id)
}

/// The `session` cookie set by `res`, if any.
pub fn session_cookie(res: &ServiceResponse<BoxBody>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
