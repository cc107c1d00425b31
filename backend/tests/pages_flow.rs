//! Browser-style flow through the rendered pages using the session cookie.

#[path = "support/app.rs"]
mod app_support;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test::{self, TestRequest};
use app_support::{init_app, memory_state, send, session_cookie};
use rstest::rstest;

fn location(res: &actix_web::dev::ServiceResponse) -> Option<String> {
    res.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[rstest]
#[actix_web::test]
async fn signed_up_visitor_creates_and_joins_through_pages() {
    let (state, _) = memory_state();
    let app = init_app(state).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/register/")
            .set_form([
                ("username", "page_user"),
                ("email", "page@example.com"),
                ("password1", "demo123"),
                ("password2", "demo123"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res).as_deref(), Some("/"));
    let cookie = session_cookie(&res).expect("session cookie");

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/create/")
            .cookie(cookie.clone())
            .set_form([
                ("title", "Page Project"),
                ("description", "Made in a browser"),
                ("tech_stack_raw", "Rust, HTMX"),
                ("needed_roles_raw", ""),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let detail = location(&res).expect("redirect to detail");
    assert!(detail.starts_with('/') && detail.ends_with('/'), "{detail}");

    let body = test::call_and_read_body(
        &app,
        TestRequest::get().uri(&detail).cookie(cookie.clone()).to_request(),
    )
    .await;
    let html = String::from_utf8(body.to_vec()).expect("utf-8 page");
    assert!(html.contains("Page Project"));
    assert!(html.contains("HTMX"));

    // The JSON API accepts the same cookie.
    let (status, mine) = send(
        &app,
        TestRequest::get().uri("/api/projects/my/").cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["title"], "Page Project");
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("/create/")]
#[case("/my/")]
#[case("/users/profile/")]
#[actix_web::test]
async fn anonymous_visitors_are_sent_to_login(#[case] path: &str) {
    let (state, _) = memory_state();
    let app = init_app(state).await;

    let res = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        location(&res),
        Some(format!("/users/login/?next={path}"))
    );
}

#[rstest]
#[actix_web::test]
async fn project_list_is_public() {
    let (state, _) = memory_state();
    let app = init_app(state).await;

    let res = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn session_of_a_deleted_account_reads_as_signed_out() {
    let (state, _) = memory_state();
    let app = init_app(state).await;
    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/register/")
            .set_form([
                ("username", "short_stay"),
                ("email", ""),
                ("password1", "demo123"),
                ("password2", "demo123"),
            ])
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&res).expect("session cookie");

    let (status, _) = send(
        &app,
        TestRequest::delete().uri("/api/users/me/").cookie(cookie.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/").cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/my/").cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(location(&res).as_deref(), Some("/users/login/?next=/my/"));

    let (status, body) = send(
        &app,
        TestRequest::get().uri("/api/projects/my/").cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}
