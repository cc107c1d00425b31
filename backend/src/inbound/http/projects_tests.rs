//! Tests for project HTTP handlers.

use super::*;
use crate::domain::IdentityId;
use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};
use crate::inbound::http::validation::json_config;
use crate::test_support::{actor_with_profile, project_owned_by};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .service(list_projects)
                .service(create_project)
                .service(my_projects)
                .service(get_project)
                .service(replace_project)
                .service(patch_project)
                .service(delete_project)
                .service(join_project),
        )
}

/// Accept `Bearer good` as the actor with profile `id`.
fn signed_in_as(ports: &mut MockPorts, id: i64) {
    ports
        .auth
        .expect_identify_bearer()
        .return_once(move |_| Ok(IdentityId::new(id)));
    ports
        .auth
        .expect_resolve_actor()
        .return_once(move |_| Ok(actor_with_profile(id)));
}

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

#[actix_web::test]
async fn list_is_public() {
    let mut ports = MockPorts::default();
    ports
        .project_queries
        .expect_list()
        .return_once(|| Ok(vec![project_owned_by(1, 10), project_owned_by(2, 11)]));

    let (status, body) = send(ports, actix_test::TestRequest::get().uri("/api/projects/")).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|project| project["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Project 1"), json!("Project 2")]);
    assert_eq!(body[0]["created_by"], json!(10));
    assert_eq!(body[0]["members"], json!([]));
}

#[actix_web::test]
async fn create_stores_comma_separated_tags_verbatim() {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 4);
    ports
        .projects
        .expect_create()
        .withf(|actor, draft| {
            actor.profile.id.get() == 4
                && draft.tech_stack.as_slice() == ["Go", "Rust", "Rust"]
                && draft.needed_roles.as_slice() == ["Designer"]
        })
        .return_once(|actor, draft| {
            let mut project = project_owned_by(7, actor.profile.id.get());
            project.tech_stack = draft.tech_stack;
            project.needed_roles = draft.needed_roles;
            Ok(project)
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/projects/")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .set_json(json!({
                "title": "DevMatch",
                "description": "Match developers",
                "tech_stack": "Go, Rust, Rust",
                "needed_roles": ["Designer"]
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tech_stack"], json!(["Go", "Rust", "Rust"]));
    assert_eq!(body["created_by"], json!(4));
}

#[rstest]
#[case::blank_title(json!({"title": "  ", "description": "d"}), "title", "empty_title")]
#[case::blank_description(
    json!({"title": "t", "description": ""}),
    "description",
    "empty_description"
)]
#[actix_web::test]
async fn create_rejects_invalid_drafts(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 4);
    ports.projects.expect_create().never();

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/projects/")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], json!({"field": field, "code": code}));
}

#[actix_web::test]
async fn create_requires_authentication() {
    let mut ports = MockPorts::default();
    ports.projects.expect_create().never();

    let (status, _) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/projects/")
            .set_json(json!({"title": "t", "description": "d"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn my_projects_route_is_not_captured_by_detail() {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 2);
    ports
        .project_queries
        .expect_my_projects()
        .return_once(|_| Ok(vec![project_owned_by(3, 2)]));
    ports.project_queries.expect_detail().never();

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get()
            .uri("/api/projects/my/")
            .insert_header((AUTHORIZATION, "Bearer good")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], json!(3));
}

#[actix_web::test]
async fn missing_project_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .project_queries
        .expect_detail()
        .return_once(|_| Err(crate::domain::Error::not_found("project not found")));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/projects/99/"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}

#[actix_web::test]
async fn patch_only_sends_supplied_fields() {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 1);
    ports
        .projects
        .expect_update()
        .withf(|_, id, changes| {
            *id == ProjectId::new(5)
                && changes.title.is_none()
                && changes.description.is_none()
                && changes.tech_stack.is_none()
                && changes
                    .needed_roles
                    .as_ref()
                    .is_some_and(|roles| roles.as_slice() == ["Designer", "QA"])
        })
        .return_once(|_, _, changes| {
            let mut project = project_owned_by(5, 1);
            project.apply(changes);
            Ok(project)
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::patch()
            .uri("/api/projects/5/")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .set_json(json!({"needed_roles": "Designer, QA"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!("Project 5"));
    assert_eq!(body["needed_roles"], json!(["Designer", "QA"]));
}

#[actix_web::test]
async fn put_replaces_every_field() {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 1);
    ports
        .projects
        .expect_update()
        .withf(|_, _, changes| {
            changes
                .title
                .as_ref()
                .is_some_and(|title| title.as_ref() == "Renamed")
                && changes.tech_stack.as_ref().is_some_and(TagList::is_empty)
        })
        .return_once(|_, _, changes| {
            let mut project = project_owned_by(5, 1);
            project.apply(changes);
            Ok(project)
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::put()
            .uri("/api/projects/5/")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .set_json(json!({"title": "Renamed", "description": "New"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tech_stack"], json!([]));
    assert_eq!(body["description"], json!("New"));
}

fn forbidden() -> crate::domain::Error {
    crate::domain::Error::forbidden("You do not have permission to modify this project")
}

#[rstest]
#[case::update(actix_web::http::Method::PATCH)]
#[case::delete(actix_web::http::Method::DELETE)]
#[actix_web::test]
async fn non_owner_mutations_are_forbidden(#[case] method: actix_web::http::Method) {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 2);
    ports
        .projects
        .expect_update()
        .returning(|_, _, _| Err(forbidden()));
    ports
        .projects
        .expect_delete()
        .returning(|_, _| Err(forbidden()));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::default()
            .method(method)
            .uri("/api/projects/1/")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .set_json(json!({"title": "Hijacked"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("forbidden"));
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 1);
    ports
        .projects
        .expect_delete()
        .withf(|actor, id| actor.profile.id.get() == 1 && *id == ProjectId::new(5))
        .return_once(|_, _| Ok(()));

    let (status, _) = send(
        ports,
        actix_test::TestRequest::delete()
            .uri("/api/projects/5/")
            .insert_header((AUTHORIZATION, "Bearer good")),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[rstest]
#[case::joined(MembershipChange::Joined, "Joined project successfully")]
#[case::left(MembershipChange::Left, "Left project successfully")]
#[actix_web::test]
async fn join_reports_the_toggle_direction(
    #[case] change: MembershipChange,
    #[case] message: &str,
) {
    let mut ports = MockPorts::default();
    signed_in_as(&mut ports, 3);
    ports
        .projects
        .expect_toggle_membership()
        .withf(|actor, id| actor.profile.id.get() == 3 && *id == ProjectId::new(8))
        .return_once(move |_, _| Ok(change));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/projects/8/join/")
            .insert_header((AUTHORIZATION, "Bearer good")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": message}));
}

#[actix_web::test]
async fn anonymous_join_is_rejected_before_the_toggle() {
    let mut ports = MockPorts::default();
    ports.projects.expect_toggle_membership().never();

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/api/projects/8/join/"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        json!("Authentication credentials were not provided.")
    );
}
