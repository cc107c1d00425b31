//! Account pages: register, login, logout and the profile form.
//!
//! Successful sign-in stores the identity id in the session cookie; the
//! `OptionalActor` extractor reads it back on later requests.

use actix_web::{HttpRequest, get, post, route, web};
use minijinja::context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{ErrorCode, LoginCredentials, Profile, ProfileDetails, Registration, TagList};
use crate::inbound::http::auth::OptionalActor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

use super::{FormErrors, PageResult, page, redirect, require_actor, safe_next, viewer_name};

const BAD_LOGIN: &str = "Please enter a correct username and password.";

/// Sign-up form; the password is typed twice.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Requested login name.
    pub username: String,
    /// Optional contact address.
    pub email: String,
    /// Chosen password.
    pub password1: String,
    /// Password typed again.
    pub password2: String,
}

/// Values echoed back into the sign-up form. Passwords are never echoed.
#[derive(Debug, Default, Serialize)]
struct RegisterEcho<'a> {
    username: &'a str,
    email: &'a str,
}

/// Sign-in form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Login name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Local path to return to.
    pub next: Option<String>,
}

/// `?next=` on the sign-in page.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    /// Local path to return to.
    pub next: Option<String>,
}

/// Profile form with comma-separated tag fields.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileForm {
    /// About the developer.
    pub bio: String,
    /// Comma-separated skills.
    pub skills_raw: String,
    /// Comma-separated interests.
    pub interests_raw: String,
    /// Hours per week as typed.
    pub availability_hours: String,
    /// Comma-separated roles.
    pub preferred_roles_raw: String,
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        let details = &profile.details;
        Self {
            bio: details.bio().to_owned(),
            skills_raw: details.skills().to_raw(),
            interests_raw: details.interests().to_raw(),
            availability_hours: details.availability_hours().to_string(),
            preferred_roles_raw: details.preferred_roles().to_raw(),
        }
    }
}

impl ProfileForm {
    fn to_details(&self, errors: &mut FormErrors) -> Option<ProfileDetails> {
        let hours = match self.availability_hours.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    errors.insert("availability_hours", "Enter a whole number.");
                    return None;
                }
            },
        };
        match ProfileDetails::try_new(
            self.bio.as_str(),
            TagList::parse(&self.skills_raw),
            TagList::parse(&self.interests_raw),
            hours,
            TagList::parse(&self.preferred_roles_raw),
        ) {
            Ok(details) => Some(details),
            Err(err) => {
                let violation = crate::domain::FieldViolation::from(err);
                errors.insert(violation.field(), violation.message());
                None
            }
        }
    }
}

/// Sign-up form.
#[get("/users/register/")]
pub async fn register_form(OptionalActor(viewer): OptionalActor) -> PageResult {
    page(
        "register.html",
        context! {
            viewer => viewer_name(viewer.as_ref()),
            form => RegisterEcho::default(),
            errors => FormErrors::default(),
        },
    )
}

/// Register and sign in, or re-render the form with field errors.
#[post("/users/register/")]
pub async fn register_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    web::Form(form): web::Form<RegisterForm>,
) -> PageResult {
    let mut errors = FormErrors::default();
    let registration = Registration::try_new_confirmed(
        &form.username,
        Some(form.email.as_str()),
        &form.password1,
        &form.password2,
    )
    .map_err(field_error);
    match registration {
        Ok(registration) => match state.accounts.register(registration).await {
            Ok(account) => {
                session.persist_identity(account.identity_id)?;
                info!(identity_id = %account.identity_id, "registered via page");
                return Ok(redirect("/"));
            }
            Err(err) => errors.absorb(err)?,
        },
        Err(err) => errors.absorb(err)?,
    }
    page(
        "register.html",
        context! {
            viewer => None::<String>,
            form => RegisterEcho { username: &form.username, email: &form.email },
            errors => errors,
        },
    )
}

/// Sign-in form.
#[get("/users/login/")]
pub async fn login_form(
    OptionalActor(viewer): OptionalActor,
    query: web::Query<NextQuery>,
) -> PageResult {
    page(
        "login.html",
        context! {
            viewer => viewer_name(viewer.as_ref()),
            username => "",
            next => safe_next(query.next.as_deref()),
            errors => FormErrors::default(),
        },
    )
}

/// Sign in and follow `next`, or re-render with a generic error.
#[post("/users/login/")]
pub async fn login_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    web::Form(form): web::Form<LoginForm>,
) -> PageResult {
    let next = safe_next(form.next.as_deref());
    let mut errors = FormErrors::default();
    match LoginCredentials::try_from_parts(&form.username, &form.password) {
        Ok(credentials) => match state.accounts.authenticate(&credentials).await {
            Ok(actor) => {
                session.persist_identity(actor.identity_id)?;
                return Ok(redirect(next));
            }
            Err(err) if err.code() == ErrorCode::Unauthorized => {
                errors.insert("__all__", BAD_LOGIN);
            }
            Err(err) => return Err(err.into()),
        },
        Err(err) => errors.absorb(field_error(err))?,
    }
    page(
        "login.html",
        context! {
            viewer => None::<String>,
            username => form.username.as_str(),
            next => next,
            errors => errors,
        },
    )
}

/// Drop the session and go home.
#[route("/users/logout/", method = "GET", method = "POST")]
pub async fn logout(session: SessionContext) -> PageResult {
    session.purge();
    Ok(redirect("/"))
}

/// Profile form filled with the visitor's current values.
#[get("/users/profile/")]
pub async fn profile_form(req: HttpRequest, viewer: OptionalActor) -> PageResult {
    let actor = require_actor(viewer, &req)?;
    page(
        "profile.html",
        context! {
            viewer => viewer_name(Some(&actor)),
            form => ProfileForm::from(&actor.profile),
            errors => FormErrors::default(),
        },
    )
}

/// Save the profile, or re-render the form with field errors.
#[post("/users/profile/")]
pub async fn profile_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: OptionalActor,
    web::Form(form): web::Form<ProfileForm>,
) -> PageResult {
    let actor = require_actor(viewer, &req)?;
    let mut errors = FormErrors::default();
    if let Some(details) = form.to_details(&mut errors) {
        state.accounts.update_profile(&actor, details).await?;
        return Ok(redirect("/users/profile/"));
    }
    page(
        "profile.html",
        context! {
            viewer => viewer_name(Some(&actor)),
            form => form,
            errors => errors,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RegisteredAccount;
    use crate::domain::{Error, IdentityId};
    use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};
    use crate::inbound::pages::configure_pages;
    use crate::test_support::actor_with_profile;
    use actix_web::http::StatusCode;
    use actix_web::http::header::{AUTHORIZATION, LOCATION, SET_COOKIE};
    use actix_web::{App, test};
    use rstest::rstest;

    struct Reply {
        status: StatusCode,
        location: Option<String>,
        sets_cookie: bool,
        body: String,
    }

    async fn call(ports: MockPorts, req: test::TestRequest) -> Reply {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .wrap(test_session_middleware())
                .configure(configure_pages),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let sets_cookie = res.headers().contains_key(SET_COOKIE);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 body");
        Reply {
            status,
            location,
            sets_cookie,
            body,
        }
    }

    #[actix_web::test]
    async fn registration_signs_the_visitor_in() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_register()
            .withf(|registration| registration.username().as_ref() == "carol")
            .return_once(|registration| {
                let actor = actor_with_profile(5);
                Ok(RegisteredAccount {
                    identity_id: actor.identity_id,
                    username: registration.username().clone(),
                    email: None,
                    profile: actor.profile,
                })
            });

        let reply = call(
            ports,
            test::TestRequest::post().uri("/users/register/").set_form([
                ("username", "carol"),
                ("email", ""),
                ("password1", "demo123"),
                ("password2", "demo123"),
            ]),
        )
        .await;

        assert_eq!(reply.status, StatusCode::FOUND);
        assert_eq!(reply.location.as_deref(), Some("/"));
        assert!(reply.sets_cookie);
    }

    #[rstest]
    #[case::mismatch("demo123", "demo124", "didn&#x27;t match")]
    #[case::too_short("abc", "abc", "at least 6 characters")]
    #[actix_web::test]
    async fn invalid_registration_shows_inline_errors(
        #[case] password1: &str,
        #[case] password2: &str,
        #[case] expected: &str,
    ) {
        let mut ports = MockPorts::default();
        ports.accounts.expect_register().never();

        let reply = call(
            ports,
            test::TestRequest::post().uri("/users/register/").set_form([
                ("username", "carol"),
                ("password1", password1),
                ("password2", password2),
            ]),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains(expected), "{}", reply.body);
        assert!(reply.body.contains("value=\"carol\""));
    }

    #[actix_web::test]
    async fn duplicate_username_is_reported_on_the_form() {
        let mut ports = MockPorts::default();
        ports.accounts.expect_register().return_once(|_| {
            Err(
                Error::conflict("A user with that username already exists.").with_details(
                    serde_json::json!({"field": "username", "code": "duplicate_username"}),
                ),
            )
        });

        let reply = call(
            ports,
            test::TestRequest::post().uri("/users/register/").set_form([
                ("username", "alice_dev"),
                ("password1", "demo123"),
                ("password2", "demo123"),
            ]),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("A user with that username already exists."));
    }

    #[rstest]
    #[case::local(Some("/my/"), "/my/")]
    #[case::absent(None, "/")]
    #[case::offsite(Some("https://evil.example/"), "/")]
    #[actix_web::test]
    async fn login_redirects_to_safe_next(#[case] next: Option<&str>, #[case] expected: &str) {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_authenticate()
            .return_once(|_| Ok(actor_with_profile(1)));
        let mut fields = vec![("username", "user1"), ("password", "demo123")];
        if let Some(next) = next {
            fields.push(("next", next));
        }

        let reply = call(
            ports,
            test::TestRequest::post().uri("/users/login/").set_form(fields),
        )
        .await;

        assert_eq!(reply.status, StatusCode::FOUND);
        assert_eq!(reply.location.as_deref(), Some(expected));
        assert!(reply.sets_cookie);
    }

    #[actix_web::test]
    async fn failed_login_rerenders_with_message() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_authenticate()
            .return_once(|_| Err(Error::unauthorized("invalid credentials")));

        let reply = call(
            ports,
            test::TestRequest::post()
                .uri("/users/login/")
                .set_form([("username", "user1"), ("password", "wrong!")]),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("Please enter a correct username and password."));
    }

    #[actix_web::test]
    async fn login_page_carries_next_into_the_form() {
        let reply = call(
            MockPorts::default(),
            test::TestRequest::get().uri("/users/login/?next=/create/"),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        // Slashes are entity-escaped inside attributes.
        assert!(reply.body.contains("value=\"&#x2f;create&#x2f;\""));
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let reply = call(
            MockPorts::default(),
            test::TestRequest::get().uri("/users/logout/"),
        )
        .await;

        assert_eq!(reply.status, StatusCode::FOUND);
        assert_eq!(reply.location.as_deref(), Some("/"));
    }

    #[actix_web::test]
    async fn profile_form_is_prefilled() {
        let mut ports = MockPorts::default();
        ports
            .auth
            .expect_identify_bearer()
            .return_once(|_| Ok(IdentityId::new(1)));
        ports.auth.expect_resolve_actor().return_once(|_| {
            let mut actor = actor_with_profile(1);
            actor.profile.details = ProfileDetails::try_new(
                "Rustacean",
                TagList::parse("Rust, SQL"),
                TagList::default(),
                Some(15),
                TagList::default(),
            )
            .expect("details");
            Ok(actor)
        });

        let reply = call(
            ports,
            test::TestRequest::get()
                .uri("/users/profile/")
                .insert_header((AUTHORIZATION, "Bearer good")),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("Rust, SQL"));
        assert!(reply.body.contains("value=\"15\""));
    }

    #[rstest]
    #[case::not_a_number("ten", "Enter a whole number.")]
    #[case::negative("-3", "availability_hours must not be negative")]
    #[actix_web::test]
    async fn profile_form_rejects_bad_hours(#[case] hours: &str, #[case] expected: &str) {
        let mut ports = MockPorts::default();
        ports
            .auth
            .expect_identify_bearer()
            .return_once(|_| Ok(IdentityId::new(1)));
        ports
            .auth
            .expect_resolve_actor()
            .return_once(|_| Ok(actor_with_profile(1)));
        ports.accounts.expect_update_profile().never();

        let reply = call(
            ports,
            test::TestRequest::post()
                .uri("/users/profile/")
                .insert_header((AUTHORIZATION, "Bearer good"))
                .set_form([("bio", "hi"), ("availability_hours", hours)]),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains(expected));
    }

    #[actix_web::test]
    async fn profile_update_redirects_back() {
        let mut ports = MockPorts::default();
        ports
            .auth
            .expect_identify_bearer()
            .return_once(|_| Ok(IdentityId::new(1)));
        ports
            .auth
            .expect_resolve_actor()
            .return_once(|_| Ok(actor_with_profile(1)));
        ports
            .accounts
            .expect_update_profile()
            .withf(|_, details| {
                details.skills().as_slice() == ["Go", "Rust"] && details.availability_hours() == 10
            })
            .return_once(|actor, details| {
                let mut profile = actor.profile.clone();
                profile.details = details;
                Ok(profile)
            });

        let reply = call(
            ports,
            test::TestRequest::post()
                .uri("/users/profile/")
                .insert_header((AUTHORIZATION, "Bearer good"))
                .set_form([("skills_raw", "Go, Rust"), ("availability_hours", "")]),
        )
        .await;

        assert_eq!(reply.status, StatusCode::FOUND);
        assert_eq!(reply.location.as_deref(), Some("/users/profile/"));
    }
}
