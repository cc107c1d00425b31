//! Server-rendered HTML pages.
//!
//! Pages share [`HttpState`](crate::inbound::http::state::HttpState) with the
//! JSON API and authenticate through the session cookie. Templates live in
//! `backend/templates/` and are compiled into the binary.

pub mod accounts;
pub mod projects;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use actix_web::http::StatusCode;
use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use tracing::error;

use crate::domain::{Actor, Error, ErrorCode, ProfileId, Project};
use crate::inbound::http::auth::OptionalActor;
use crate::inbound::http::state::HttpState;

pub(crate) const LOGIN_PATH: &str = "/users/login/";

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../../templates/base.html")),
    ("error.html", include_str!("../../../templates/error.html")),
    ("login.html", include_str!("../../../templates/login.html")),
    ("my_projects.html", include_str!("../../../templates/my_projects.html")),
    ("profile.html", include_str!("../../../templates/profile.html")),
    ("project_create.html", include_str!("../../../templates/project_create.html")),
    ("project_detail.html", include_str!("../../../templates/project_detail.html")),
    ("project_list.html", include_str!("../../../templates/project_list.html")),
    ("register.html", include_str!("../../../templates/register.html")),
];

fn build_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

static ENVIRONMENT: LazyLock<Result<Environment<'static>, minijinja::Error>> =
    LazyLock::new(build_environment);

/// Failures a page handler can end in.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The page needs a signed-in visitor.
    #[error("login required")]
    LoginRequired {
        /// Path to return to after signing in.
        next: String,
    },
    /// A domain call failed.
    #[error(transparent)]
    Domain(#[from] Error),
    /// A template failed to load or render.
    #[error("template rendering failed: {0}")]
    Render(String),
}

impl From<minijinja::Error> for PageError {
    fn from(value: minijinja::Error) -> Self {
        Self::Render(value.to_string())
    }
}

/// Result alias for page handlers.
pub type PageResult = Result<HttpResponse, PageError>;

/// Login URL that returns to `next` afterwards.
pub(crate) fn login_url(next: &str) -> String {
    format!("{LOGIN_PATH}?next={next}")
}

/// Accept only same-site absolute paths as redirect targets.
pub(crate) fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

/// 302 to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_owned()))
        .finish()
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LoginRequired { .. } => StatusCode::FOUND,
            Self::Domain(err) => err.status_code(),
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::LoginRequired { next } => return redirect(&login_url(next)),
            Self::Domain(err) if err.code() == ErrorCode::InternalError => {
                error!(error = %err, "page request failed");
                "Something went wrong on our side.".to_owned()
            }
            Self::Domain(err) => err.message().to_owned(),
            Self::Render(message) => {
                error!(%message, "page template failed");
                "Something went wrong on our side.".to_owned()
            }
        };
        let status = self.status_code();
        let body = render(
            "error.html",
            minijinja::context! {
                viewer => None::<String>,
                status => status.as_u16(),
                reason => status.canonical_reason().unwrap_or("Error"),
                message => message.as_str(),
            },
        )
        .unwrap_or_else(|_| message.clone());
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body)
    }
}

/// Render `name` with `ctx`.
pub(crate) fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, PageError> {
    let env = ENVIRONMENT
        .as_ref()
        .map_err(|err| PageError::Render(err.to_string()))?;
    Ok(env.get_template(name)?.render(ctx)?)
}

/// Render `name` into a `200 OK` HTML response.
pub(crate) fn page<S: Serialize>(name: &str, ctx: S) -> PageResult {
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render(name, ctx)?))
}

/// The signed-in actor, or a redirect to the login page.
pub(crate) fn require_actor(viewer: OptionalActor, req: &HttpRequest) -> Result<Actor, PageError> {
    viewer.into_inner().ok_or_else(|| PageError::LoginRequired {
        next: req.path().to_owned(),
    })
}

/// Username shown in the navigation bar.
pub(crate) fn viewer_name(viewer: Option<&Actor>) -> Option<String> {
    viewer.map(|actor| actor.username.to_string())
}

/// Inline form messages keyed by field; `__all__` holds form-wide errors.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub(crate) struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub(crate) fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_owned(), message.into());
    }

    /// Place a domain error next to the field its details name.
    ///
    /// Only client errors are shown inline; anything else is returned so the
    /// caller can fail the request.
    pub(crate) fn absorb(&mut self, err: Error) -> Result<(), Error> {
        match err.code() {
            ErrorCode::InvalidRequest | ErrorCode::Conflict => {
                let field = err
                    .details()
                    .and_then(|details| details.get("field"))
                    .and_then(|field| field.as_str())
                    .unwrap_or("__all__")
                    .to_owned();
                self.insert(&field, err.message());
                Ok(())
            }
            _ => Err(err),
        }
    }
}

/// Project as listed on a page, with owner and member names resolved.
#[derive(Debug, Serialize)]
pub(crate) struct ProjectCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub needed_roles: Vec<String>,
    pub owner: String,
    pub members: Vec<String>,
    pub created_at: String,
}

fn display_name(names: &HashMap<ProfileId, String>, id: ProfileId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("profile #{id}"))
}

/// Resolve display names for `projects` with one lookup.
pub(crate) async fn project_cards(
    state: &HttpState,
    projects: &[Project],
) -> Result<Vec<ProjectCard>, Error> {
    let ids: Vec<ProfileId> = projects
        .iter()
        .flat_map(|project| {
            std::iter::once(project.created_by).chain(project.members.iter().copied())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let names: HashMap<ProfileId, String> = state
        .project_queries
        .people(&ids)
        .await?
        .into_iter()
        .map(|summary| (summary.id, summary.username.to_string()))
        .collect();
    Ok(projects
        .iter()
        .map(|project| ProjectCard {
            id: project.id.get(),
            title: project.title.as_ref().to_owned(),
            description: project.description.as_ref().to_owned(),
            tech_stack: project.tech_stack.as_slice().to_vec(),
            needed_roles: project.needed_roles.as_slice().to_vec(),
            owner: display_name(&names, project.created_by),
            members: project
                .members
                .iter()
                .map(|id| display_name(&names, *id))
                .collect(),
            created_at: project.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect())
}

/// Register every page route on `cfg`.
///
/// Literal paths are registered ahead of `/{id}/`.
pub fn configure_pages(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register_form)
        .service(accounts::register_submit)
        .service(accounts::login_form)
        .service(accounts::login_submit)
        .service(accounts::logout)
        .service(accounts::profile_form)
        .service(accounts::profile_submit)
        .service(projects::project_list)
        .service(projects::create_form)
        .service(projects::create_submit)
        .service(projects::my_projects)
        .service(projects::project_detail)
        .service(projects::join_project);
}
