//! Project pages: list, create, my projects, detail and the join toggle.

use actix_web::{HttpRequest, get, post, web};
use minijinja::context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ProjectDraft, ProjectId, ProjectValidationError, TagList};
use crate::inbound::http::auth::OptionalActor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

use super::{
    FormErrors, PageResult, page, project_cards, redirect, require_actor, viewer_name,
};

/// Create-project form as posted by the browser.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectForm {
    /// Project name.
    pub title: String,
    /// What the project is about.
    pub description: String,
    /// Comma-separated technologies.
    pub tech_stack_raw: String,
    /// Comma-separated roles.
    pub needed_roles_raw: String,
}

impl ProjectForm {
    fn to_draft(&self) -> Result<ProjectDraft, ProjectValidationError> {
        ProjectDraft::try_new(
            &self.title,
            self.description.as_str(),
            TagList::parse(&self.tech_stack_raw),
            TagList::parse(&self.needed_roles_raw),
        )
    }
}

/// Home page: every project, newest first.
#[get("/")]
pub async fn project_list(
    state: web::Data<HttpState>,
    OptionalActor(viewer): OptionalActor,
) -> PageResult {
    let projects = state.project_queries.list().await?;
    let cards = project_cards(&state, &projects).await?;
    page(
        "project_list.html",
        context! { viewer => viewer_name(viewer.as_ref()), projects => cards },
    )
}

/// Empty create-project form.
#[get("/create/")]
pub async fn create_form(req: HttpRequest, viewer: OptionalActor) -> PageResult {
    let actor = require_actor(viewer, &req)?;
    page(
        "project_create.html",
        context! {
            viewer => viewer_name(Some(&actor)),
            form => ProjectForm::default(),
            errors => FormErrors::default(),
        },
    )
}

/// Create a project, or re-render the form with field errors.
#[post("/create/")]
pub async fn create_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: OptionalActor,
    web::Form(form): web::Form<ProjectForm>,
) -> PageResult {
    let actor = require_actor(viewer, &req)?;
    let mut errors = FormErrors::default();
    match form.to_draft() {
        Ok(draft) => {
            let project = state.projects.create(&actor, draft).await?;
            return Ok(redirect(&format!("/{}/", project.id)));
        }
        Err(err) => errors.absorb(field_error(err))?,
    }
    debug!(?errors, "project form rejected");
    page(
        "project_create.html",
        context! { viewer => viewer_name(Some(&actor)), form => form, errors => errors },
    )
}

/// Projects the visitor owns or has joined.
#[get("/my/")]
pub async fn my_projects(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: OptionalActor,
) -> PageResult {
    let actor = require_actor(viewer, &req)?;
    let projects = state.project_queries.my_projects(&actor).await?;
    let cards = project_cards(&state, &projects).await?;
    page(
        "my_projects.html",
        context! { viewer => viewer_name(Some(&actor)), projects => cards },
    )
}

/// One project with its team; members see a leave button, the owner an
/// edit link.
#[get("/{id:\\d+}/")]
pub async fn project_detail(
    state: web::Data<HttpState>,
    OptionalActor(viewer): OptionalActor,
    path: web::Path<i64>,
) -> PageResult {
    let project = state
        .project_queries
        .detail(ProjectId::new(path.into_inner()))
        .await?;
    let is_member = viewer
        .as_ref()
        .is_some_and(|actor| project.is_member(actor.profile.id));
    let can_edit = viewer
        .as_ref()
        .is_some_and(|actor| actor.can_modify(&project));
    let mut cards = project_cards(&state, std::slice::from_ref(&project)).await?;
    page(
        "project_detail.html",
        context! {
            viewer => viewer_name(viewer.as_ref()),
            project => cards.pop(),
            is_member => is_member,
            can_edit => can_edit,
        },
    )
}

/// Toggle the visitor's membership and return to the project.
#[post("/{id:\\d+}/join/")]
pub async fn join_project(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: OptionalActor,
    path: web::Path<i64>,
) -> PageResult {
    let actor = require_actor(viewer, &req)?;
    let id = ProjectId::new(path.into_inner());
    state.projects.toggle_membership(&actor, id).await?;
    Ok(redirect(&format!("/{id}/")))
}
