//! Project API handlers.
//!
//! ```text
//! GET    /api/projects/
//! POST   /api/projects/            {"title":"…","description":"…","tech_stack":"Go, Rust"}
//! GET    /api/projects/my/
//! GET    /api/projects/{id}/
//! PUT    /api/projects/{id}/
//! PATCH  /api/projects/{id}/       {"needed_roles":["Designer"]}
//! DELETE /api/projects/{id}/
//! POST   /api/projects/{id}/join/
//! ```
//!
//! Reads are public; every mutation needs an authenticated [`Actor`].

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Actor, Error, MembershipChange, Project, ProjectChanges, ProjectDescription, ProjectDraft,
    ProjectId, ProjectTitle, TagInput, TagList,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

/// Full project content for create and `PUT`.
///
/// Tag fields accept a JSON list or comma-separated text.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProjectRequest {
    /// Project name, at most 100 characters.
    #[schema(example = "DevMatch Platform")]
    pub title: String,
    /// What the project is about.
    pub description: String,
    /// Technologies in use.
    #[schema(value_type = Option<Vec<String>>)]
    pub tech_stack: Option<TagInput>,
    /// Roles the team is looking for.
    #[schema(value_type = Option<Vec<String>>)]
    pub needed_roles: Option<TagInput>,
}

impl ProjectRequest {
    fn into_draft(self) -> Result<ProjectDraft, Error> {
        ProjectDraft::try_new(
            &self.title,
            self.description,
            tags(self.tech_stack),
            tags(self.needed_roles),
        )
        .map_err(field_error)
    }
}

/// Partial project content for `PATCH`; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProjectPatchRequest {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement tech stack.
    #[schema(value_type = Option<Vec<String>>)]
    pub tech_stack: Option<TagInput>,
    /// Replacement needed roles.
    #[schema(value_type = Option<Vec<String>>)]
    pub needed_roles: Option<TagInput>,
}

impl ProjectPatchRequest {
    fn into_changes(self) -> Result<ProjectChanges, Error> {
        Ok(ProjectChanges {
            title: self
                .title
                .map(ProjectTitle::new)
                .transpose()
                .map_err(field_error)?,
            description: self
                .description
                .map(ProjectDescription::new)
                .transpose()
                .map_err(field_error)?,
            tech_stack: self.tech_stack.map(TagList::from),
            needed_roles: self.needed_roles.map(TagList::from),
        })
    }
}

fn tags(input: Option<TagInput>) -> TagList {
    input.map(TagList::from).unwrap_or_default()
}

/// Outcome of a membership toggle.
#[derive(Debug, Serialize, ToSchema)]
pub struct MembershipResponse {
    /// Confirmation of the new membership state.
    #[schema(example = "Joined project successfully")]
    pub message: String,
}

impl From<MembershipChange> for MembershipResponse {
    fn from(value: MembershipChange) -> Self {
        Self {
            message: value.message().to_owned(),
        }
    }
}

/// List every project.
#[utoipa::path(
    get,
    path = "/api/projects/",
    responses((status = 200, description = "Projects", body = [Project])),
    tags = ["projects"],
    operation_id = "listProjects",
    security([])
)]
#[get("/projects/")]
pub async fn list_projects(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Project>>> {
    Ok(web::Json(state.project_queries.list().await?))
}

/// Create a project owned by the caller.
#[utoipa::path(
    post,
    path = "/api/projects/",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects/")]
pub async fn create_project(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let project = state.projects.create(&actor, draft).await?;
    Ok(HttpResponse::Created().json(project))
}

/// Projects the caller owns or has joined.
#[utoipa::path(
    get,
    path = "/api/projects/my/",
    responses(
        (status = 200, description = "Owned and joined projects", body = [Project]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["projects"],
    operation_id = "myProjects"
)]
#[get("/projects/my/")]
pub async fn my_projects(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<Vec<Project>>> {
    Ok(web::Json(state.project_queries.my_projects(&actor).await?))
}

/// One project.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/",
    params(("id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "getProject",
    security([])
)]
#[get("/projects/{id}/")]
pub async fn get_project(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Project>> {
    let id = ProjectId::new(path.into_inner());
    Ok(web::Json(state.project_queries.detail(id).await?))
}

/// Replace a project's content.
#[utoipa::path(
    put,
    path = "/api/projects/{id}/",
    params(("id" = i64, Path, description = "Project identifier")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "replaceProject"
)]
#[put("/projects/{id}/")]
pub async fn replace_project(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<web::Json<Project>> {
    let id = ProjectId::new(path.into_inner());
    let changes = ProjectChanges::from(payload.into_inner().into_draft()?);
    Ok(web::Json(state.projects.update(&actor, id, changes).await?))
}

/// Change selected fields of a project.
#[utoipa::path(
    patch,
    path = "/api/projects/{id}/",
    params(("id" = i64, Path, description = "Project identifier")),
    request_body = ProjectPatchRequest,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "patchProject"
)]
#[patch("/projects/{id}/")]
pub async fn patch_project(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
    payload: web::Json<ProjectPatchRequest>,
) -> ApiResult<web::Json<Project>> {
    let id = ProjectId::new(path.into_inner());
    let changes = payload.into_inner().into_changes()?;
    Ok(web::Json(state.projects.update(&actor, id, changes).await?))
}

/// Delete a project and its memberships.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/",
    params(("id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{id}/")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = ProjectId::new(path.into_inner());
    state.projects.delete(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Join the project, or leave it when already a member.
#[utoipa::path(
    post,
    path = "/api/projects/{id}/join/",
    params(("id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Membership toggled", body = MembershipResponse),
        (status = 400, description = "Caller has no profile", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["projects"],
    operation_id = "toggleMembership"
)]
#[post("/projects/{id}/join/")]
pub async fn join_project(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MembershipResponse>> {
    let id = ProjectId::new(path.into_inner());
    let change = state.projects.toggle_membership(&actor, id).await?;
    Ok(web::Json(change.into()))
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
