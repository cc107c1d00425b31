//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every JSON endpoint under `/api`, the health checks
//! and the request, response and domain schemas they reference. Two security
//! schemes are declared: the bearer token issued by `POST /api/users/login/`
//! and the session cookie the rendered pages use.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! with `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Error, ErrorCode, IdentityId, MembershipChange, Profile, ProfileDetails, ProfileId, Project,
    ProjectId,
};
use crate::inbound::http::projects::{MembershipResponse, ProjectPatchRequest, ProjectRequest};
use crate::inbound::http::users::{
    AccessResponse, LoginRequest, LoginResponse, ProfileFields, RefreshRequest, RegisterRequest,
    RegisterResponse,
};

/// Enrich the generated document with the bearer and cookie schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/users/login/."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie set by the login page.",
            ))),
        );
    }
}

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "DevMatch API",
        description = "Developer profiles, side projects and team membership."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::refresh_token,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::delete_account,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::my_projects,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::replace_project,
        crate::inbound::http::projects::patch_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::projects::join_project,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        IdentityId,
        ProfileId,
        ProjectId,
        Profile,
        ProfileDetails,
        Project,
        MembershipChange,
        ProfileFields,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        RefreshRequest,
        AccessResponse,
        ProjectRequest,
        ProjectPatchRequest,
        MembershipResponse,
    )),
    tags(
        (name = "users", description = "Registration, tokens and the caller's profile"),
        (name = "projects", description = "Side projects and membership"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
