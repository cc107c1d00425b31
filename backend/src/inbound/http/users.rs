//! Account and profile API handlers.
//!
//! ```text
//! POST   /api/users/register/       {"username":"alice","password":"secret1"}
//! POST   /api/users/login/          {"username":"alice","password":"secret1"}
//! POST   /api/users/token/refresh/  {"refresh":"<jwt>"}
//! GET    /api/users/profile/
//! PUT    /api/users/profile/
//! DELETE /api/users/me/
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RegisteredAccount;
use crate::domain::{
    Actor, EmailAddress, Error, IdentityId, LoginCredentials, Profile, ProfileDetails,
    Registration, TagInput, TagList, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{field_error, missing_field_error};

/// Editable profile fields. Omitted fields take their defaults.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfileFields {
    /// About the developer.
    pub bio: Option<String>,
    /// Known technologies, as a list or comma-separated text.
    #[schema(value_type = Option<Vec<String>>)]
    pub skills: Option<TagInput>,
    /// Areas of interest, as a list or comma-separated text.
    #[schema(value_type = Option<Vec<String>>)]
    pub interests: Option<TagInput>,
    /// Hours per week; defaults to 10.
    #[schema(example = 10)]
    pub availability_hours: Option<i32>,
    /// Roles the developer would take.
    #[schema(value_type = Option<Vec<String>>)]
    pub preferred_roles: Option<TagInput>,
}

impl ProfileFields {
    fn into_details(self) -> Result<ProfileDetails, Error> {
        let tags = |input: Option<TagInput>| input.map(TagList::from).unwrap_or_default();
        ProfileDetails::try_new(
            self.bio.unwrap_or_default(),
            tags(self.skills),
            tags(self.interests),
            self.availability_hours,
            tags(self.preferred_roles),
        )
        .map_err(field_error)
    }
}

/// Registration request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name.
    #[schema(example = "alice_dev")]
    pub username: String,
    /// Optional contact address.
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    /// At least six characters.
    #[schema(example = "demo123")]
    pub password: String,
    /// Initial profile fields.
    #[serde(flatten)]
    pub profile: ProfileFields,
}

/// Created account.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// New identity id.
    pub id: IdentityId,
    /// Registered login name.
    #[schema(value_type = String)]
    pub username: Username,
    /// Stored contact address.
    #[schema(value_type = Option<String>)]
    pub email: Option<EmailAddress>,
    /// Profile created with the account.
    pub profile: Profile,
}

impl From<RegisteredAccount> for RegisterResponse {
    fn from(value: RegisteredAccount) -> Self {
        Self {
            id: value.identity_id,
            username: value.username,
            email: value.email,
            profile: value.profile,
        }
    }
}

/// Credentials for `POST /api/users/login/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Token pair plus a snapshot of the caller's profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for API calls.
    pub access: String,
    /// Token for `POST /api/users/token/refresh/`.
    pub refresh: String,
    /// Login name of the caller.
    #[schema(value_type = String)]
    pub username: Username,
    /// The caller's profile.
    pub profile: Profile,
}

/// Body of `POST /api/users/token/refresh/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    /// Refresh token from a login.
    pub refresh: Option<String>,
}

/// Freshly issued access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccessResponse {
    /// New bearer token.
    pub access: String,
}

/// Create an account and its profile.
#[utoipa::path(
    post,
    path = "/api/users/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
        profile,
    } = payload.into_inner();
    let details = profile.into_details()?;
    let registration = Registration::try_new(&username, email.as_deref(), &password, details)
        .map_err(field_error)?;
    let account = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse::from(account)))
}

/// Exchange credentials for an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/api/users/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(field_error)?;
    let outcome = state.accounts.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        access: outcome.tokens.access,
        refresh: outcome.tokens.refresh,
        username: outcome.actor.username,
        profile: outcome.actor.profile,
    }))
}

/// Issue a new access token from a refresh token.
#[utoipa::path(
    post,
    path = "/api/users/token/refresh/",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token issued", body = AccessResponse),
        (status = 400, description = "Missing refresh token", body = Error),
        (status = 401, description = "Invalid or expired refresh token", body = Error)
    ),
    tags = ["users"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/users/token/refresh/")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<AccessResponse>> {
    let token = payload
        .into_inner()
        .refresh
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| missing_field_error("refresh"))?;
    let access = state.accounts.refresh(&token).await?;
    Ok(web::Json(AccessResponse { access }))
}

/// The caller's profile.
#[utoipa::path(
    get,
    path = "/api/users/profile/",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/profile/")]
pub async fn get_profile(actor: Actor) -> web::Json<Profile> {
    web::Json(actor.profile)
}

/// Replace the caller's profile content.
#[utoipa::path(
    put,
    path = "/api/users/profile/",
    request_body = ProfileFields,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/users/profile/")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<ProfileFields>,
) -> ApiResult<web::Json<Profile>> {
    let details = payload.into_inner().into_details()?;
    let profile = state.accounts.update_profile(&actor, details).await?;
    Ok(web::Json(profile))
}

/// Delete the caller's account, profile, owned projects and memberships.
#[utoipa::path(
    delete,
    path = "/api/users/me/",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteAccount"
)]
#[delete("/users/me/")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<HttpResponse> {
    state.accounts.delete_account(&actor).await?;
    Ok(HttpResponse::NoContent().finish())
}
