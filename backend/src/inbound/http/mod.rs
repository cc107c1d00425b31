//! HTTP inbound adapter exposing the JSON API.

pub mod auth;
pub mod error;
pub mod health;
pub mod projects;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` route on `cfg`.
///
/// `/projects/my/` is registered before `/projects/{id}/` so the literal
/// segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(validation::json_config())
            .app_data(validation::path_config())
            .service(users::register)
            .service(users::login)
            .service(users::refresh_token)
            .service(users::get_profile)
            .service(users::update_profile)
            .service(users::delete_account)
            .service(projects::list_projects)
            .service(projects::create_project)
            .service(projects::my_projects)
            .service(projects::get_project)
            .service(projects::replace_project)
            .service(projects::patch_project)
            .service(projects::delete_project)
            .service(projects::join_project),
    );
}

/// Register the liveness and readiness checks.
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}
