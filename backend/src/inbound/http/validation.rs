//! Shared validation helpers for inbound HTTP adapters.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, FieldViolation};

/// Convert any field-level validation error into an `invalid_request`.
pub(crate) fn field_error<E>(err: E) -> Error
where
    E: Into<FieldViolation>,
{
    Error::from(err.into())
}

/// `invalid_request` for a required JSON field the body omitted.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON payload");
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("malformed JSON body: {inner}"),
        other => format!("unreadable JSON body: {other}"),
    };
    Error::invalid_request(message).into()
}

/// JSON extractor configuration reporting body errors in the API error shape.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected path parameter");
    Error::not_found(format!("no resource at {}", req.path())).into()
}

/// Path extractor configuration: an unparsable id names nothing, so it
/// answers `not_found` in the API error shape.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}
