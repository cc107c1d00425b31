//! Rendering of domain [`Error`]s as JSON API responses.
//!
//! A missing caller profile answers 400, the same as the page adapter.
//! Internal failures are logged in full and returned with their message
//! replaced; every other error is returned as built.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED: &str = "Internal server error";

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, Error>;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::ProfileNotFound => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(trace_id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, trace_id.to_owned()));
        }
        if self.code() != ErrorCode::InternalError {
            return response.json(self);
        }

        error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        let body = self.trace_id().map_or_else(
            || Error::internal(REDACTED),
            |trace_id| Error::internal(REDACTED).with_trace_id(trace_id.to_owned()),
        );
        response.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced to a handler");
        Self::internal(REDACTED)
    }
}
