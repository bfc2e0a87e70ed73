//! HTTP mapping of the domain error taxonomy.
//!
//! One status per error kind, following this system's convention:
//! authorization denials ride 401 alongside missing credentials, with the
//! JSON body carrying a distinct machine-readable code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde::Serialize;

/// Wrapper turning a `DomainError` into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::DuplicateRequest => (StatusCode::BAD_REQUEST, "duplicate_request"),
            DomainError::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict"),
            DomainError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            DomainError::Forbidden(_) => (StatusCode::UNAUTHORIZED, "forbidden"),
            DomainError::NotFound(..) => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Log the detail, keep it out of the response.
            tracing::error!(error = %self.0, "internal error while handling request");
            "internal error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ErrorBody { error: code, message })).into_response()
    }
}
