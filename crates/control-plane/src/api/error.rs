// API error type
// Decision: Every failure leaves the service as {code, error} JSON
// Decision: Auth refusals carry a generic message; the reason is only logged
// Decision: Store failures are logged with detail and answered with a fixed 500 text

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ErrorResponse;
use crate::auth::{AuthError, AuthErrorClass};
use crate::services::ServiceError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please contact support.";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code, message),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            INTERNAL_ERROR_MESSAGE,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err.class() {
            AuthErrorClass::Unauthenticated => match err {
                AuthError::MissingCredentials => {
                    ApiError::unauthorized("Authorization header missing or invalid.")
                }
                _ => ApiError::unauthorized("Invalid or expired token."),
            },
            AuthErrorClass::Forbidden => match err {
                AuthError::RoleDenied { allowed, .. } => {
                    ApiError::forbidden(format!("Access denied: requires one of [{allowed}]."))
                }
                _ => ApiError::forbidden("User is not provisioned for this service."),
            },
            AuthErrorClass::StoreUnavailable => ApiError::internal(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => ApiError::validation(message),
            ServiceError::NotFound(what) => ApiError::not_found(format!("{what} not found.")),
            ServiceError::AlreadyExists(what) => {
                ApiError::conflict(format!("{what} already exists."))
            }
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
