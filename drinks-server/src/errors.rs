use crate::db::RepoError;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::Json;
use drinks_auth::AuthError;
use http::StatusCode;
use log::{error, warn};
use serde::Serialize;
use utoipa::ToSchema;

/// Error returned by every endpoint, rendered as the uniform error envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    /// The HTTP status code
    pub error: u16,
    pub message: String,
}

impl ApiError {
    /// Create a new ApiError with a message and status code
    pub fn new<S: ToString>(message: S, status_code: StatusCode) -> Self {
        Self {
            message: message.to_string(),
            status_code,
        }
    }

    /// Create new Not Found Error (404)
    pub fn not_found() -> Self {
        Self::new("requested resource not found", StatusCode::NOT_FOUND)
    }

    /// Create new Unprocessable Entity Error (422)
    pub fn unprocessable() -> Self {
        Self::new("unprocessable", StatusCode::UNPROCESSABLE_ENTITY)
    }

    /// Create new Method Not Allowed Error (405)
    pub fn method_not_allowed() -> Self {
        Self::new("method not allowed", StatusCode::METHOD_NOT_ALLOWED)
    }

    /// Create new Internal Server Error (500); the detail never reaches the caller
    pub fn internal<S: std::fmt::Display>(detail: S) -> Self {
        error!("Internal server error: {}", detail);
        Self::new("internal server error", StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = ErrorBody {
            success: false,
            error: status_code.as_u16(),
            message: self.message,
        };
        (status_code, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.description(), err.status_code())
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(title) => {
                warn!("Rejected duplicate drink title '{}'", title);
                Self::unprocessable()
            }
            other => Self::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::unprocessable()
    }
}
