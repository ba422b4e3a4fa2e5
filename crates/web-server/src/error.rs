use auth::AuthError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Invalid(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

// Malformed bodies, queries and paths are client errors like any other
// validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn internal(detail: &dyn std::fmt::Debug) -> (StatusCode, String) {
    tracing::error!(error = ?detail, "Request failed.");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal server error occurred".to_string(),
    )
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(DbError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, format!("{what} not found"))
            }
            AppError::Database(DbError::Conflict(message)) => (StatusCode::CONFLICT, message),
            AppError::Database(DbError::Core(core_err)) | AppError::Invalid(core_err) => {
                (core_status(&core_err), core_err.to_string())
            }
            AppError::Database(db_err) => internal(&db_err),
            AppError::Auth(AuthError::Hashing(detail) | AuthError::Signing(detail)) => {
                internal(&detail)
            }
            AppError::Auth(auth_err @ (AuthError::InvalidCredentials | AuthError::InvalidToken)) => {
                (StatusCode::UNAUTHORIZED, auth_err.to_string())
            }
            AppError::Auth(auth_err) => (StatusCode::FORBIDDEN, auth_err.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required".to_string()),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(detail) => internal(&detail),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
