//! HTTP mapping of the error taxonomy.
//!
//! | Error                         | Status | `code`             |
//! |-------------------------------|--------|--------------------|
//! | `NotFound`, `RowNotFound`     | 404    | `NOT_FOUND`        |
//! | `Validation`, CHECK violation | 400    | `VALIDATION_ERROR` |
//! | `Conflict`, UNIQUE/FK clash   | 409    | `CONFLICT`         |
//! | `Unauthorized`                | 401    | `UNAUTHORIZED`     |
//! | malformed request             | 400    | `BAD_REQUEST`      |
//! | anything else                 | 500    | `INTERNAL_ERROR`   |
//!
//! 500 responses never echo the underlying message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tmc_core::error::CoreError;
use tmc_lifecycle::CommandError;

/// Error returned by handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request itself is malformed (bad header, unparsable value).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Core(err) | AppError::Command(CommandError::Core(err)) => core_parts(err),
            AppError::Database(err) | AppError::Command(CommandError::Database(err)) => {
                sqlx_parts(err)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal domain error");
            internal()
        }
    }
}

/// Constraint violations that slip past command validation still map onto
/// the domain codes, keyed by SQLSTATE.
fn sqlx_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string());
    }
    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some("23505") => {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates {constraint}"),
                )
            }
            Some("23503") => {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Referenced row is missing or still in use ({constraint})"),
                )
            }
            Some("23514") => {
                return (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value rejected by {constraint}"),
                )
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    internal()
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}
