use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use touchgrass_core::error::CoreError;
use touchgrass_core::validation::ValidationFailure;
use touchgrass_storage::StorageError;
use touchgrass_workflow::{PersistenceError, SubmissionError};

/// Application-level error type for HTTP handlers.
///
/// Every layer's error converts into this, and [`IntoResponse`] renders it
/// as `{ "error", "code" }` JSON (plus `details` for validation failures).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Field-level violations in a submitted draft.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation { failure, .. } => Self::Validation(failure),
            SubmissionError::Persistence { source, .. } => Self::Persistence(source),
        }
    }
}

type Rendered = (StatusCode, &'static str, String, Option<Value>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): Rendered = match &self {
            AppError::Core(core) => {
                let (status, code, message) = classify_core_error(core);
                (status, code, message, None)
            }

            AppError::Validation(failure) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                failure.summary(),
                Some(json!(failure.violations)),
            ),

            AppError::Persistence(err) => {
                let (status, code, message) = classify_persistence_error(err);
                (status, code, message, None)
            }

            AppError::Storage(err) => {
                let (status, code, message) = classify_storage_error(err);
                (status, code, message, None)
            }

            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                (status, code, message, None)
            }

            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    internal_message(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal_message() -> String {
    "An internal error occurred".to_string()
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            msg.clone(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                internal_message(),
            )
        }
    }
}

fn classify_persistence_error(err: &PersistenceError) -> (StatusCode, &'static str, String) {
    match err {
        PersistenceError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        PersistenceError::Referential { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "REFERENTIAL_ERROR",
            err.to_string(),
        ),
        PersistenceError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        PersistenceError::Invalid(msg) => {
            tracing::error!(error = %msg, "Stored data failed to decode");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                internal_message(),
            )
        }
        PersistenceError::Database(db) => classify_sqlx_error(db),
    }
}

fn classify_storage_error(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::AlreadyExists(_) => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StorageError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string()),
        StorageError::Io(io) => {
            tracing::error!(error = %io, "Object storage I/O error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                internal_message(),
            )
        }
        StorageError::Backend(msg) => {
            tracing::error!(error = %msg, "Object storage backend error");
            (
                StatusCode::BAD_GATEWAY,
                "STORAGE_ERROR",
                "Object storage is unavailable".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                internal_message(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                internal_message(),
            )
        }
    }
}
