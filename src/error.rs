use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request body, path or field rules rejected the input (400).
    #[error("{0}")]
    Validation(String),

    /// A referenced equipment item or its stats are absent (404).
    #[error("{0}")]
    NotFound(String),

    #[error("Equipment {0} is already in database.")]
    AlreadyExists(String),

    /// More than one equipment row matches a key that should be unique.
    #[error("Multiple equipment entries in database for {0}. Please fix!")]
    DuplicateEntries(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::AlreadyExists(_) | AppError::DuplicateEntries(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                // Log the real cause, return a generic message
                tracing::error!(error = %e, "Database error");
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
