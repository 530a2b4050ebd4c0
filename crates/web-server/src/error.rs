use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Missing Authorization header")]
    MissingCredentials,
    #[error("Invalid Authorization format. Expected: Bearer <token>")]
    MalformedAuthorization,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Server misconfigured")]
    Misconfigured,
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(database::DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Session not found".to_string())
            }
            AppError::Database(database::DbError::InvalidRecord(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Misconfigured => {
                tracing::error!("No API key configured; rejecting protected request.");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::MissingCredentials | AppError::MalformedAuthorization => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::InvalidApiKey => (StatusCode::FORBIDDEN, self.to_string()),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
