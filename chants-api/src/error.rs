//! Error types for chants-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
///
/// Serialized as `{ "error": <summary>, "details": <message> }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// chants-common error
    #[error(transparent)]
    Common(#[from] chants_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, summary, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Requête invalide", msg),
            ApiError::Common(chants_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "Requête invalide", msg)
            }
            ApiError::Common(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erreur lors de la récupération des chants",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            error!("getChants request failed: {}", details);
        }

        let body = Json(json!({
            "error": summary,
            "details": details,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
