//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use trailmark_core::error::HuntError;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema bootstrap failure.
    #[error("schema error: {0}")]
    Schema(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `HuntError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub HuntError);

impl From<HuntError> for ApiError {
    fn from(err: HuntError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            HuntError::GameNotFound => (StatusCode::NOT_FOUND, "game_not_found"),
            HuntError::TeamNotFound => (StatusCode::NOT_FOUND, "team_not_found"),
            HuntError::NodeNotFound => (StatusCode::NOT_FOUND, "node_not_found"),
            HuntError::SessionInvalid => (StatusCode::UNAUTHORIZED, "session_invalid"),
            HuntError::Precondition(_) => (StatusCode::BAD_REQUEST, "precondition_failed"),
            HuntError::Infrastructure(detail) => {
                // Log the detail; the client gets a generic failure.
                tracing::error!(detail = %detail, "infrastructure fault");
                let body = ErrorBody {
                    error: "internal_error",
                    message: "internal error".to_owned(),
                };
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: HuntError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_not_found_variants_map_to_404() {
        assert_eq!(status_of(HuntError::GameNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(HuntError::TeamNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(HuntError::NodeNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_session_invalid_maps_to_401() {
        assert_eq!(
            status_of(HuntError::SessionInvalid),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_precondition_maps_to_400() {
        assert_eq!(
            status_of(HuntError::precondition("game has no nodes")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500_without_leaking_detail() {
        let response = ApiError(HuntError::infrastructure("password for db is hunter2"))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
