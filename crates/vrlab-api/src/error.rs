//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every error
//! body has the shape `{"error": "...", "status": 400}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or the request body is malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credentials were rejected.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An unexpected failure. Only `message` reaches the client; `cause`
    /// is logged.
    #[error("{message}: {cause}")]
    Internal {
        /// Generic message returned to the client.
        message: &'static str,
        /// The underlying failure.
        cause: String,
    },
}

impl ApiError {
    /// Wrap an unexpected failure behind a generic client-facing message.
    pub fn internal(message: &'static str, cause: impl core::fmt::Display) -> Self {
        Self::Internal {
            message,
            cause: cause.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal { message, cause } => {
                tracing::error!(error = %cause, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_owned())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_hides_the_cause() {
        let response = ApiError::internal("Failed to fetch interactions", "lock poisoned").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation("User ID is required".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
