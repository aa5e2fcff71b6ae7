//! Error envelope for HTTP responses.
//!
//! Every failure leaves the service as
//! `{"success": false, "error": "<message>"}` with one of three statuses:
//! 400 for missing or invalid input, 404 for an unknown id or route, and
//! 500 for anything else, carrying the underlying error text.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use safety_lib::Error as LibError;

/// Message returned for unknown routes.
pub const MSG_ENDPOINT_NOT_FOUND: &str = "Endpoint not found";

/// Message returned when a handler panics.
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";

/// A request failure, already classified by HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Required input missing or unusable (400).
    Validation(String),
    /// Referenced entity or route does not exist (404).
    NotFound(String),
    /// Storage or unexpected failure (500).
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Internal(m) => m,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status().as_u16(), self.message())
    }
}

impl std::error::Error for ApiError {}

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.message(), "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.message(), "request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: match self {
                Self::Validation(m) | Self::NotFound(m) | Self::Internal(m) => m,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Map library errors onto HTTP statuses: unknown parents become 404,
/// everything else is a 500 carrying the error text.
impl From<LibError> for ApiError {
    fn from(error: LibError) -> Self {
        match error {
            LibError::HotzoneNotFound { .. } => Self::not_found("Hotzone not found"),
            LibError::PostNotFound { .. } => Self::not_found("Post not found"),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Router fallback for paths no resource claims.
pub async fn endpoint_not_found() -> ApiError {
    ApiError::not_found(MSG_ENDPOINT_NOT_FOUND)
}

/// Response produced by the panic-catching layer.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "handler panicked");
    ApiError::internal(MSG_INTERNAL_ERROR).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn lib_not_found_maps_to_404() {
        let err = ApiError::from(LibError::PostNotFound { id: 5 });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(LibError::HotzoneNotFound { id: 5 });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_lib_errors_pass_their_text_through() {
        let io = LibError::Io(std::io::Error::other("disk full"));
        let err = ApiError::from(io);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "disk full");
    }

    #[test]
    fn error_body_serialization() {
        let body = ErrorBody {
            success: false,
            error: "Endpoint not found".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Endpoint not found"}"#);
    }

    #[test]
    fn into_response_sets_status() {
        let response = ApiError::validation("lat and lng are required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
