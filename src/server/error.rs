//! JSON error responses for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Every failure the find endpoint can report.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL")]
    InvalidUrl,

    /// Neither extraction nor probing found anything.
    #[error("No game source found")]
    NotFound { url: String },

    /// The listing page answered with a non-2xx status.
    #[error("Failed to fetch page: {0}")]
    UpstreamStatus(u16),

    /// The listing page could not be reached at all.
    #[error("Failed to fetch page")]
    Unreachable,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::UpstreamStatus(_) | ApiError::Unreachable => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::NotFound { url } => json!({ "error": self.to_string(), "url": url }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_message_carries_code() {
        let err = ApiError::UpstreamStatus(403);
        assert_eq!(err.to_string(), "Failed to fetch page: 403");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::MissingUrl.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound {
                url: "x".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
