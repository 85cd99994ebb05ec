//! HTTP request handlers for the web server.

mod api;
mod find;
mod static_files;

pub use api::{health, stats};
pub use find::find_source;
pub use static_files::console;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use super::error::ApiError;

/// Answer for methods a route does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Bare OPTIONS request; CORS headers are added by the router layers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Unknown paths. OPTIONS is still answered so preflights never fail.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
