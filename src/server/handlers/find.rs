//! The game source lookup endpoint.

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::super::error::ApiError;
use super::super::AppState;
use crate::scrapers::{parse_http_url, FetchError};

/// Body of a lookup request.
#[derive(Debug, Deserialize)]
pub struct FindRequest {
    pub url: Option<String>,
}

/// Successful lookup.
#[derive(Debug, Serialize)]
pub struct FindResponse {
    pub source: String,
}

/// Resolve the game source behind a listing page URL.
///
/// Every outcome is counted; only a found source counts as a success.
pub async fn find_source(State(state): State<AppState>, body: Bytes) -> Response {
    let result = lookup(&state, &body).await;
    state.stats.record(result.is_ok());

    match result {
        Ok(source) => Json(FindResponse { source }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn lookup(state: &AppState, body: &[u8]) -> Result<String, ApiError> {
    let request: FindRequest = serde_json::from_slice(body).map_err(|e| {
        error!("Unreadable request body: {}", e);
        ApiError::Internal
    })?;

    let url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ApiError::MissingUrl),
    };

    if let Err(e) = parse_http_url(url) {
        warn!("Rejected page URL: {}", e);
        return Err(ApiError::InvalidUrl);
    }

    info!("Looking up game source for {}", url);

    match state.finder.find(url).await {
        Ok(Some(found)) => Ok(found.url),
        Ok(None) => {
            info!("No game source found for {}", url);
            Err(ApiError::NotFound {
                url: request.url.clone().unwrap_or_default(),
            })
        }
        Err(FetchError::Status(status)) => {
            warn!("Page {} answered {}", url, status);
            Err(ApiError::UpstreamStatus(status.as_u16()))
        }
        Err(FetchError::Transport(e)) => {
            warn!("Failed to fetch {}: {}", url, e);
            Err(ApiError::Unreachable)
        }
        Err(FetchError::InvalidUrl(reason)) => {
            warn!("Rejected page URL {}", reason);
            Err(ApiError::InvalidUrl)
        }
    }
}
