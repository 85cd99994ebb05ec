//! Outbound HTTP: page fetching and candidate probing.

mod http_client;

pub use http_client::{
    resolve_user_agent, HttpClient, PageResponse, UserAgentChoice, DEFAULT_BROWSER_USER_AGENT,
};
pub(crate) use http_client::parse_http_url;

use async_trait::async_trait;
use reqwest::StatusCode;

/// Errors from fetching a page or probing a candidate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Upstream returned {0}")]
    Status(StatusCode),
}

impl FetchError {
    /// Upstream status code, when the failure came from a non-2xx response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status(status) => Some(*status),
            FetchError::Transport(e) => e.status(),
            FetchError::InvalidUrl(_) => None,
        }
    }
}

/// The network seam used by the finder.
///
/// `HttpClient` is the production implementation; tests swap in doubles that
/// record which URLs were requested.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body. Non-2xx responses are errors.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Issue a lightweight request to see whether `url` exists.
    /// Returns the final status; the caller decides what counts as success.
    async fn probe(&self, url: &str) -> Result<StatusCode, FetchError>;
}
