//! What the client hands back from a page fetch.

use reqwest::{header::CONTENT_TYPE, Response, StatusCode};
use url::Url;

/// A fetched page whose body has not been read yet.
pub struct PageResponse {
    pub status: StatusCode,
    /// Where the request ended up after redirects.
    pub final_url: Url,
    pub content_type: Option<String>,
    body: Response,
}

impl PageResponse {
    pub(crate) fn new(response: Response) -> Self {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            status: response.status(),
            final_url: response.url().clone(),
            content_type,
            body: response,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Read the body, decoded according to the response charset.
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.body.text().await
    }
}

/// Statuses meaning the server will not answer HEAD at all; only a GET can
/// tell whether the resource exists.
pub fn rejects_head(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
    )
}
